//! Flow - deterministic workflow replay
//!
//! [`WorkflowExecutor`] validates a recorded workflow, then runs its steps in
//! ascending step number against a [`BrowserDriver`]. Element-targeting
//! actions go through the element finder; string fields are interpolated
//! against the run's variables and extracted values. The first failing step
//! ends the run.
//!
//! [`BrowserDriver`]: action_primitives::BrowserDriver

pub mod errors;
pub mod executor;
pub mod interpolate;
pub mod types;

pub use errors::FlowError;
pub use executor::{FlowExecutor, WorkflowExecutor};
pub use interpolate::{interpolate, placeholders};
pub use types::{ExecutionResult, ExecutorConfig, StepResult};
