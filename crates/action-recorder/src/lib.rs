//! Action Recorder - turns observed automation actions into workflow steps
//!
//! Each observation carries the action type, an optional snapshot of the
//! element under the action point, optional absolute coordinates and free-form
//! parameters. The session synthesizes selector strategies from the snapshot,
//! normalizes the coordinates against the recording-time screen and appends
//! one numbered step. `finalize` yields the [`WorkflowDefinition`] to persist.
//!
//! [`WorkflowDefinition`]: waymark_core_types::WorkflowDefinition

pub mod errors;
pub mod session;
pub mod types;

pub use errors::*;
pub use session::*;
pub use types::*;
