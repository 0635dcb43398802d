//! Shared schema for recorded workflows.
//!
//! Every other waymark crate speaks in these types: selector strategies and
//! element contexts produced at recording time, the tagged action union, and
//! the workflow definition that is persisted and replayed.

pub mod actions;
pub mod errors;
pub mod ids;
pub mod selectors;
pub mod snapshot;
pub mod workflow;

pub use actions::{Action, ActionKind};
pub use errors::SchemaError;
pub use ids::{RunId, WorkflowId};
pub use selectors::{BoundingBox, CoordinateInfo, ElementContext, SelectorStrategy, SelectorType};
pub use snapshot::{implicit_role, ElementSnapshot};
pub use workflow::{InputVariable, VariableType, WorkflowDefinition, WorkflowStep};
