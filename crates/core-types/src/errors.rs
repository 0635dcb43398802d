use thiserror::Error;

/// Structural problems in a workflow definition.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SchemaError {
    #[error("workflow name cannot be empty")]
    EmptyName,

    #[error("workflow must contain at least one step")]
    EmptySteps,

    #[error("step numbers must be positive (found {0})")]
    InvalidStepNumber(u32),

    #[error("duplicate step number {0}")]
    DuplicateStepNumber(u32),
}
