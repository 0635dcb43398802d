//! Flow execution error types

use action_locator::LocatorError;
use action_primitives::ActionError;
use thiserror::Error;
use waymark_core_types::SchemaError;

/// Flow execution errors
#[derive(Debug, Error)]
pub enum FlowError {
    /// Workflow is malformed; raised before any browser interaction
    #[error("Workflow validation failed: {0}")]
    ValidationFailed(String),

    /// Every strategy and the coordinate fallback were exhausted
    #[error(transparent)]
    ElementNotFound(LocatorError),

    /// The primitive failed after its target was resolved
    #[error("{action} action failed at step {step}: {source}")]
    ActionFailed {
        step: u32,
        action: &'static str,
        #[source]
        source: ActionError,
    },

    /// Action needs a live element but only coordinates were available
    #[error("{action} action at step {step} requires a live element, got {target}")]
    MissingElement {
        step: u32,
        action: &'static str,
        target: String,
    },

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl FlowError {
    pub fn action(step: u32, action: &'static str, source: ActionError) -> Self {
        FlowError::ActionFailed {
            step,
            action,
            source,
        }
    }

    /// Per-strategy failure reasons, when the step failed to resolve its element.
    pub fn strategy_errors(&self) -> &[String] {
        match self {
            FlowError::ElementNotFound(err) => err.strategy_errors(),
            _ => &[],
        }
    }
}

impl From<SchemaError> for FlowError {
    fn from(err: SchemaError) -> Self {
        FlowError::ValidationFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_errors_become_validation_failures() {
        let err: FlowError = SchemaError::EmptySteps.into();
        assert!(matches!(err, FlowError::ValidationFailed(_)));
    }

    #[test]
    fn not_found_keeps_strategy_detail() {
        let err = FlowError::ElementNotFound(LocatorError::ElementNotFound {
            target_text: "Go".into(),
            tried: 1,
            coordinate_fallback_attempted: false,
            errors: vec!["id: no element matches #go".into()],
        });
        assert_eq!(err.strategy_errors().len(), 1);
        assert!(err.to_string().starts_with("Could not find element 'Go'"));
    }

    #[test]
    fn action_failures_name_the_step() {
        let err = FlowError::action(4, "click", ActionError::NotVisible("#a".into()));
        assert!(err.to_string().starts_with("click action failed at step 4"));
    }
}
