//! Error types for locator system

use action_primitives::ActionError;
use thiserror::Error;

fn fallback_note(attempted: &bool) -> &'static str {
    if *attempted {
        "Coordinate fallback also failed"
    } else {
        "Coordinate fallback was not attempted"
    }
}

/// Locator error enumeration
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LocatorError {
    /// One strategy could not find or verify an element; cascaded past
    #[error("Strategy '{strategy}' failed: {reason}")]
    StrategyFailed { strategy: String, reason: String },

    /// Every strategy and the coordinate fallback were exhausted
    #[error(
        "Could not find element '{target_text}'. Tried {tried} selector strategies. {}. Errors: {}",
        fallback_note(.coordinate_fallback_attempted),
        .errors.join("; ")
    )]
    ElementNotFound {
        target_text: String,
        tried: usize,
        coordinate_fallback_attempted: bool,
        errors: Vec<String>,
    },

    /// Strategy cannot be translated into a page query
    #[error("Invalid strategy: {0}")]
    InvalidStrategy(String),

    /// Driver failure outside of a strategy attempt
    #[error("Driver error: {0}")]
    Driver(#[from] ActionError),
}

impl LocatorError {
    /// Per-strategy failure reasons carried by a not-found error.
    pub fn strategy_errors(&self) -> &[String] {
        match self {
            LocatorError::ElementNotFound { errors, .. } => errors,
            _ => &[],
        }
    }

    /// `"{strategy}: {reason}"` for strategy failures, the full message otherwise.
    pub fn summary(&self) -> String {
        match self {
            LocatorError::StrategyFailed { strategy, reason } => format!("{}: {}", strategy, reason),
            other => other.to_string(),
        }
    }

    /// Get error severity (0=low, 1=medium, 2=high, 3=critical)
    pub fn severity(&self) -> u8 {
        match self {
            LocatorError::Driver(err) => err.severity().max(2),
            LocatorError::ElementNotFound { .. } => 2,
            LocatorError::StrategyFailed { .. } | LocatorError::InvalidStrategy(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_lists_everything() {
        let err = LocatorError::ElementNotFound {
            target_text: "Submit".into(),
            tried: 2,
            coordinate_fallback_attempted: true,
            errors: vec!["id: no match".into(), "css: timed out".into()],
        };
        assert_eq!(
            err.to_string(),
            "Could not find element 'Submit'. Tried 2 selector strategies. \
             Coordinate fallback also failed. Errors: id: no match; css: timed out"
        );
        assert_eq!(err.strategy_errors().len(), 2);
        assert_eq!(err.severity(), 2);
    }

    #[test]
    fn strategy_failures_summarize_compactly() {
        let err = LocatorError::StrategyFailed {
            strategy: "css".into(),
            reason: "timed out after 40ms".into(),
        };
        assert_eq!(err.summary(), "css: timed out after 40ms");
        assert_eq!(err.to_string(), "Strategy 'css' failed: timed out after 40ms");
    }

    #[test]
    fn driver_errors_convert() {
        let err: LocatorError = ActionError::CdpIo("closed".into()).into();
        assert!(matches!(err, LocatorError::Driver(_)));
        assert!(err.strategy_errors().is_empty());
    }
}
