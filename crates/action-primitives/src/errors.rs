//! Error types for browser primitives

use thiserror::Error;

/// Failures reported by a [`crate::BrowserDriver`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ActionError {
    /// Navigation timed out waiting for page load
    #[error("Navigation timeout: {0}")]
    NavTimeout(String),

    /// Wait operation timed out
    #[error("Wait timeout: {0}")]
    WaitTimeout(String),

    /// Query matched nothing or the handle no longer points at an element
    #[error("Element not found: {0}")]
    NotFound(String),

    /// Element exists but is not rendered
    #[error("Element not visible: {0}")]
    NotVisible(String),

    /// Element cannot receive the requested input
    #[error("Element not interactable: {0}")]
    NotInteractable(String),

    /// Dropdown option was not found
    #[error("Option not found in dropdown: {0}")]
    OptionNotFound(String),

    /// Query could not be evaluated (malformed selector, script exception)
    #[error("Script error: {0}")]
    Script(String),

    /// CDP communication or protocol error
    #[error("CDP I/O error: {0}")]
    CdpIo(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ActionError {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ActionError::WaitTimeout(_) | ActionError::NotVisible(_) | ActionError::CdpIo(_)
        )
    }

    /// Get error severity level (0=low, 1=medium, 2=high, 3=critical)
    pub fn severity(&self) -> u8 {
        match self {
            ActionError::Internal(_) => 3,
            ActionError::NavTimeout(_) | ActionError::CdpIo(_) => 2,
            ActionError::WaitTimeout(_)
            | ActionError::NotFound(_)
            | ActionError::NotVisible(_)
            | ActionError::Script(_) => 1,
            _ => 0,
        }
    }
}
