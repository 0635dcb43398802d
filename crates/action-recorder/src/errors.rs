//! Error types for recording sessions

use std::path::PathBuf;

use thiserror::Error;

use crate::types::ActionType;

#[derive(Debug, Error)]
pub enum RecorderError {
    /// Element-targeting action observed without snapshot or coordinates
    #[error("Element context required for {0} action")]
    MissingElement(ActionType),

    #[error("Parameter '{key}' must be {expected}")]
    InvalidParameter { key: String, expected: &'static str },

    #[error("Unsupported action type: {0}")]
    UnknownActionType(String),

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
