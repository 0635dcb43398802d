//! Workflow persistence
//!
//! Single workflow files in JSON or YAML, and a directory-backed library
//! that indexes saved workflows in `metadata.json`.

pub mod errors;
pub mod format;
pub mod layout;
pub mod library;
pub mod model;
mod writer;

pub use errors::{StoreError, StoreResult};
pub use format::{load, load_validated, save, WorkflowFormat};
pub use library::{SearchFilter, WorkflowLibrary};
pub use model::{GenerationMode, WorkflowMetadata};
