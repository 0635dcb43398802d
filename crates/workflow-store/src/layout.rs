use std::path::{Path, PathBuf};

use crate::errors::{StoreError, StoreResult};

pub const DEFINITIONS_DIR: &str = "definitions";
pub const METADATA_FILE: &str = "metadata.json";

pub fn definitions_dir(root: &Path) -> PathBuf {
    root.join(DEFINITIONS_DIR)
}

pub fn metadata_path(root: &Path) -> PathBuf {
    root.join(METADATA_FILE)
}

/// File stem for a workflow name: lowercase `[a-z0-9_-]`, every other
/// character mapped to `_`, runs of `_` collapsed and trimmed.
pub fn file_stem(workflow_name: &str) -> StoreResult<String> {
    let mut stem = String::with_capacity(workflow_name.len());
    for ch in workflow_name.to_lowercase().chars() {
        let ch = if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' {
            ch
        } else {
            '_'
        };
        if ch == '_' && stem.ends_with('_') {
            continue;
        }
        stem.push(ch);
    }
    let stem = stem.trim_matches('_');
    if stem.is_empty() {
        return Err(StoreError::Validation(format!(
            "workflow name '{}' has no usable file name characters",
            workflow_name
        )));
    }
    Ok(stem.to_string())
}

/// `definitions/{file_stem}.json`, always directly inside `definitions/`.
pub fn definition_path(root: &Path, workflow_name: &str) -> StoreResult<PathBuf> {
    let file = format!("{}.json", file_stem(workflow_name)?);
    Ok(definitions_dir(root).join(file))
}
