use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use workflow_store::WorkflowLibrary;

use crate::config::Config;

pub struct CliContext {
    config: Arc<Config>,
    config_path: PathBuf,
}

impl CliContext {
    pub fn new(config: Config, config_path: PathBuf) -> Self {
        Self {
            config: Arc::new(config),
            config_path,
        }
    }

    pub fn config(&self) -> &Config {
        self.config.as_ref()
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Open the library at `dir`, or at the configured storage directory.
    pub fn library(&self, dir: Option<&Path>) -> Result<WorkflowLibrary> {
        let root = dir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.config.library.storage_dir.clone());
        WorkflowLibrary::open(&root)
            .with_context(|| format!("Failed to open workflow library at {}", root.display()))
    }
}
