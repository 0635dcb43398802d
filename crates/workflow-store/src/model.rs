use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use waymark_core_types::{WorkflowDefinition, WorkflowId};

use crate::errors::StoreError;

/// How a stored workflow was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    #[default]
    Manual,
    Ai,
}

impl GenerationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationMode::Manual => "manual",
            GenerationMode::Ai => "ai",
        }
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GenerationMode {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "manual" => Ok(GenerationMode::Manual),
            "ai" => Ok(GenerationMode::Ai),
            other => Err(StoreError::Validation(format!(
                "unknown generation mode '{}'",
                other
            ))),
        }
    }
}

/// Library index entry for one stored workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowMetadata {
    pub id: WorkflowId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub version: String,
    pub file_path: PathBuf,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub generation_mode: GenerationMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_task: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl WorkflowMetadata {
    pub fn new(
        workflow: &WorkflowDefinition,
        file_path: PathBuf,
        generation_mode: GenerationMode,
        original_task: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: WorkflowId::new(),
            name: workflow.name.clone(),
            description: workflow.description.clone(),
            version: workflow.version.clone(),
            file_path,
            created_at: now,
            updated_at: now,
            generation_mode,
            original_task,
            tags: workflow.tags.clone(),
        }
    }

    /// Refresh the descriptive fields after the workflow was rewritten.
    pub fn touch(&mut self, workflow: &WorkflowDefinition) {
        self.name = workflow.name.clone();
        self.description = workflow.description.clone();
        self.version = workflow.version.clone();
        self.tags = workflow.tags.clone();
        self.updated_at = Utc::now();
    }

    /// Case-insensitive match against name or description.
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
    }
}
