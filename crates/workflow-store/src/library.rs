//! Workflow library
//!
//! A directory holding `definitions/*.json` plus a `metadata.json` index.
//! Entry paths are stored relative to the library root.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use waymark_core_types::{WorkflowDefinition, WorkflowId};

use crate::errors::{StoreError, StoreResult};
use crate::format;
use crate::layout::{definition_path, definitions_dir, metadata_path, DEFINITIONS_DIR};
use crate::model::{GenerationMode, WorkflowMetadata};
use crate::writer::{remove_file, write_atomic};

/// Filter for [`WorkflowLibrary::search`]. Empty filters match everything.
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    pub query: Option<String>,
    /// Every listed tag must be present on the entry.
    pub tags: Vec<String>,
    pub generation_mode: Option<GenerationMode>,
}

impl SearchFilter {
    fn accepts(&self, entry: &WorkflowMetadata) -> bool {
        if let Some(query) = self.query.as_deref().filter(|q| !q.trim().is_empty()) {
            if !entry.matches_query(query.trim()) {
                return false;
            }
        }
        if !self
            .tags
            .iter()
            .all(|tag| entry.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)))
        {
            return false;
        }
        match self.generation_mode {
            Some(mode) => entry.generation_mode == mode,
            None => true,
        }
    }
}

pub struct WorkflowLibrary {
    root: PathBuf,
    entries: Vec<WorkflowMetadata>,
}

impl WorkflowLibrary {
    /// Open (or create) the library rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        let definitions = definitions_dir(&root);
        fs::create_dir_all(&definitions).map_err(|err| StoreError::io(&definitions, err))?;

        let entries = load_index(&metadata_path(&root));
        debug!(root = %root.display(), entries = entries.len(), "Opened workflow library");
        Ok(Self { root, entries })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Store `workflow` and index it. A workflow whose name maps to an
    /// existing definition file replaces that entry and keeps its id.
    pub fn save(
        &mut self,
        workflow: &WorkflowDefinition,
        generation_mode: GenerationMode,
        original_task: Option<String>,
    ) -> StoreResult<WorkflowMetadata> {
        let absolute = definition_path(&self.root, &workflow.name)?;
        let relative = self.relative(&absolute);
        format::save(workflow, &absolute)?;

        let metadata = match self.entries.iter_mut().find(|e| e.file_path == relative) {
            Some(existing) => {
                existing.touch(workflow);
                existing.generation_mode = generation_mode;
                existing.original_task = original_task;
                existing.clone()
            }
            None => {
                let entry = WorkflowMetadata::new(workflow, relative, generation_mode, original_task);
                self.entries.push(entry.clone());
                entry
            }
        };
        self.persist()?;
        info!(id = %metadata.id, name = %metadata.name, "Saved workflow to library");
        Ok(metadata)
    }

    /// Rewrite the definition of an existing entry.
    pub fn update(
        &mut self,
        id: &WorkflowId,
        workflow: &WorkflowDefinition,
    ) -> StoreResult<WorkflowMetadata> {
        let root = self.root.clone();
        let entry = self
            .entries
            .iter_mut()
            .find(|e| &e.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        format::save(workflow, &root.join(&entry.file_path))?;
        entry.touch(workflow);
        let metadata = entry.clone();
        self.persist()?;
        Ok(metadata)
    }

    pub fn metadata(&self, id: &WorkflowId) -> Option<&WorkflowMetadata> {
        self.entries.iter().find(|e| &e.id == id)
    }

    /// Load the definition for `id`. Unknown ids yield `Ok(None)`.
    pub fn get(&self, id: &WorkflowId) -> StoreResult<Option<WorkflowDefinition>> {
        match self.metadata(id) {
            Some(entry) => format::load(&self.root.join(&entry.file_path)).map(Some),
            None => Ok(None),
        }
    }

    /// Case-insensitive lookup by workflow name.
    pub fn get_by_name(&self, name: &str) -> StoreResult<Option<WorkflowDefinition>> {
        let wanted = name.to_lowercase();
        match self.entries.iter().find(|e| e.name.to_lowercase() == wanted) {
            Some(entry) => self.get(&entry.id),
            None => Ok(None),
        }
    }

    pub fn list(&self) -> &[WorkflowMetadata] {
        &self.entries
    }

    /// Remove the entry and its definition file. Returns false for unknown ids.
    pub fn delete(&mut self, id: &WorkflowId) -> StoreResult<bool> {
        let Some(index) = self.entries.iter().position(|e| &e.id == id) else {
            return Ok(false);
        };
        let entry = self.entries.remove(index);
        remove_file(&self.root.join(&entry.file_path))?;
        self.persist()?;
        info!(id = %entry.id, name = %entry.name, "Deleted workflow from library");
        Ok(true)
    }

    pub fn search(&self, filter: &SearchFilter) -> Vec<&WorkflowMetadata> {
        self.entries.iter().filter(|e| filter.accepts(e)).collect()
    }

    fn relative(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| Path::new(DEFINITIONS_DIR).join(path.file_name().unwrap_or_default()))
    }

    fn persist(&self) -> StoreResult<()> {
        let content = serde_json::to_string_pretty(&self.entries)
            .map_err(|err| StoreError::Serialize(err.to_string()))?;
        write_atomic(&metadata_path(&self.root), content.as_bytes())
    }
}

fn load_index(path: &Path) -> Vec<WorkflowMetadata> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "Failed to read library index");
            return Vec::new();
        }
    };
    match serde_json::from_str(&content) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "Library index is corrupt, starting empty");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waymark_core_types::Action;

    fn workflow(name: &str) -> WorkflowDefinition {
        WorkflowDefinition::new(name, format!("{name} description"))
            .with_step(Action::navigation("https://example.com"))
    }

    #[test]
    fn open_creates_layout() {
        let dir = tempfile::tempdir().unwrap();
        let library = WorkflowLibrary::open(dir.path().join("lib")).unwrap();
        assert!(library.root().join("definitions").is_dir());
        assert!(library.list().is_empty());
    }

    #[test]
    fn saving_the_same_name_replaces_the_entry() {
        let dir = tempfile::tempdir().unwrap();
        let mut library = WorkflowLibrary::open(dir.path()).unwrap();
        let first = library.save(&workflow("Login Flow"), GenerationMode::Manual, None).unwrap();
        let second = library
            .save(&workflow("login flow"), GenerationMode::Ai, Some("log in".into()))
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(library.list().len(), 1);
        assert_eq!(second.generation_mode, GenerationMode::Ai);
        assert_eq!(second.file_path, PathBuf::from("definitions/login_flow.json"));
    }

    #[test]
    fn names_cannot_escape_the_definitions_dir() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("lib");
        let mut library = WorkflowLibrary::open(&root).unwrap();
        let saved = library
            .save(&workflow("../../escaped"), GenerationMode::Manual, None)
            .unwrap();

        assert_eq!(saved.file_path, PathBuf::from("definitions/escaped.json"));
        assert!(root.join("definitions/escaped.json").is_file());
        assert!(!dir.path().join("escaped.json").exists());
        assert!(library.get(&saved.id).unwrap().is_some());

        let err = library
            .save(&workflow("/.."), GenerationMode::Manual, None)
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(library.list().len(), 1);
    }

    #[test]
    fn corrupt_index_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("metadata.json"), "not json").unwrap();
        let library = WorkflowLibrary::open(dir.path()).unwrap();
        assert!(library.list().is_empty());
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut library = WorkflowLibrary::open(dir.path()).unwrap();
        let err = library
            .update(&WorkflowId::from("missing"), &workflow("x"))
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
