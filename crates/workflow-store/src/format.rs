//! Workflow files on disk
//!
//! The format is chosen by extension: `.yaml`/`.yml` for YAML, `.json` for
//! pretty-printed JSON. Unknown fields are ignored on load.

use std::fs;
use std::path::Path;

use tracing::debug;
use waymark_core_types::WorkflowDefinition;

use crate::errors::{StoreError, StoreResult};
use crate::writer::write_atomic;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowFormat {
    Json,
    Yaml,
}

impl WorkflowFormat {
    pub fn from_path(path: &Path) -> StoreResult<Self> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => Ok(WorkflowFormat::Json),
            Some("yaml") | Some("yml") => Ok(WorkflowFormat::Yaml),
            _ => Err(StoreError::UnsupportedFormat(path.display().to_string())),
        }
    }

    pub fn parse(&self, content: &str) -> Result<WorkflowDefinition, String> {
        match self {
            WorkflowFormat::Json => serde_json::from_str(content).map_err(|err| err.to_string()),
            WorkflowFormat::Yaml => serde_yaml::from_str(content).map_err(|err| err.to_string()),
        }
    }

    pub fn render(&self, workflow: &WorkflowDefinition) -> StoreResult<String> {
        match self {
            WorkflowFormat::Json => serde_json::to_string_pretty(workflow)
                .map_err(|err| StoreError::Serialize(err.to_string())),
            WorkflowFormat::Yaml => {
                serde_yaml::to_string(workflow).map_err(|err| StoreError::Serialize(err.to_string()))
            }
        }
    }
}

/// Read a workflow file.
pub fn load(path: &Path) -> StoreResult<WorkflowDefinition> {
    let format = WorkflowFormat::from_path(path)?;
    let content = fs::read_to_string(path).map_err(|err| StoreError::io(path, err))?;
    let workflow = format.parse(&content).map_err(|message| StoreError::Parse {
        path: path.to_path_buf(),
        message,
    })?;
    debug!(path = %path.display(), steps = workflow.steps.len(), "Loaded workflow");
    Ok(workflow)
}

/// Read a workflow file and check its structure.
pub fn load_validated(path: &Path) -> StoreResult<WorkflowDefinition> {
    let workflow = load(path)?;
    workflow
        .validate()
        .map_err(|err| StoreError::Validation(err.to_string()))?;
    Ok(workflow)
}

/// Write `workflow` to `path`, creating parent directories.
pub fn save(workflow: &WorkflowDefinition, path: &Path) -> StoreResult<()> {
    let format = WorkflowFormat::from_path(path)?;
    let content = format.render(workflow)?;
    write_atomic(path, content.as_bytes())?;
    debug!(path = %path.display(), workflow = %workflow.name, "Saved workflow");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use waymark_core_types::{
        Action, ActionKind, CoordinateInfo, ElementContext, InputVariable, SelectorStrategy,
        SelectorType, VariableType,
    };

    fn sample() -> WorkflowDefinition {
        let element = ElementContext::new("Sign in")
            .with_strategies(vec![
                SelectorStrategy::new(SelectorType::Id, "login", 1).with_metadata("tag", "button"),
                SelectorStrategy::new(SelectorType::TextFuzzy, "Sign in", 2)
                    .with_metadata("threshold", 0.8),
            ])
            .with_coordinates(CoordinateInfo::absolute(10, 20));
        WorkflowDefinition::new("Login", "Sign in to the dashboard")
            .with_input(InputVariable::new("user", VariableType::String))
            .with_tag("auth")
            .with_step(Action::navigation("https://example.com/{user}").with_wait_time(1.0))
            .with_step(Action::click(element))
            .with_step(Action::new(ActionKind::Scroll {
                scroll_x: 0,
                scroll_y: 250,
            }))
    }

    #[test]
    fn json_and_yaml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let workflow = sample();
        for name in ["nested/flow.json", "flow.yaml", "flow.YML"] {
            let path = dir.path().join(name);
            save(&workflow, &path).unwrap();
            assert_eq!(load(&path).unwrap(), workflow, "{name}");
        }
        let json = fs::read_to_string(dir.path().join("nested/flow.json")).unwrap();
        assert!(json.contains("\n  \"name\": \"Login\""));
    }

    #[test]
    fn unsupported_extensions_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = save(&sample(), &dir.path().join("flow.toml")).unwrap_err();
        assert!(matches!(err, StoreError::UnsupportedFormat(_)));
        assert!(matches!(
            load(&dir.path().join("flow")),
            Err(StoreError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn unknown_fields_are_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("extra.yaml");
        fs::write(
            &path,
            "name: Extra\nauthor: someone\nsteps:\n  - step_number: 1\n    action:\n      type: go_back\n      confidence: 0.9\n",
        )
        .unwrap();
        let workflow = load(&path).unwrap();
        assert_eq!(workflow.version, "1.0");
        assert_eq!(workflow.steps[0].action.kind, ActionKind::GoBack);
    }

    #[test]
    fn validation_and_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty.json");
        fs::write(&empty, r#"{"name": "Empty", "steps": []}"#).unwrap();
        assert!(load(&empty).is_ok());
        assert!(matches!(load_validated(&empty), Err(StoreError::Validation(_))));

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{").unwrap();
        assert!(matches!(load(&broken), Err(StoreError::Parse { .. })));

        assert!(matches!(
            load(&dir.path().join("missing.json")),
            Err(StoreError::Io { .. })
        ));
    }
}
