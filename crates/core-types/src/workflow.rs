//! Workflow definition persisted between recording and replay

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::actions::Action;
use crate::errors::SchemaError;

fn default_version() -> String {
    "1.0".to_string()
}

fn default_wait_time() -> f64 {
    0.5
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
    String,
    Number,
    Bool,
}

/// Declaration of a workflow input variable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputVariable {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: VariableType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default = "default_true")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl InputVariable {
    pub fn new(name: impl Into<String>, kind: VariableType) -> Self {
        Self {
            name: name.into(),
            kind,
            format: None,
            required: true,
            default: None,
            description: None,
        }
    }

    pub fn optional(mut self, default: impl Into<Value>) -> Self {
        self.required = false;
        self.default = Some(default.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkflowStep {
    pub step_number: u32,
    pub action: Action,
}

impl WorkflowStep {
    pub fn new(step_number: u32, action: Action) -> Self {
        Self {
            step_number,
            action,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_version")]
    pub version: String,
    pub steps: Vec<WorkflowStep>,
    #[serde(default)]
    pub input_schema: Vec<InputVariable>,
    /// Seconds.
    #[serde(default = "default_wait_time")]
    pub default_wait_time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_analysis: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl WorkflowDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            version: default_version(),
            steps: Vec::new(),
            input_schema: Vec::new(),
            default_wait_time: default_wait_time(),
            workflow_analysis: None,
            tags: Vec::new(),
        }
    }

    pub fn with_step(mut self, action: Action) -> Self {
        let next = self.steps.iter().map(|s| s.step_number).max().unwrap_or(0) + 1;
        self.steps.push(WorkflowStep::new(next, action));
        self
    }

    pub fn with_input(mut self, input: InputVariable) -> Self {
        self.input_schema.push(input);
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Steps sorted by ascending step number.
    pub fn ordered_steps(&self) -> Vec<&WorkflowStep> {
        let mut steps: Vec<&WorkflowStep> = self.steps.iter().collect();
        steps.sort_by_key(|step| step.step_number);
        steps
    }

    pub fn step(&self, step_number: u32) -> Option<&WorkflowStep> {
        self.steps.iter().find(|s| s.step_number == step_number)
    }

    /// Structural checks that must hold before any step runs.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.name.trim().is_empty() {
            return Err(SchemaError::EmptyName);
        }
        if self.steps.is_empty() {
            return Err(SchemaError::EmptySteps);
        }
        let mut seen = HashSet::new();
        for step in &self.steps {
            if step.step_number == 0 {
                return Err(SchemaError::InvalidStepNumber(step.step_number));
            }
            if !seen.insert(step.step_number) {
                return Err(SchemaError::DuplicateStepNumber(step.step_number));
            }
        }
        Ok(())
    }
}
