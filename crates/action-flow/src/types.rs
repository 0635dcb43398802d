//! Core types for workflow replay

use std::collections::HashMap;
use std::path::PathBuf;

use action_locator::FinderConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use waymark_core_types::RunId;

/// Replay settings
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutorConfig {
    /// Element finder budget per strategy
    pub finder: FinderConfig,

    /// Upper bound for navigation, back and forward (milliseconds)
    pub navigation_timeout_ms: u64,

    /// Fall back to recorded coordinates when every strategy fails
    pub allow_coordinate_fallback: bool,

    /// Capture a screenshot after every step
    pub screenshots: bool,

    pub screenshots_dir: PathBuf,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            finder: FinderConfig::default(),
            navigation_timeout_ms: 30_000,
            allow_coordinate_fallback: true,
            screenshots: false,
            screenshots_dir: PathBuf::from("workflows/playback_screenshots"),
        }
    }
}

/// Step execution result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub step_number: u32,

    pub action_type: String,

    pub success: bool,

    /// Human-readable outcome, e.g. `Clicked element using id:login`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Seconds
    pub duration: f64,

    /// Strategies that failed before the target was resolved (or all of them)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub strategy_errors: Vec<String>,
}

impl StepResult {
    pub fn success(step_number: u32, action_type: &str, result: String, duration: f64) -> Self {
        Self {
            step_number,
            action_type: action_type.to_string(),
            success: true,
            result: Some(result),
            error: None,
            duration,
            strategy_errors: Vec::new(),
        }
    }

    pub fn failure(step_number: u32, action_type: &str, error: String, duration: f64) -> Self {
        Self {
            step_number,
            action_type: action_type.to_string(),
            success: false,
            result: None,
            error: Some(error),
            duration,
            strategy_errors: Vec::new(),
        }
    }

    pub fn with_strategy_errors(mut self, errors: Vec<String>) -> Self {
        self.strategy_errors = errors;
        self
    }
}

/// Outcome of one replay run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub run_id: RunId,

    pub workflow_name: String,

    pub success: bool,

    pub steps_completed: usize,

    /// Steps scheduled to run (step number at or after the start step)
    pub total_steps: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_step: Option<u32>,

    /// Variables and extracted values at the end of the run
    pub extracted_data: HashMap<String, serde_json::Value>,

    pub started_at: DateTime<Utc>,

    pub finished_at: DateTime<Utc>,

    /// Seconds
    pub execution_time: f64,

    pub step_results: Vec<StepResult>,
}

impl ExecutionResult {
    pub fn new(workflow_name: impl Into<String>, total_steps: usize) -> Self {
        let now = Utc::now();
        Self {
            run_id: RunId::new(),
            workflow_name: workflow_name.into(),
            success: false,
            steps_completed: 0,
            total_steps,
            error_message: None,
            failed_step: None,
            extracted_data: HashMap::new(),
            started_at: now,
            finished_at: now,
            execution_time: 0.0,
            step_results: Vec::new(),
        }
    }

    /// Record a step result; successful steps count towards `steps_completed`.
    pub fn push_step(&mut self, result: StepResult) {
        if result.success {
            self.steps_completed += 1;
        }
        self.step_results.push(result);
    }

    /// Set finish time and calculate execution time
    pub fn finish(
        mut self,
        error: Option<(u32, String)>,
        extracted_data: HashMap<String, serde_json::Value>,
    ) -> Self {
        self.finished_at = Utc::now();
        self.execution_time =
            (self.finished_at - self.started_at).num_milliseconds().max(0) as f64 / 1000.0;
        self.extracted_data = extracted_data;
        match error {
            Some((step, message)) => {
                self.success = false;
                self.failed_step = Some(step);
                self.error_message = Some(message);
            }
            None => self.success = true,
        }
        self
    }

    pub fn last_step(&self) -> Option<&StepResult> {
        self.step_results.last()
    }
}
