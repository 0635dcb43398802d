//! Recording session
//!
//! A [`RecordingSession`] owns the step counter and the accumulated steps of
//! one recording. Each observed action becomes exactly one [`WorkflowStep`];
//! steps are appended in observation order and numbered from 1.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use action_locator::{coordinate_info, SelectorGenerator};
use action_primitives::Viewport;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::{debug, info};
use waymark_core_types::{
    Action, ActionKind, ElementContext, ElementSnapshot, WorkflowDefinition, WorkflowStep,
};

use crate::errors::RecorderError;
use crate::types::{ActionType, Observation};

const DEFAULT_WAIT_SECONDS: f64 = 5.0;

pub struct RecordingSession {
    name: String,
    description: String,
    screen: Viewport,
    record_screenshots: bool,
    generator: SelectorGenerator,
    steps: Vec<WorkflowStep>,
    step_counter: u32,
    reasoning_log: Vec<String>,
    screenshots: Vec<(u32, Vec<u8>)>,
    started_at: DateTime<Utc>,
    started: Instant,
}

impl RecordingSession {
    /// `screen` is the recording-time viewport used to normalize coordinates.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        screen: Viewport,
        record_screenshots: bool,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            screen,
            record_screenshots,
            generator: SelectorGenerator::default(),
            steps: Vec::new(),
            step_counter: 0,
            reasoning_log: Vec::new(),
            screenshots: Vec::new(),
            started_at: Utc::now(),
            started: Instant::now(),
        }
    }

    pub fn with_generator(mut self, generator: SelectorGenerator) -> Self {
        self.generator = generator;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append one step for `observation`.
    ///
    /// Fails without consuming a step number when the action cannot be built.
    pub fn observe(&mut self, observation: Observation) -> Result<&WorkflowStep, RecorderError> {
        let element = self.element_context(&observation);
        let action = build_action(&observation, element)?;

        self.step_counter += 1;
        let step_number = self.step_counter;

        if let Some(reasoning) = observation.reasoning.as_deref().filter(|r| !r.is_empty()) {
            self.reasoning_log
                .push(format!("Step {}: {}", step_number, reasoning));
        }
        if self.record_screenshots {
            if let Some(bytes) = observation.screenshot {
                self.screenshots.push((step_number, bytes));
            }
        }

        info!(
            step = step_number,
            action = %action.kind,
            strategies = action.kind.element().map(|e| e.selector_strategies.len()).unwrap_or(0),
            "Recorded step"
        );

        self.steps.push(WorkflowStep::new(step_number, action));
        let index = self.steps.len() - 1;
        Ok(&self.steps[index])
    }

    fn element_context(&self, observation: &Observation) -> Option<ElementContext> {
        let snapshot = observation.snapshot.as_ref();
        if snapshot.is_none() && observation.point.is_none() {
            return None;
        }

        let strategies = snapshot
            .map(|snap| self.generator.generate(snap))
            .unwrap_or_default();
        let coordinates = observation.point.map(|(x, y)| {
            coordinate_info(x, y, self.screen, snapshot.and_then(|s| s.bounding_box))
        });

        let mut context = ElementContext::new(target_text(observation))
            .with_strategies(strategies);
        context.coordinates = coordinates;
        context.element_tag = snapshot
            .map(ElementSnapshot::normalized_tag)
            .filter(|tag| !tag.is_empty());
        context.element_attributes = snapshot
            .map(ElementSnapshot::attributes_map)
            .filter(|attrs| !attrs.is_empty());
        context.page_url = observation
            .parameters
            .get("url")
            .and_then(Value::as_str)
            .map(str::to_string);

        debug!(
            target_text = %context.target_text,
            strategies = context.selector_strategies.len(),
            has_coordinates = context.has_coordinates(),
            "Built element context"
        );
        Some(context)
    }

    /// Workflow made of every step recorded so far.
    pub fn finalize(&self) -> WorkflowDefinition {
        let mut workflow = WorkflowDefinition::new(self.name.clone(), self.description.clone());
        workflow.steps = self.steps.clone();
        if !self.reasoning_log.is_empty() {
            workflow.workflow_analysis = Some(self.reasoning_log.join("\n"));
        }
        info!(
            workflow = %self.name,
            steps = workflow.steps.len(),
            "Finalized recording"
        );
        workflow
    }

    pub fn steps(&self) -> &[WorkflowStep] {
        &self.steps
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn duration(&self) -> Duration {
        self.started.elapsed()
    }

    /// Drop every step, screenshot and reasoning entry and restart numbering.
    pub fn clear(&mut self) {
        self.steps.clear();
        self.step_counter = 0;
        self.reasoning_log.clear();
        self.screenshots.clear();
        self.started_at = Utc::now();
        self.started = Instant::now();
    }

    /// Write captured screenshots as `{name}_step_{n}.png` under `dir`.
    pub fn save_screenshots(&self, dir: &Path) -> Result<Vec<PathBuf>, RecorderError> {
        if self.screenshots.is_empty() {
            return Ok(Vec::new());
        }
        fs::create_dir_all(dir).map_err(|source| RecorderError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut saved = Vec::with_capacity(self.screenshots.len());
        for (step_number, bytes) in &self.screenshots {
            let path = dir.join(format!("{}_step_{}.png", self.name, step_number));
            fs::write(&path, bytes).map_err(|source| RecorderError::Io {
                path: path.clone(),
                source,
            })?;
            saved.push(path);
        }
        debug!(count = saved.len(), dir = %dir.display(), "Saved recording screenshots");
        Ok(saved)
    }
}

fn target_text(observation: &Observation) -> String {
    let from_snapshot = observation
        .snapshot
        .as_ref()
        .map(|snap| snap.trimmed_text().to_string())
        .filter(|text| !text.is_empty());
    if let Some(text) = from_snapshot {
        return text;
    }
    if observation.snapshot.is_none() {
        if let Some((x, y)) = observation.point {
            return format!("Element at ({}, {})", x, y);
        }
    }
    observation
        .reasoning
        .clone()
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| "Element".to_string())
}

fn build_action(
    observation: &Observation,
    element: Option<ElementContext>,
) -> Result<Action, RecorderError> {
    let params = &observation.parameters;
    let action_type = observation.action_type;
    let required = |element: Option<ElementContext>| {
        element.ok_or(RecorderError::MissingElement(action_type))
    };

    let kind = match action_type {
        ActionType::Navigation => ActionKind::Navigation {
            url: string_param(params, "url")?.unwrap_or_default(),
        },
        ActionType::Click => ActionKind::Click {
            element: required(element)?,
        },
        ActionType::Input => ActionKind::Input {
            element: required(element)?,
            value: string_param(params, "text")?.unwrap_or_default(),
            default_value: string_param(params, "default_value")?,
            clear_before: bool_param(params, "clear_before_typing", true)?,
            press_enter: bool_param(params, "press_enter", false)?,
        },
        ActionType::SelectChange => ActionKind::SelectChange {
            element: required(element)?,
            selected_text: string_param(params, "selected_text")?.unwrap_or_default(),
        },
        ActionType::KeyPress => ActionKind::KeyPress {
            element,
            key: match string_param(params, "key")? {
                Some(key) => key,
                None => string_param(params, "keys")?.unwrap_or_default(),
            },
        },
        ActionType::Scroll => ActionKind::Scroll {
            scroll_x: int_param(params, "scroll_x", 0)?,
            scroll_y: int_param(params, "scroll_y", 0)?,
        },
        ActionType::GoBack => ActionKind::GoBack,
        ActionType::GoForward => ActionKind::GoForward,
        ActionType::Extract => ActionKind::Extract {
            extraction_goal: string_param(params, "goal")?.unwrap_or_default(),
        },
        ActionType::Wait => ActionKind::Wait {
            duration: float_param(params, "duration", DEFAULT_WAIT_SECONDS)?,
        },
    };

    let mut action = Action::new(kind);
    action.description = observation.reasoning.clone();
    action.output = string_param(params, "output")?;
    Ok(action)
}

fn string_param(params: &Map<String, Value>, key: &str) -> Result<Option<String>, RecorderError> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(Value::Number(value)) => Ok(Some(value.to_string())),
        Some(Value::Bool(value)) => Ok(Some(value.to_string())),
        Some(_) => Err(RecorderError::InvalidParameter {
            key: key.to_string(),
            expected: "a string",
        }),
    }
}

fn bool_param(params: &Map<String, Value>, key: &str, default: bool) -> Result<bool, RecorderError> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(Value::Bool(value)) => Ok(*value),
        Some(_) => Err(RecorderError::InvalidParameter {
            key: key.to_string(),
            expected: "a boolean",
        }),
    }
}

fn float_param(params: &Map<String, Value>, key: &str, default: f64) -> Result<f64, RecorderError> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(value) => value.as_f64().ok_or_else(|| RecorderError::InvalidParameter {
            key: key.to_string(),
            expected: "a number",
        }),
    }
}

fn int_param(params: &Map<String, Value>, key: &str, default: i32) -> Result<i32, RecorderError> {
    float_param(params, key, default as f64).map(|value| value.round() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use waymark_core_types::{BoundingBox, SelectorType};

    fn session() -> RecordingSession {
        RecordingSession::new("Login", "Sign in", Viewport::new(1366, 768), true)
    }

    fn button() -> ElementSnapshot {
        ElementSnapshot::new("button")
            .with_text("Sign in")
            .with_attribute("id", "login")
            .with_bounding_box(BoundingBox {
                x: 600.0,
                y: 360.0,
                width: 160.0,
                height: 48.0,
            })
    }

    #[test]
    fn click_with_snapshot_and_point() {
        let mut recorder = session();
        let step = recorder
            .observe(
                Observation::new(ActionType::Click)
                    .with_snapshot(button())
                    .at(683, 384)
                    .with_reasoning("submit the form"),
            )
            .unwrap()
            .clone();

        assert_eq!(step.step_number, 1);
        let element = step.action.kind.element().unwrap();
        assert_eq!(element.target_text, "Sign in");
        assert_eq!(element.selector_strategies[0].kind, SelectorType::Id);
        let coords = element.coordinates.as_ref().unwrap();
        assert_eq!((coords.normalized_x, coords.normalized_y), (Some(500), Some(500)));
        assert_eq!(coords.screen_width, Some(1366));
        assert!(coords.bounding_box.is_some());
        assert_eq!(element.element_tag.as_deref(), Some("button"));
        assert_eq!(step.action.description.as_deref(), Some("submit the form"));
    }

    #[test]
    fn target_text_fallbacks() {
        let mut recorder = session();
        let step = recorder
            .observe(Observation::new(ActionType::Click).at(10, 20))
            .unwrap();
        let element = step.action.kind.element().unwrap();
        assert_eq!(element.target_text, "Element at (10, 20)");
        assert!(element.selector_strategies.is_empty());

        let step = recorder
            .observe(
                Observation::new(ActionType::Click)
                    .with_snapshot(ElementSnapshot::new("div").with_attribute("id", "x"))
                    .with_reasoning("open menu"),
            )
            .unwrap();
        assert_eq!(step.action.kind.element().unwrap().target_text, "open menu");

        let step = recorder
            .observe(
                Observation::new(ActionType::Click)
                    .with_snapshot(ElementSnapshot::new("div").with_attribute("id", "y")),
            )
            .unwrap();
        assert_eq!(step.action.kind.element().unwrap().target_text, "Element");
    }

    #[test]
    fn element_actions_require_context() {
        let mut recorder = session();
        let err = recorder
            .observe(Observation::new(ActionType::Input).with_param("text", "hi"))
            .unwrap_err();
        assert!(matches!(err, RecorderError::MissingElement(ActionType::Input)));
        assert_eq!(recorder.step_count(), 0);

        let step = recorder
            .observe(Observation::new(ActionType::KeyPress).with_param("key", "Enter"))
            .unwrap();
        assert_eq!(step.step_number, 1);
        assert!(step.action.kind.element().is_none());
    }

    #[test]
    fn parameters_map_onto_actions() {
        let mut recorder = session();
        recorder
            .observe(
                Observation::new(ActionType::Navigation).with_param("url", "https://example.com"),
            )
            .unwrap();
        recorder
            .observe(
                Observation::new(ActionType::Input)
                    .with_snapshot(ElementSnapshot::new("input").with_attribute("name", "q"))
                    .with_param("text", "{query}")
                    .with_param("default_value", "rust")
                    .with_param("clear_before_typing", false)
                    .with_param("press_enter", true),
            )
            .unwrap();
        recorder
            .observe(Observation::new(ActionType::Scroll).with_param("scroll_y", 400))
            .unwrap();
        recorder
            .observe(
                Observation::new(ActionType::Extract)
                    .with_param("goal", "headline")
                    .with_param("output", "headline"),
            )
            .unwrap();
        recorder.observe(Observation::new(ActionType::Wait)).unwrap();

        let workflow = recorder.finalize();
        let kinds: Vec<&ActionKind> = workflow.steps.iter().map(|s| &s.action.kind).collect();
        assert_eq!(
            kinds[0],
            &ActionKind::Navigation {
                url: "https://example.com".into()
            }
        );
        match kinds[1] {
            ActionKind::Input {
                value,
                default_value,
                clear_before,
                press_enter,
                ..
            } => {
                assert_eq!(value, "{query}");
                assert_eq!(default_value.as_deref(), Some("rust"));
                assert!(!clear_before);
                assert!(press_enter);
            }
            other => panic!("unexpected action {other:?}"),
        }
        assert_eq!(
            kinds[2],
            &ActionKind::Scroll {
                scroll_x: 0,
                scroll_y: 400
            }
        );
        assert_eq!(workflow.steps[3].action.output.as_deref(), Some("headline"));
        assert_eq!(kinds[4], &ActionKind::Wait { duration: 5.0 });
        assert_eq!(
            workflow.steps.iter().map(|s| s.step_number).collect::<Vec<_>>(),
            vec![1, 2, 3, 4, 5]
        );
        assert!(workflow.validate().is_ok());
    }

    #[test]
    fn invalid_parameter_types_are_reported() {
        let mut recorder = session();
        let err = recorder
            .observe(Observation::new(ActionType::Scroll).with_param("scroll_y", "down"))
            .unwrap_err();
        assert!(matches!(err, RecorderError::InvalidParameter { .. }));
    }

    #[test]
    fn finalize_joins_reasoning_and_clear_resets() {
        let mut recorder = session();
        recorder
            .observe(Observation::new(ActionType::GoBack).with_reasoning("wrong page"))
            .unwrap();
        recorder.observe(Observation::new(ActionType::GoForward)).unwrap();
        recorder
            .observe(Observation::new(ActionType::GoBack).with_reasoning("again"))
            .unwrap();

        let workflow = recorder.finalize();
        assert_eq!(workflow.version, "1.0");
        assert_eq!(
            workflow.workflow_analysis.as_deref(),
            Some("Step 1: wrong page\nStep 3: again")
        );

        recorder.clear();
        assert_eq!(recorder.step_count(), 0);
        let step = recorder.observe(Observation::new(ActionType::GoBack)).unwrap();
        assert_eq!(step.step_number, 1);
    }

    #[test]
    fn screenshots_are_written_per_step() {
        let dir = tempfile::tempdir().unwrap();
        let mut recorder = session();
        recorder
            .observe(Observation::new(ActionType::GoBack).with_screenshot(vec![1, 2, 3]))
            .unwrap();
        recorder.observe(Observation::new(ActionType::GoForward)).unwrap();
        recorder
            .observe(Observation::new(ActionType::GoBack).with_screenshot(vec![4]))
            .unwrap();

        let saved = recorder.save_screenshots(&dir.path().join("shots")).unwrap();
        assert_eq!(saved.len(), 2);
        assert!(saved[0].ends_with("Login_step_1.png"));
        assert!(saved[1].ends_with("Login_step_3.png"));
        assert_eq!(std::fs::read(&saved[1]).unwrap(), vec![4]);
    }

    #[test]
    fn screenshots_are_dropped_when_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let mut recorder =
            RecordingSession::new("Quiet", "", Viewport::new(800, 600), false);
        recorder
            .observe(Observation::new(ActionType::GoBack).with_screenshot(vec![1]))
            .unwrap();
        assert!(recorder.save_screenshots(dir.path()).unwrap().is_empty());
    }
}
