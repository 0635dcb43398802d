//! Workflow executor implementation
//!
//! Steps run strictly one after another in ascending step number. The first
//! failing step ends the run; later steps are never attempted.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use action_locator::{ElementFinder, ElementResolver, Resolution, ResolvedTarget};
use action_primitives::{pause_seconds, ActionError, BrowserDriver};
use async_trait::async_trait;
use serde_json::Value;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use waymark_core_types::{ActionKind, ElementContext, WorkflowDefinition, WorkflowStep};

use crate::errors::FlowError;
use crate::interpolate::interpolate;
use crate::types::{ExecutionResult, ExecutorConfig, StepResult};

/// Flow executor trait
#[async_trait]
pub trait FlowExecutor: Send + Sync {
    /// Replay `workflow` from `start_step` with caller-supplied variables.
    ///
    /// Step failures are reported inside the returned result; only a workflow
    /// that fails validation is an `Err`.
    async fn run(
        &self,
        workflow: &WorkflowDefinition,
        variables: HashMap<String, Value>,
        start_step: u32,
    ) -> Result<ExecutionResult, FlowError>;

    /// Validate workflow structure
    fn validate(&self, workflow: &WorkflowDefinition) -> Result<(), FlowError>;
}

/// Default executor over a [`BrowserDriver`] and an [`ElementResolver`].
pub struct WorkflowExecutor {
    driver: Arc<dyn BrowserDriver>,
    resolver: Arc<dyn ElementResolver>,
    config: ExecutorConfig,
}

impl WorkflowExecutor {
    /// Executor resolving elements with an [`ElementFinder`] over the same driver.
    pub fn new(driver: Arc<dyn BrowserDriver>, config: ExecutorConfig) -> Self {
        let resolver = Arc::new(ElementFinder::with_config(driver.clone(), config.finder));
        Self {
            driver,
            resolver,
            config,
        }
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn ElementResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Caller variables plus declared defaults for the ones not supplied.
    fn prepare_context(
        workflow: &WorkflowDefinition,
        mut variables: HashMap<String, Value>,
    ) -> HashMap<String, Value> {
        for input in &workflow.input_schema {
            if variables.contains_key(&input.name) {
                continue;
            }
            match &input.default {
                Some(default) => {
                    variables.insert(input.name.clone(), default.clone());
                }
                None if input.required => {
                    warn!(
                        workflow = %workflow.name,
                        variable = %input.name,
                        "Required input variable not provided; placeholders stay literal"
                    );
                }
                None => {}
            }
        }
        variables
    }

    async fn resolve(&self, element: &ElementContext, step: u32) -> Result<Resolution, FlowError> {
        self.resolver
            .resolve(element, self.config.allow_coordinate_fallback)
            .await
            .map_err(|err| match err {
                action_locator::LocatorError::Driver(source) => FlowError::action(step, "resolve", source),
                other => FlowError::ElementNotFound(other),
            })
    }

    async fn with_nav_timeout<F>(&self, what: &str, operation: F) -> Result<(), ActionError>
    where
        F: std::future::Future<Output = Result<(), ActionError>> + Send,
    {
        let limit = self.config.navigation_timeout_ms;
        match timeout(Duration::from_millis(limit), operation).await {
            Ok(result) => result,
            Err(_) => Err(ActionError::NavTimeout(format!(
                "{} did not finish within {}ms",
                what, limit
            ))),
        }
    }

    /// Execute one step and describe what was done.
    async fn execute_step(
        &self,
        step: &WorkflowStep,
        context: &mut HashMap<String, Value>,
    ) -> Result<(String, Vec<String>), FlowError> {
        let n = step.step_number;
        let kind = &step.action.kind;
        let name = kind.name();
        let driver = self.driver.as_ref();
        let fail = |source: ActionError| FlowError::action(n, name, source);

        let outcome = match kind {
            ActionKind::Navigation { url } => {
                let url = interpolate(url, context);
                self.with_nav_timeout("navigation", driver.navigate(&url))
                    .await
                    .map_err(fail)?;
                (format!("Navigated to {}", url), Vec::new())
            }

            ActionKind::Click { element } => {
                let resolution = self.resolve(element, n).await?;
                let result = match &resolution.target {
                    ResolvedTarget::Coordinates { x, y } => {
                        driver.click_at(*x, *y).await.map_err(fail)?;
                        format!("Clicked at coordinates ({}, {})", x, y)
                    }
                    ResolvedTarget::Element(handle) => {
                        driver.click(handle).await.map_err(fail)?;
                        format!("Clicked element using {}", resolution.used_strategy)
                    }
                };
                (result, resolution.strategy_errors)
            }

            ActionKind::Input {
                element,
                value,
                default_value,
                clear_before,
                press_enter,
            } => {
                let mut text = interpolate(value, context);
                if text.is_empty() {
                    if let Some(default) = default_value {
                        text = default.clone();
                    }
                }
                let resolution = self.resolve(element, n).await?;
                let result = match &resolution.target {
                    ResolvedTarget::Coordinates { x, y } => {
                        driver
                            .type_at(*x, *y, &text, *press_enter, *clear_before)
                            .await
                            .map_err(fail)?;
                        format!("Input text at coordinates ({}, {})", x, y)
                    }
                    ResolvedTarget::Element(handle) => {
                        if *clear_before {
                            driver.clear(handle).await.map_err(fail)?;
                        }
                        driver.fill(handle, &text).await.map_err(fail)?;
                        if *press_enter {
                            driver.press(handle, "Enter").await.map_err(fail)?;
                        }
                        format!("Input text using {}", resolution.used_strategy)
                    }
                };
                (result, resolution.strategy_errors)
            }

            ActionKind::SelectChange {
                element,
                selected_text,
            } => {
                let label = interpolate(selected_text, context);
                let resolution = self.resolve(element, n).await?;
                let handle = resolution.handle().ok_or_else(|| FlowError::MissingElement {
                    step: n,
                    action: name,
                    target: resolution.target.to_string(),
                })?;
                driver.select_option(handle, &label).await.map_err(fail)?;
                (
                    format!("Selected '{}' using {}", label, resolution.used_strategy),
                    resolution.strategy_errors.clone(),
                )
            }

            ActionKind::KeyPress { element, key } => {
                let mut strategy_errors = Vec::new();
                match element {
                    Some(element) => {
                        let resolution = self.resolve(element, n).await?;
                        match &resolution.target {
                            ResolvedTarget::Coordinates { x, y } => {
                                driver.click_at(*x, *y).await.map_err(fail)?;
                                driver.press_key(key).await.map_err(fail)?;
                            }
                            ResolvedTarget::Element(handle) => {
                                driver.press(handle, key).await.map_err(fail)?;
                            }
                        }
                        strategy_errors = resolution.strategy_errors;
                    }
                    None => driver.press_key(key).await.map_err(fail)?,
                }
                (format!("Pressed key: {}", key), strategy_errors)
            }

            ActionKind::Scroll { scroll_x, scroll_y } => {
                driver.scroll_by(*scroll_x, *scroll_y).await.map_err(fail)?;
                (format!("Scrolled by ({}, {})", scroll_x, scroll_y), Vec::new())
            }

            ActionKind::GoBack => {
                self.with_nav_timeout("go back", driver.go_back())
                    .await
                    .map_err(fail)?;
                ("Navigated back".to_string(), Vec::new())
            }

            ActionKind::GoForward => {
                self.with_nav_timeout("go forward", driver.go_forward())
                    .await
                    .map_err(fail)?;
                ("Navigated forward".to_string(), Vec::new())
            }

            ActionKind::Extract { extraction_goal } => {
                let content = driver.visible_text().await.map_err(fail)?;
                let length = content.chars().count();
                debug!(step = n, goal = %extraction_goal, length, "Extracted page text");
                if let Some(output) = step.action.output.as_deref() {
                    context.insert(output.to_string(), Value::String(content));
                }
                (format!("Extracted content (length: {})", length), Vec::new())
            }

            ActionKind::Wait { duration } => {
                pause_seconds(*duration).await;
                (format!("Waited {:?} seconds", duration), Vec::new())
            }
        };

        Ok(outcome)
    }

    fn screenshot_path(&self, workflow: &WorkflowDefinition, step: u32, error: bool) -> PathBuf {
        let prefix = if error { "error" } else { "step" };
        self.config
            .screenshots_dir
            .join(workflow.name.replace(' ', "_"))
            .join(format!("{}_{}.png", prefix, step))
    }

    /// Best effort; failures are logged and never fail the step.
    async fn capture_screenshot(&self, workflow: &WorkflowDefinition, step: u32, error: bool) {
        if !self.config.screenshots {
            return;
        }
        let path = self.screenshot_path(workflow, step, error);
        let bytes = match self.driver.screenshot().await {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(step, error = %err, "Failed to capture screenshot");
                return;
            }
        };
        if let Some(parent) = path.parent() {
            if let Err(err) = tokio::fs::create_dir_all(parent).await {
                warn!(step, path = %parent.display(), error = %err, "Failed to create screenshot directory");
                return;
            }
        }
        match tokio::fs::write(&path, bytes).await {
            Ok(()) => debug!(step, path = %path.display(), "Saved screenshot"),
            Err(err) => warn!(step, path = %path.display(), error = %err, "Failed to save screenshot"),
        }
    }
}

#[async_trait]
impl FlowExecutor for WorkflowExecutor {
    async fn run(
        &self,
        workflow: &WorkflowDefinition,
        variables: HashMap<String, Value>,
        start_step: u32,
    ) -> Result<ExecutionResult, FlowError> {
        self.validate(workflow)?;

        let mut context = Self::prepare_context(workflow, variables);
        let steps: Vec<&WorkflowStep> = workflow
            .ordered_steps()
            .into_iter()
            .filter(|step| step.step_number >= start_step)
            .collect();
        let mut result = ExecutionResult::new(workflow.name.clone(), steps.len());

        info!(
            workflow = %workflow.name,
            run_id = %result.run_id,
            steps = steps.len(),
            start_step,
            "Starting workflow run"
        );

        for step in steps {
            let n = step.step_number;
            let action = step.action.name();
            info!(step = n, action, "Executing step");
            let started = Instant::now();

            match self.execute_step(step, &mut context).await {
                Ok((outcome, strategy_errors)) => {
                    let duration = started.elapsed().as_secs_f64();
                    info!(step = n, action, duration, result = %outcome, "Step completed");
                    self.capture_screenshot(workflow, n, false).await;
                    result.push_step(
                        StepResult::success(n, action, outcome, duration)
                            .with_strategy_errors(strategy_errors),
                    );
                    if let Some(wait) = step.action.wait_time {
                        pause_seconds(wait).await;
                    }
                }
                Err(err) => {
                    let duration = started.elapsed().as_secs_f64();
                    let message = format!("Step {} failed: {}", n, err);
                    warn!(step = n, action, duration, error = %err, "Step failed");
                    self.capture_screenshot(workflow, n, true).await;
                    result.push_step(
                        StepResult::failure(n, action, err.to_string(), duration)
                            .with_strategy_errors(err.strategy_errors().to_vec()),
                    );
                    return Ok(result.finish(Some((n, message)), context));
                }
            }
        }

        let result = result.finish(None, context);
        info!(
            workflow = %workflow.name,
            steps_completed = result.steps_completed,
            execution_time = result.execution_time,
            "Workflow completed"
        );
        Ok(result)
    }

    fn validate(&self, workflow: &WorkflowDefinition) -> Result<(), FlowError> {
        workflow.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use action_locator::FinderConfig;
    use action_primitives::scripted::{DriverCall, ScriptedBrowser, ScriptedElement, ScriptedPage};
    use serde_json::json;
    use waymark_core_types::{
        Action, CoordinateInfo, InputVariable, SelectorStrategy, SelectorType, VariableType,
    };

    fn fast_config() -> ExecutorConfig {
        ExecutorConfig {
            finder: FinderConfig {
                timeout_ms: 30,
                poll_interval_ms: 5,
            },
            navigation_timeout_ms: 1000,
            ..ExecutorConfig::default()
        }
    }

    fn executor(browser: &Arc<ScriptedBrowser>, config: ExecutorConfig) -> WorkflowExecutor {
        let driver: Arc<dyn BrowserDriver> = browser.clone();
        WorkflowExecutor::new(driver, config)
    }

    fn by_id(text: &str, id: &str) -> ElementContext {
        ElementContext::new(text)
            .with_strategies(vec![SelectorStrategy::new(SelectorType::Id, id, 1)])
    }

    fn run(
        executor: &WorkflowExecutor,
        workflow: &WorkflowDefinition,
        variables: HashMap<String, Value>,
        start_step: u32,
    ) -> Result<ExecutionResult, FlowError> {
        tokio_test::block_on(executor.run(workflow, variables, start_step))
    }

    #[tokio::test]
    async fn fail_fast_stops_at_first_failure() {
        let browser = Arc::new(ScriptedBrowser::new());
        browser.add_element(ScriptedElement::new("button").with_attribute("id", "ok"));
        let workflow = WorkflowDefinition::new("five steps", "")
            .with_step(Action::navigation("https://example.com"))
            .with_step(Action::click(by_id("OK", "ok")))
            .with_step(Action::click(by_id("Missing", "missing")))
            .with_step(Action::navigation("https://example.com/next"))
            .with_step(Action::new(ActionKind::Scroll {
                scroll_x: 0,
                scroll_y: 300,
            }));

        let result = executor(&browser, fast_config())
            .run(&workflow, HashMap::new(), 1)
            .await
            .unwrap();

        assert!(!result.success);
        assert_eq!(result.steps_completed, 2);
        assert_eq!(result.total_steps, 5);
        assert_eq!(result.failed_step, Some(3));
        assert_eq!(result.step_results.len(), 3);
        assert!(result
            .error_message
            .as_deref()
            .unwrap()
            .starts_with("Step 3 failed: Could not find element 'Missing'"));
        assert_eq!(result.step_results[2].strategy_errors.len(), 1);

        assert_eq!(browser.count_calls("navigate"), 1);
        assert_eq!(browser.count_calls("scroll_by"), 0);
        assert_eq!(browser.element(0).unwrap().clicks, 1);
    }

    #[tokio::test]
    async fn validation_happens_before_any_browser_call() {
        let browser = Arc::new(ScriptedBrowser::new());
        let workflow = WorkflowDefinition::new("empty", "");
        let err = executor(&browser, fast_config())
            .run(&workflow, HashMap::new(), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::ValidationFailed(_)));
        assert!(browser.calls().is_empty());
    }

    #[test]
    fn placeholders_are_interpolated_or_left_literal() {
        let browser = Arc::new(ScriptedBrowser::new());
        let executor = executor(&browser, fast_config());
        let workflow = WorkflowDefinition::new("profile", "")
            .with_step(Action::navigation("https://x.com/{user}"));

        run(&executor, &workflow, HashMap::new(), 1).unwrap();
        assert_eq!(browser.url(), "https://x.com/{user}");

        let vars = HashMap::from([("user".to_string(), json!("bob"))]);
        let result = run(&executor, &workflow, vars, 1).unwrap();
        assert_eq!(browser.url(), "https://x.com/bob");
        assert_eq!(
            result.step_results[0].result.as_deref(),
            Some("Navigated to https://x.com/bob")
        );
    }

    #[tokio::test]
    async fn input_defaults_and_extraction_feed_the_context() {
        let browser = Arc::new(ScriptedBrowser::new());
        browser.add_route(
            "https://search.test",
            ScriptedPage::new()
                .with_element(ScriptedElement::new("input").with_attribute("id", "q"))
                .with_body_text("Results for rust"),
        );
        let workflow = WorkflowDefinition::new("search", "")
            .with_input(InputVariable::new("site", VariableType::String).optional("search.test"))
            .with_input(InputVariable::new("query", VariableType::String))
            .with_step(Action::navigation("https://{site}"))
            .with_step(Action::new(ActionKind::Input {
                element: by_id("Search", "q"),
                value: String::new(),
                default_value: Some("rust".into()),
                clear_before: true,
                press_enter: true,
            }))
            .with_step(
                Action::new(ActionKind::Extract {
                    extraction_goal: "results".into(),
                })
                .with_output("page"),
            );

        let result = executor(&browser, fast_config())
            .run(&workflow, HashMap::new(), 1)
            .await
            .unwrap();

        assert!(result.success, "{:?}", result.error_message);
        assert_eq!(result.steps_completed, 3);
        let input = browser.element(0).unwrap();
        assert_eq!(input.value, "rust");
        assert_eq!(input.keys, vec!["Enter".to_string()]);
        assert_eq!(result.extracted_data["page"], json!("Results for rust"));
        assert_eq!(result.extracted_data["site"], json!("search.test"));
        assert_eq!(
            result.step_results[1].result.as_deref(),
            Some("Input text using id:q")
        );
        assert_eq!(
            result.step_results[2].result.as_deref(),
            Some("Extracted content (length: 16)")
        );
    }

    #[tokio::test]
    async fn coordinate_fallback_drives_coordinate_primitives() {
        let browser = Arc::new(ScriptedBrowser::new());
        browser.add_element(ScriptedElement::new("input").with_bounds(0.0, 0.0, 200.0, 40.0));
        let element = by_id("Name", "gone").with_coordinates(CoordinateInfo::absolute(50, 20));
        let workflow = WorkflowDefinition::new("coords", "")
            .with_step(Action::click(element.clone()))
            .with_step(Action::new(ActionKind::Input {
                element,
                value: "Ada".into(),
                default_value: None,
                clear_before: true,
                press_enter: false,
            }));

        let result = executor(&browser, fast_config())
            .run(&workflow, HashMap::new(), 1)
            .await
            .unwrap();

        assert!(result.success);
        assert_eq!(
            result.step_results[0].result.as_deref(),
            Some("Clicked at coordinates (50, 20)")
        );
        assert_eq!(
            result.step_results[1].result.as_deref(),
            Some("Input text at coordinates (50, 20)")
        );
        assert_eq!(result.step_results[0].strategy_errors.len(), 1);
        assert_eq!(browser.element(0).unwrap().value, "Ada");
    }

    #[tokio::test]
    async fn select_requires_a_live_element() {
        let browser = Arc::new(ScriptedBrowser::new());
        let element = by_id("Country", "gone").with_coordinates(CoordinateInfo::absolute(5, 5));
        let workflow = WorkflowDefinition::new("select", "").with_step(Action::new(
            ActionKind::SelectChange {
                element,
                selected_text: "France".into(),
            },
        ));

        let result = executor(&browser, fast_config())
            .run(&workflow, HashMap::new(), 1)
            .await
            .unwrap();
        assert!(!result.success);
        assert!(result.step_results[0]
            .error
            .as_deref()
            .unwrap()
            .contains("requires a live element"));
    }

    #[tokio::test]
    async fn select_key_scroll_and_history() {
        let browser = Arc::new(ScriptedBrowser::new());
        browser.add_element(
            ScriptedElement::new("select")
                .with_attribute("id", "country")
                .with_options(["Germany", "France"]),
        );
        let workflow = WorkflowDefinition::new("misc", "")
            .with_step(Action::navigation("https://a.test"))
            .with_step(Action::navigation("https://b.test"))
            .with_step(Action::new(ActionKind::SelectChange {
                element: by_id("Country", "country"),
                selected_text: "{country}".into(),
            }))
            .with_step(Action::new(ActionKind::KeyPress {
                element: None,
                key: "Escape".into(),
            }))
            .with_step(Action::new(ActionKind::Scroll {
                scroll_x: 10,
                scroll_y: -20,
            }))
            .with_step(Action::new(ActionKind::GoBack))
            .with_step(Action::new(ActionKind::GoForward))
            .with_step(Action::new(ActionKind::Wait { duration: 0.01 }));

        let vars = HashMap::from([("country".to_string(), json!("France"))]);
        let result = executor(&browser, fast_config())
            .run(&workflow, vars, 1)
            .await
            .unwrap();

        assert!(result.success, "{:?}", result.error_message);
        let outcomes: Vec<&str> = result
            .step_results
            .iter()
            .filter_map(|s| s.result.as_deref())
            .collect();
        assert_eq!(
            outcomes[2..],
            [
                "Selected 'France' using id:country",
                "Pressed key: Escape",
                "Scrolled by (10, -20)",
                "Navigated back",
                "Navigated forward",
                "Waited 0.01 seconds",
            ]
        );
        assert_eq!(browser.element(0).unwrap().selected.as_deref(), Some("France"));
        assert_eq!(browser.pressed_keys(), vec!["Escape".to_string()]);
        assert_eq!(browser.scroll_position(), (10, -20));
        assert_eq!(browser.url(), "https://b.test");
    }

    #[tokio::test]
    async fn coordinate_typing_clears_non_editable_targets() {
        let browser = Arc::new(ScriptedBrowser::new());
        browser.add_element(
            ScriptedElement::new("div")
                .with_text("Notes card")
                .with_bounds(0.0, 0.0, 200.0, 100.0),
        );
        let element =
            ElementContext::new("Notes card").with_coordinates(CoordinateInfo::absolute(50, 50));
        let workflow = WorkflowDefinition::new("notes", "").with_step(Action::new(ActionKind::Input {
            element,
            value: "hello".into(),
            default_value: None,
            clear_before: true,
            press_enter: false,
        }));

        let result = executor(&browser, fast_config())
            .run(&workflow, HashMap::new(), 1)
            .await
            .unwrap();

        assert!(result.success, "{:?}", result.error_message);
        assert_eq!(
            result.step_results[0].result.as_deref(),
            Some("Input text at coordinates (50, 50)")
        );
        assert_eq!(browser.typed_text(), vec!["hello".to_string()]);
        assert_eq!(browser.count_calls("clear"), 0);
        assert!(browser.calls().iter().any(|call| matches!(
            call,
            DriverCall::TypeAt { clear_first: true, .. }
        )));
    }

    #[tokio::test]
    async fn whole_second_waits_keep_the_decimal() {
        let browser = Arc::new(ScriptedBrowser::new());
        let workflow = WorkflowDefinition::new("pause", "")
            .with_step(Action::new(ActionKind::Wait { duration: 0.0 }));

        let result = executor(&browser, fast_config())
            .run(&workflow, HashMap::new(), 1)
            .await
            .unwrap();

        assert_eq!(
            result.step_results[0].result.as_deref(),
            Some("Waited 0.0 seconds")
        );
    }

    #[tokio::test]
    async fn start_step_skips_earlier_steps() {
        let browser = Arc::new(ScriptedBrowser::new());
        let workflow = WorkflowDefinition::new("resume", "")
            .with_step(Action::navigation("https://one.test"))
            .with_step(Action::navigation("https://two.test"))
            .with_step(Action::navigation("https://three.test"));

        let result = executor(&browser, fast_config())
            .run(&workflow, HashMap::new(), 2)
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.total_steps, 2);
        assert_eq!(result.steps_completed, 2);
        assert_eq!(result.step_results[0].step_number, 2);
        assert_eq!(browser.count_calls("navigate"), 2);
    }

    #[tokio::test]
    async fn driver_failures_are_action_failures() {
        let browser = Arc::new(ScriptedBrowser::new());
        browser.fail_on("navigate", ActionError::CdpIo("socket closed".into()));
        let workflow =
            WorkflowDefinition::new("broken", "").with_step(Action::navigation("https://a.test"));

        let result = executor(&browser, fast_config())
            .run(&workflow, HashMap::new(), 1)
            .await
            .unwrap();
        assert_eq!(
            result.error_message.as_deref(),
            Some("Step 1 failed: navigation action failed at step 1: CDP I/O error: socket closed")
        );
    }

    #[tokio::test]
    async fn screenshots_are_saved_per_step() {
        let dir = tempfile::tempdir().unwrap();
        let browser = Arc::new(ScriptedBrowser::new());
        let config = ExecutorConfig {
            screenshots: true,
            screenshots_dir: dir.path().to_path_buf(),
            ..fast_config()
        };
        let workflow = WorkflowDefinition::new("My Flow", "")
            .with_step(Action::navigation("https://a.test"))
            .with_step(Action::click(by_id("Nope", "nope")));

        let result = executor(&browser, config)
            .run(&workflow, HashMap::new(), 1)
            .await
            .unwrap();
        assert!(!result.success);
        assert!(dir.path().join("My_Flow/step_1.png").exists());
        assert!(dir.path().join("My_Flow/error_2.png").exists());
    }

    #[tokio::test]
    async fn screenshot_failures_are_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let browser = Arc::new(ScriptedBrowser::new());
        browser.fail_on("screenshot", ActionError::CdpIo("no target".into()));
        let config = ExecutorConfig {
            screenshots: true,
            screenshots_dir: dir.path().to_path_buf(),
            ..fast_config()
        };
        let workflow =
            WorkflowDefinition::new("shots", "").with_step(Action::navigation("https://a.test"));

        let result = executor(&browser, config)
            .run(&workflow, HashMap::new(), 1)
            .await
            .unwrap();
        assert!(result.success);
    }
}
