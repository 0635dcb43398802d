//! Element resolver with fallback chain orchestration

use std::sync::Arc;
use std::time::Duration;

use action_primitives::{ActionError, BrowserDriver, ElementHandle, VisibilityWait};
use async_trait::async_trait;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use waymark_core_types::{ElementContext, SelectorStrategy};

use crate::coordinates::absolute_point;
use crate::errors::LocatorError;
use crate::strategies::query_for;
use crate::types::{Resolution, COORDINATES_STRATEGY};

/// Element resolver trait
#[async_trait]
pub trait ElementResolver: Send + Sync {
    /// Resolve a recorded element context against the live page.
    async fn resolve(
        &self,
        context: &ElementContext,
        allow_coordinate_fallback: bool,
    ) -> Result<Resolution, LocatorError>;
}

/// Per-strategy wait settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinderConfig {
    /// Budget for one strategy: query plus visibility wait (milliseconds)
    pub timeout_ms: u64,
    pub poll_interval_ms: u64,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 5000,
            poll_interval_ms: 100,
        }
    }
}

/// Tries every selector strategy in priority order, then recorded coordinates.
pub struct ElementFinder {
    driver: Arc<dyn BrowserDriver>,
    config: FinderConfig,
}

impl ElementFinder {
    pub fn new(driver: Arc<dyn BrowserDriver>) -> Self {
        Self::with_config(driver, FinderConfig::default())
    }

    pub fn with_config(driver: Arc<dyn BrowserDriver>, config: FinderConfig) -> Self {
        Self { driver, config }
    }

    pub fn config(&self) -> FinderConfig {
        self.config
    }

    /// One strategy attempt, bounded by the configured timeout.
    ///
    /// Every failure comes back as [`LocatorError::StrategyFailed`].
    async fn attempt(&self, strategy: &SelectorStrategy) -> Result<ElementHandle, LocatorError> {
        let failed = |reason: String| LocatorError::StrategyFailed {
            strategy: strategy.kind.to_string(),
            reason,
        };
        let query = query_for(strategy).map_err(|err| failed(err.to_string()))?;
        let wait = VisibilityWait::new(self.config.timeout_ms, self.config.poll_interval_ms);
        let driver = self.driver.as_ref();

        let lookup = async {
            let handle = driver
                .query(&query)
                .await
                .map_err(|err| failed(err.to_string()))?
                .ok_or_else(|| failed(format!("no element matches {}", query)))?;
            wait.wait(driver, &handle)
                .await
                .map_err(|err| failed(err.to_string()))?;
            Ok(handle)
        };

        match timeout(Duration::from_millis(self.config.timeout_ms), lookup).await {
            Ok(result) => result,
            Err(_) => Err(failed(format!("timed out after {}ms", self.config.timeout_ms))),
        }
    }

    async fn coordinate_fallback(
        &self,
        context: &ElementContext,
    ) -> Result<Option<(i32, i32)>, ActionError> {
        let Some(info) = context.coordinates.as_ref() else {
            return Ok(None);
        };
        let viewport = if info.has_absolute() {
            None
        } else {
            Some(self.driver.viewport_size().await?)
        };
        Ok(absolute_point(info, viewport))
    }
}

#[async_trait]
impl ElementResolver for ElementFinder {
    async fn resolve(
        &self,
        context: &ElementContext,
        allow_coordinate_fallback: bool,
    ) -> Result<Resolution, LocatorError> {
        let strategies = context.ordered_strategies();
        let mut errors = Vec::with_capacity(strategies.len());

        info!(
            target_text = %context.target_text,
            strategies = strategies.len(),
            "Resolving element"
        );

        for strategy in &strategies {
            debug!(strategy = %strategy.describe(), priority = strategy.priority, "Trying strategy");
            match self.attempt(strategy).await {
                Ok(handle) => {
                    info!(
                        strategy = %strategy.describe(),
                        element = %handle,
                        "Resolved element"
                    );
                    return Ok(Resolution::element(handle, strategy.describe()).with_errors(errors));
                }
                Err(err) => {
                    warn!(strategy = %strategy.describe(), error = %err, "Strategy failed");
                    errors.push(err.summary());
                }
            }
        }

        let mut fallback_attempted = false;
        if allow_coordinate_fallback && context.coordinates.is_some() {
            fallback_attempted = true;
            match self.coordinate_fallback(context).await {
                Ok(Some((x, y))) => {
                    warn!(
                        target_text = %context.target_text,
                        x,
                        y,
                        "Selector strategies exhausted, using recorded coordinates"
                    );
                    return Ok(Resolution::coordinates(x, y).with_errors(errors));
                }
                Ok(None) => {
                    errors.push(format!("{}: no usable coordinates", COORDINATES_STRATEGY));
                }
                Err(err) => {
                    errors.push(format!("{}: {}", COORDINATES_STRATEGY, err));
                }
            }
        }

        warn!(
            target_text = %context.target_text,
            tried = strategies.len(),
            fallback_attempted,
            "Element not found"
        );

        Err(LocatorError::ElementNotFound {
            target_text: context.target_text.clone(),
            tried: strategies.len(),
            coordinate_fallback_attempted: fallback_attempted,
            errors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use action_primitives::scripted::{ScriptedBrowser, ScriptedElement};
    use action_primitives::Viewport;
    use waymark_core_types::{CoordinateInfo, SelectorType};

    fn fast() -> FinderConfig {
        FinderConfig {
            timeout_ms: 40,
            poll_interval_ms: 5,
        }
    }

    fn finder(browser: &Arc<ScriptedBrowser>) -> ElementFinder {
        let driver: Arc<dyn BrowserDriver> = browser.clone();
        ElementFinder::with_config(driver, fast())
    }

    fn context(strategies: Vec<SelectorStrategy>) -> ElementContext {
        ElementContext::new("Submit").with_strategies(strategies)
    }

    #[tokio::test]
    async fn first_matching_strategy_wins() {
        let browser = Arc::new(ScriptedBrowser::new());
        browser.add_element(
            ScriptedElement::new("button")
                .with_text("Submit")
                .with_attribute("name", "go"),
        );
        let ctx = context(vec![
            SelectorStrategy::new(SelectorType::Name, "go", 2),
            SelectorStrategy::new(SelectorType::Id, "missing", 1),
        ]);

        let resolution = finder(&browser).resolve(&ctx, true).await.unwrap();
        assert_eq!(resolution.used_strategy, "name:go");
        assert_eq!(resolution.handle().unwrap().selector, "scripted:0");
        assert_eq!(resolution.strategy_errors.len(), 1);
        assert!(resolution.strategy_errors[0].starts_with("id: "));
    }

    #[tokio::test]
    async fn failed_attempts_are_typed() {
        let browser = Arc::new(ScriptedBrowser::new());
        let finder = finder(&browser);

        let missing = finder
            .attempt(&SelectorStrategy::new(SelectorType::Id, "missing", 1))
            .await
            .unwrap_err();
        match &missing {
            LocatorError::StrategyFailed { strategy, reason } => {
                assert_eq!(strategy, "id");
                assert!(reason.starts_with("no element matches"), "{reason}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(missing.summary().starts_with("id: no element matches"));

        let invalid = finder
            .attempt(&SelectorStrategy::new(SelectorType::RoleText, "Submit", 1))
            .await
            .unwrap_err();
        assert!(matches!(invalid, LocatorError::StrategyFailed { .. }));
        assert_eq!(invalid.severity(), 1);
    }

    #[tokio::test]
    async fn cascades_to_coordinates() {
        let browser = Arc::new(ScriptedBrowser::new());
        let ctx = context(vec![
            SelectorStrategy::new(SelectorType::Id, "gone", 1),
            SelectorStrategy::new(SelectorType::Css, "button.gone", 2),
        ])
        .with_coordinates(CoordinateInfo::absolute(120, 45));

        let resolution = finder(&browser).resolve(&ctx, true).await.unwrap();
        assert!(resolution.is_coordinate_fallback());
        assert_eq!(resolution.point(), Some((120, 45)));
        assert_eq!(resolution.used_strategy, "coordinates");
        assert_eq!(resolution.strategy_errors.len(), 2);
        assert_eq!(browser.count_calls("viewport_size"), 0);
    }

    #[tokio::test]
    async fn normalized_coordinates_use_live_viewport() {
        let browser = Arc::new(ScriptedBrowser::new().with_viewport(Viewport::new(2000, 1000)));
        let ctx = ElementContext::new("Menu").with_coordinates(CoordinateInfo {
            normalized_x: Some(250),
            normalized_y: Some(500),
            ..CoordinateInfo::default()
        });

        let resolution = finder(&browser).resolve(&ctx, true).await.unwrap();
        assert_eq!(resolution.point(), Some((500, 500)));
        assert_eq!(browser.count_calls("viewport_size"), 1);
    }

    #[tokio::test]
    async fn exhaustion_reports_every_strategy() {
        let browser = Arc::new(ScriptedBrowser::new());
        let ctx = context(vec![
            SelectorStrategy::new(SelectorType::Id, "a", 1),
            SelectorStrategy::new(SelectorType::RoleText, "Submit", 2),
            SelectorStrategy::new(SelectorType::TextExact, "Submit", 3),
        ]);

        let err = finder(&browser).resolve(&ctx, false).await.unwrap_err();
        match &err {
            LocatorError::ElementNotFound {
                target_text,
                tried,
                coordinate_fallback_attempted,
                errors,
            } => {
                assert_eq!(target_text, "Submit");
                assert_eq!(*tried, 3);
                assert!(!coordinate_fallback_attempted);
                assert_eq!(errors.len(), 3);
                assert!(errors[1].starts_with("role_text: Invalid strategy"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("Coordinate fallback was not attempted"));
    }

    #[tokio::test]
    async fn disabled_fallback_ignores_coordinates() {
        let browser = Arc::new(ScriptedBrowser::new());
        let ctx = context(vec![SelectorStrategy::new(SelectorType::Id, "a", 1)])
            .with_coordinates(CoordinateInfo::absolute(1, 1));

        let err = finder(&browser).resolve(&ctx, false).await.unwrap_err();
        assert_eq!(err.strategy_errors().len(), 1);
        assert_eq!(browser.count_calls("click_at"), 0);
    }

    #[tokio::test]
    async fn hidden_match_times_out_and_falls_through() {
        let browser = Arc::new(ScriptedBrowser::new());
        browser.add_element(
            ScriptedElement::new("button")
                .with_attribute("id", "ghost")
                .hidden(),
        );
        browser.add_element(ScriptedElement::new("button").with_text("Submit"));
        let ctx = context(vec![
            SelectorStrategy::new(SelectorType::Id, "ghost", 1),
            SelectorStrategy::new(SelectorType::TextExact, "Submit", 2),
        ]);

        let resolution = finder(&browser).resolve(&ctx, false).await.unwrap();
        assert_eq!(resolution.handle().unwrap().selector, "scripted:1");
        assert!(resolution.strategy_errors[0].starts_with("id: "));
    }

    #[tokio::test]
    async fn unusable_coordinates_count_as_attempted() {
        let browser = Arc::new(ScriptedBrowser::new());
        let ctx = ElementContext::new("Nowhere").with_coordinates(CoordinateInfo::absolute(-5, 3));

        let err = finder(&browser).resolve(&ctx, true).await.unwrap_err();
        assert!(matches!(
            err,
            LocatorError::ElementNotFound {
                tried: 0,
                coordinate_fallback_attempted: true,
                ..
            }
        ));
        assert_eq!(err.strategy_errors(), ["coordinates: no usable coordinates".to_string()]);
    }
}
