//! Built-in waiting mechanisms

use std::time::Duration;

use tokio::time::{sleep, timeout};
use tracing::debug;

use crate::errors::ActionError;
use crate::primitives::BrowserDriver;
use crate::types::ElementHandle;

/// Polls an element until it is visible or the timeout elapses.
#[derive(Debug, Clone, Copy)]
pub struct VisibilityWait {
    /// Upper bound for one wait (milliseconds)
    pub timeout_ms: u64,

    /// Delay between visibility probes (milliseconds)
    pub poll_interval_ms: u64,
}

impl Default for VisibilityWait {
    fn default() -> Self {
        Self {
            timeout_ms: 5000,
            poll_interval_ms: 100,
        }
    }
}

impl VisibilityWait {
    pub fn new(timeout_ms: u64, poll_interval_ms: u64) -> Self {
        Self {
            timeout_ms,
            poll_interval_ms: poll_interval_ms.max(1),
        }
    }

    /// Wait until `element` reports visible.
    ///
    /// Probe errors end the wait immediately; only the elapsed timeout turns
    /// into [`ActionError::WaitTimeout`].
    pub async fn wait(
        &self,
        driver: &dyn BrowserDriver,
        element: &ElementHandle,
    ) -> Result<(), ActionError> {
        let poll = Duration::from_millis(self.poll_interval_ms);
        let probe = async {
            loop {
                if driver.is_visible(element).await? {
                    return Ok(());
                }
                sleep(poll).await;
            }
        };

        match timeout(Duration::from_millis(self.timeout_ms), probe).await {
            Ok(result) => result,
            Err(_) => {
                debug!(element = %element, timeout_ms = self.timeout_ms, "Visibility wait timed out");
                Err(ActionError::WaitTimeout(format!(
                    "element {} not visible after {}ms",
                    element, self.timeout_ms
                )))
            }
        }
    }
}

/// Sleep for a duration given in seconds; negative or non-finite values do not sleep.
pub async fn pause_seconds(seconds: f64) {
    if seconds.is_finite() && seconds > 0.0 {
        sleep(Duration::from_secs_f64(seconds)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scripted::{ScriptedBrowser, ScriptedElement};
    use crate::types::ElementQuery;

    #[test]
    fn default_wait_config() {
        let wait = VisibilityWait::default();
        assert_eq!(wait.timeout_ms, 5000);
        assert_eq!(wait.poll_interval_ms, 100);
        assert_eq!(VisibilityWait::new(10, 0).poll_interval_ms, 1);
    }

    #[tokio::test]
    async fn visible_element_passes_immediately() {
        let browser = ScriptedBrowser::new();
        browser.add_element(ScriptedElement::new("button").with_attribute("id", "go"));
        let handle = browser
            .query(&ElementQuery::Id { id: "go".into() })
            .await
            .unwrap()
            .unwrap();
        VisibilityWait::new(50, 5).wait(&browser, &handle).await.unwrap();
    }

    #[tokio::test]
    async fn hidden_element_times_out() {
        let browser = ScriptedBrowser::new();
        browser.add_element(
            ScriptedElement::new("button")
                .with_attribute("id", "ghost")
                .hidden(),
        );
        let handle = browser
            .query(&ElementQuery::Id { id: "ghost".into() })
            .await
            .unwrap()
            .unwrap();
        let err = VisibilityWait::new(30, 5)
            .wait(&browser, &handle)
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::WaitTimeout(_)));
    }

    #[tokio::test]
    async fn pause_ignores_negative_values() {
        pause_seconds(-1.0).await;
        pause_seconds(f64::NAN).await;
        pause_seconds(0.001).await;
    }
}
