use std::time::Duration;

use action_primitives::{ActionError, BrowserDriver, ElementHandle, ElementQuery, Viewport};
use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::input::InsertTextParams;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::handler::viewport::Viewport as CdpViewport;
use chromiumoxide::layout::Point;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::{Browser, BrowserConfig, Element, Page};
use futures::StreamExt;
use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;
use waymark_core_types::ElementSnapshot;

use crate::config::ChromiumConfig;
use crate::errors::{cdp_io, decode, AdapterError};
use crate::keys::{self, KeyStroke};
use crate::scripts::{self, ElementAt, ScriptStatus};

/// [`BrowserDriver`] backed by a single Chromium tab.
pub struct ChromiumDriver {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
}

impl ChromiumDriver {
    /// Launch Chromium and open a blank tab.
    pub async fn launch(config: &ChromiumConfig) -> Result<Self, AdapterError> {
        let browser_config = browser_config(config)?;
        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|err| AdapterError::Launch(err.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(err) = event {
                    debug!(error = %err, "Browser handler event error");
                }
            }
        });

        let page = browser.new_page("about:blank").await?;
        info!(
            headless = config.headless,
            width = config.viewport.width,
            height = config.viewport.height,
            "Chromium launched"
        );
        Ok(Self {
            browser,
            page,
            handler,
        })
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Close the browser and stop the handler task.
    pub async fn close(mut self) -> Result<(), AdapterError> {
        if let Err(err) = self.browser.close().await {
            warn!(error = %err, "Failed to close browser cleanly");
        }
        if let Err(err) = self.browser.wait().await {
            debug!(error = %err, "Browser process wait failed");
        }
        self.handler.abort();
        Ok(())
    }

    async fn eval<T: DeserializeOwned>(&self, script: &str) -> Result<T, ActionError> {
        self.page
            .evaluate(script)
            .await
            .map_err(cdp_io)?
            .into_value::<T>()
            .map_err(decode)
    }

    async fn run(&self, script: &str) -> Result<(), ActionError> {
        self.page.evaluate(script).await.map_err(cdp_io)?;
        Ok(())
    }

    async fn eval_status(&self, script: &str) -> Result<ScriptStatus, ActionError> {
        self.eval::<ScriptStatus>(script).await
    }

    async fn anchor(
        &self,
        script_for: impl Fn(&str) -> String,
    ) -> Result<Option<ElementHandle>, ActionError> {
        let token = format!("wm-{}", Uuid::new_v4().simple());
        let status = self.eval_status(&script_for(&token)).await?;
        if !status.is_ok() {
            return Ok(None);
        }
        Ok(Some(ElementHandle::new(
            status
                .selector
                .unwrap_or_else(|| scripts::anchor_selector(&token)),
        )))
    }

    async fn element(&self, handle: &ElementHandle) -> Result<Element, ActionError> {
        self.page
            .find_element(handle.selector.as_str())
            .await
            .map_err(|_| ActionError::NotFound(handle.selector.clone()))
    }

    async fn stroke(&self, stroke: &KeyStroke) -> Result<(), ActionError> {
        for event in stroke.events()? {
            self.page.execute(event).await.map_err(cdp_io)?;
        }
        Ok(())
    }

    async fn settle(&self) -> Result<(), ActionError> {
        self.page.wait_for_navigation().await.map_err(cdp_io)?;
        Ok(())
    }
}

impl Drop for ChromiumDriver {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

fn browser_config(config: &ChromiumConfig) -> Result<BrowserConfig, AdapterError> {
    let executable = config
        .resolve_executable()
        .ok_or(AdapterError::ExecutableNotFound)?;

    let Viewport { width, height } = config.viewport;
    let mut builder = BrowserConfig::builder()
        .chrome_executable(executable)
        .request_timeout(Duration::from_millis(config.request_timeout_ms))
        .launch_timeout(Duration::from_millis(config.launch_timeout_ms))
        .window_size(width, height)
        .viewport(CdpViewport {
            width,
            height,
            ..CdpViewport::default()
        })
        .arg("--no-first-run")
        .arg("--no-default-browser-check")
        .arg("--disable-popup-blocking")
        .arg("--password-store=basic");

    if !config.headless {
        builder = builder.with_head();
    }
    if config.no_sandbox {
        builder = builder.no_sandbox();
    }
    if let Some(dir) = &config.user_data_dir {
        builder = builder.user_data_dir(dir);
    }

    builder.build().map_err(AdapterError::Config)
}

fn point(x: i32, y: i32) -> Point {
    Point {
        x: f64::from(x),
        y: f64::from(y),
    }
}

#[async_trait]
impl BrowserDriver for ChromiumDriver {
    async fn navigate(&self, url: &str) -> Result<(), ActionError> {
        self.page
            .goto(url)
            .await
            .map_err(|err| ActionError::NavTimeout(format!("{url}: {err}")))?;
        Ok(())
    }

    async fn go_back(&self) -> Result<(), ActionError> {
        self.run("history.back()").await?;
        self.settle().await
    }

    async fn go_forward(&self) -> Result<(), ActionError> {
        self.run("history.forward()").await?;
        self.settle().await
    }

    async fn click_at(&self, x: i32, y: i32) -> Result<(), ActionError> {
        self.page.click(point(x, y)).await.map_err(cdp_io)?;
        Ok(())
    }

    async fn type_at(
        &self,
        x: i32,
        y: i32,
        text: &str,
        press_enter: bool,
        clear_first: bool,
    ) -> Result<(), ActionError> {
        self.click_at(x, y).await?;
        if clear_first {
            for stroke in keys::clear_focused() {
                self.stroke(&stroke).await?;
            }
        }
        self.page
            .execute(InsertTextParams::new(text))
            .await
            .map_err(cdp_io)?;
        if press_enter {
            self.press_key("Enter").await?;
        }
        Ok(())
    }

    async fn scroll_by(&self, dx: i32, dy: i32) -> Result<(), ActionError> {
        self.run(&scripts::scroll_script(dx, dy)).await
    }

    async fn press_key(&self, key: &str) -> Result<(), ActionError> {
        let focused = self
            .anchor(scripts::focused_script)
            .await?
            .ok_or_else(|| ActionError::NotInteractable("no focused element".to_string()))?;
        self.press(&focused, key).await
    }

    async fn visible_text(&self) -> Result<String, ActionError> {
        self.eval(scripts::BODY_TEXT).await
    }

    async fn query(&self, query: &ElementQuery) -> Result<Option<ElementHandle>, ActionError> {
        let handle = self
            .anchor(|token| scripts::query_script(query, token))
            .await?;
        debug!(query = %query, found = handle.is_some(), "Element query");
        Ok(handle)
    }

    async fn is_visible(&self, element: &ElementHandle) -> Result<bool, ActionError> {
        let status = self
            .eval_status(&scripts::visibility_script(&element.selector))
            .await?;
        Ok(status.is_ok() && status.visible.unwrap_or(false))
    }

    async fn click(&self, element: &ElementHandle) -> Result<(), ActionError> {
        self.element(element)
            .await?
            .click()
            .await
            .map_err(|err| ActionError::NotInteractable(format!("{element}: {err}")))?;
        Ok(())
    }

    async fn clear(&self, element: &ElementHandle) -> Result<(), ActionError> {
        let status = self
            .eval_status(&scripts::clear_script(&element.selector))
            .await?;
        match status.status.as_str() {
            "ok" => Ok(()),
            "missing" => Err(ActionError::NotFound(element.selector.clone())),
            other => Err(ActionError::NotInteractable(format!("{element}: {other}"))),
        }
    }

    async fn fill(&self, element: &ElementHandle, text: &str) -> Result<(), ActionError> {
        self.clear(element).await?;
        self.element(element)
            .await?
            .focus()
            .await
            .map_err(|err| ActionError::NotInteractable(format!("{element}: {err}")))?
            .type_str(text)
            .await
            .map_err(cdp_io)?;
        Ok(())
    }

    async fn select_option(&self, element: &ElementHandle, label: &str) -> Result<(), ActionError> {
        let status = self
            .eval_status(&scripts::select_script(&element.selector, label))
            .await?;
        match status.status.as_str() {
            "ok" => Ok(()),
            "missing" => Err(ActionError::NotFound(element.selector.clone())),
            "not-found" => Err(ActionError::OptionNotFound(label.to_string())),
            other => Err(ActionError::NotInteractable(format!("{element}: {other}"))),
        }
    }

    async fn press(&self, element: &ElementHandle, key: &str) -> Result<(), ActionError> {
        self.element(element)
            .await?
            .press_key(key)
            .await
            .map_err(cdp_io)?;
        Ok(())
    }

    async fn element_at(&self, x: i32, y: i32) -> Result<Option<ElementSnapshot>, ActionError> {
        let hit: ElementAt = self.eval(&scripts::element_at_script(x, y)).await?;
        Ok(hit.element)
    }

    async fn screenshot(&self) -> Result<Vec<u8>, ActionError> {
        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .build();
        self.page.screenshot(params).await.map_err(cdp_io)
    }

    async fn viewport_size(&self) -> Result<Viewport, ActionError> {
        self.eval(scripts::VIEWPORT).await
    }
}
