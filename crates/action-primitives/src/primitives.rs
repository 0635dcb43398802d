use async_trait::async_trait;
use waymark_core_types::ElementSnapshot;

use crate::errors::ActionError;
use crate::types::{ElementHandle, ElementQuery, Viewport};

/// Browser driving capability.
///
/// One implementation drives one page. Callers issue operations strictly one
/// after another; implementations may rely on never seeing two concurrent
/// calls for the same page.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// Navigate to a URL and wait for the load to settle
    async fn navigate(&self, url: &str) -> Result<(), ActionError>;

    async fn go_back(&self) -> Result<(), ActionError>;

    async fn go_forward(&self) -> Result<(), ActionError>;

    /// Mouse click at viewport coordinates
    async fn click_at(&self, x: i32, y: i32) -> Result<(), ActionError>;

    /// Focus the point by clicking, optionally clear, type, optionally submit
    async fn type_at(
        &self,
        x: i32,
        y: i32,
        text: &str,
        press_enter: bool,
        clear_first: bool,
    ) -> Result<(), ActionError>;

    /// Scroll the window by a pixel delta
    async fn scroll_by(&self, dx: i32, dy: i32) -> Result<(), ActionError>;

    /// Key press on whatever currently has focus
    async fn press_key(&self, key: &str) -> Result<(), ActionError>;

    /// Visible text of the page body
    async fn visible_text(&self) -> Result<String, ActionError>;

    /// First element matching the query, `None` when nothing matches
    async fn query(&self, query: &ElementQuery) -> Result<Option<ElementHandle>, ActionError>;

    async fn is_visible(&self, element: &ElementHandle) -> Result<bool, ActionError>;

    async fn click(&self, element: &ElementHandle) -> Result<(), ActionError>;

    async fn clear(&self, element: &ElementHandle) -> Result<(), ActionError>;

    /// Replace the element's value with `text`
    async fn fill(&self, element: &ElementHandle, text: &str) -> Result<(), ActionError>;

    /// Select a `<select>` option by its visible label
    async fn select_option(&self, element: &ElementHandle, label: &str)
        -> Result<(), ActionError>;

    /// Key press delivered to a specific element
    async fn press(&self, element: &ElementHandle, key: &str) -> Result<(), ActionError>;

    /// DOM read of the element under a point
    async fn element_at(&self, x: i32, y: i32) -> Result<Option<ElementSnapshot>, ActionError>;

    /// PNG screenshot of the viewport
    async fn screenshot(&self) -> Result<Vec<u8>, ActionError>;

    async fn viewport_size(&self) -> Result<Viewport, ActionError>;
}
