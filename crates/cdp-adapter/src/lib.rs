//! Chromium driver for Waymark
//!
//! `ChromiumDriver` implements `action_primitives::BrowserDriver` over the
//! Chrome DevTools Protocol using `chromiumoxide`. Element queries are
//! evaluated in the page and the match is anchored with a unique
//! `data-waymark-anchor` attribute, so element handles are plain CSS
//! selectors.

pub mod config;
mod driver;
pub mod errors;
mod keys;
pub mod scripts;

pub use config::{detect_chrome_executable, ChromiumConfig};
pub use driver::ChromiumDriver;
pub use errors::AdapterError;
