//! Application configuration
//!
//! Loaded from YAML; every section and field has a default so partial files
//! are fine.

use std::path::PathBuf;

use action_flow::ExecutorConfig;
use action_locator::FinderConfig;
use action_primitives::Viewport;
use cdp_adapter::ChromiumConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub browser: BrowserSettings,
    pub replay: ReplaySettings,
    pub library: LibrarySettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    pub headless: bool,
    pub executable: Option<PathBuf>,
    pub viewport: Viewport,
    pub user_data_dir: Option<PathBuf>,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: true,
            executable: None,
            viewport: Viewport::default(),
            user_data_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplaySettings {
    pub element_timeout_ms: u64,
    pub navigation_timeout_ms: u64,
    pub poll_interval_ms: u64,
    pub screenshots: bool,
    pub screenshots_dir: PathBuf,
    pub allow_coordinate_fallback: bool,
}

impl Default for ReplaySettings {
    fn default() -> Self {
        Self {
            element_timeout_ms: 5_000,
            navigation_timeout_ms: 30_000,
            poll_interval_ms: 100,
            screenshots: false,
            screenshots_dir: PathBuf::from("workflows/playback_screenshots"),
            allow_coordinate_fallback: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    pub storage_dir: PathBuf,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from("workflows"),
        }
    }
}

impl Config {
    pub fn chromium(&self) -> ChromiumConfig {
        ChromiumConfig {
            headless: self.browser.headless,
            executable: self.browser.executable.clone(),
            viewport: self.browser.viewport,
            user_data_dir: self.browser.user_data_dir.clone(),
            ..ChromiumConfig::default()
        }
    }

    pub fn executor(&self) -> ExecutorConfig {
        ExecutorConfig {
            finder: FinderConfig {
                timeout_ms: self.replay.element_timeout_ms,
                poll_interval_ms: self.replay.poll_interval_ms,
            },
            navigation_timeout_ms: self.replay.navigation_timeout_ms,
            allow_coordinate_fallback: self.replay.allow_coordinate_fallback,
            screenshots: self.replay.screenshots,
            screenshots_dir: self.replay.screenshots_dir.clone(),
        }
    }
}
