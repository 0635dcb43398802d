use std::env;
use std::path::PathBuf;

use action_primitives::Viewport;
use serde::{Deserialize, Serialize};
use which::which;

/// Launch settings for [`crate::ChromiumDriver`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChromiumConfig {
    pub headless: bool,
    /// Explicit browser binary; detected from `WAYMARK_CHROME`, `PATH` and
    /// well-known install locations when unset.
    pub executable: Option<PathBuf>,
    pub viewport: Viewport,
    /// Profile directory; chromiumoxide picks a temporary one when unset.
    pub user_data_dir: Option<PathBuf>,
    pub launch_timeout_ms: u64,
    pub request_timeout_ms: u64,
    /// Pass `--no-sandbox` (containers running as root need it)
    pub no_sandbox: bool,
}

impl Default for ChromiumConfig {
    fn default() -> Self {
        Self {
            headless: true,
            executable: None,
            viewport: Viewport::default(),
            user_data_dir: None,
            launch_timeout_ms: 20_000,
            request_timeout_ms: 30_000,
            no_sandbox: env_flag("WAYMARK_DISABLE_SANDBOX"),
        }
    }
}

impl ChromiumConfig {
    /// Configured executable, else the first detected one.
    pub fn resolve_executable(&self) -> Option<PathBuf> {
        self.executable.clone().or_else(detect_chrome_executable)
    }
}

fn env_flag(name: &str) -> bool {
    env::var(name)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

pub fn detect_chrome_executable() -> Option<PathBuf> {
    if let Ok(raw) = env::var("WAYMARK_CHROME") {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            let candidate = PathBuf::from(trimmed);
            if candidate.exists() {
                return Some(candidate);
            }
        }
    }

    for name in chrome_executable_names() {
        if let Ok(path) = which(name) {
            return Some(path);
        }
    }

    os_specific_chrome_paths()
        .into_iter()
        .find(|candidate| candidate.exists())
}

fn chrome_executable_names() -> &'static [&'static str] {
    #[cfg(target_os = "windows")]
    {
        &["chrome.exe", "chromium.exe", "msedge.exe"]
    }

    #[cfg(not(target_os = "windows"))]
    {
        &[
            "google-chrome-stable",
            "google-chrome",
            "chromium",
            "chromium-browser",
        ]
    }
}

fn os_specific_chrome_paths() -> Vec<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        vec![
            PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome"),
            PathBuf::from("/Applications/Chromium.app/Contents/MacOS/Chromium"),
        ]
    }

    #[cfg(target_os = "windows")]
    {
        ["PROGRAMFILES", "PROGRAMFILES(X86)", "LOCALAPPDATA"]
            .iter()
            .filter_map(|var| env::var(var).ok())
            .map(|root| PathBuf::from(root).join("Google/Chrome/Application/chrome.exe"))
            .collect()
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        vec![
            PathBuf::from("/usr/bin/google-chrome"),
            PathBuf::from("/usr/bin/chromium"),
            PathBuf::from("/snap/bin/chromium"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_executable_wins() {
        let config = ChromiumConfig {
            executable: Some(PathBuf::from("/opt/chrome/chrome")),
            ..ChromiumConfig::default()
        };
        assert_eq!(
            config.resolve_executable(),
            Some(PathBuf::from("/opt/chrome/chrome"))
        );
    }

    #[test]
    fn partial_config_uses_defaults() {
        let config: ChromiumConfig = serde_json::from_str(r#"{"headless": false}"#).unwrap();
        assert!(!config.headless);
        assert_eq!(config.viewport, Viewport::default());
        assert_eq!(config.launch_timeout_ms, 20_000);
    }
}
