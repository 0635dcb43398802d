use std::env;
use std::fs as stdfs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::output::LogFormat;
use crate::config::Config;

const LOCAL_ENV_PATH: &str = "config/local.env";
const LOCAL_CONFIG_PATH: &str = "config/config.yaml";

/// Apply `config/local.env` KEY=VALUE pairs; variables already set win.
pub fn load_local_env_overrides() {
    let path = Path::new(LOCAL_ENV_PATH);
    if !path.exists() {
        return;
    }

    match stdfs::read_to_string(path) {
        Ok(contents) => {
            for (key, value) in parse_env_lines(&contents) {
                if env::var(&key).is_err() {
                    env::set_var(key, value);
                }
            }
        }
        Err(err) => {
            warn!(path = %path.display(), ?err, "failed to read local.env overrides");
        }
    }
}

fn parse_env_lines(contents: &str) -> Vec<(String, String)> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim(), value.trim()))
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.to_string(), unquote(value)))
        .collect()
}

fn unquote(value: &str) -> String {
    match value.strip_prefix('"').and_then(|v| v.strip_suffix('"')) {
        Some(inner) => inner.replace("\\\"", "\"").replace("\\n", "\n"),
        None => value.to_string(),
    }
}

/// `RUST_LOG` wins over `--log-level`; `--debug` forces debug.
pub fn init_logging(level: &str, debug: bool, format: LogFormat) -> Result<()> {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        level.parse().context("Invalid log level")?
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }

    Ok(())
}

pub struct LoadedConfig {
    pub config: Config,
    pub path: PathBuf,
}

fn default_config_path() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_PATH);
    if local.exists() {
        return Some(local);
    }
    dirs::config_dir().map(|dir| dir.join("waymark").join("config.yaml"))
}

pub async fn load_config(config_path: Option<&PathBuf>) -> Result<LoadedConfig> {
    let config_path = match config_path {
        Some(path) => path.clone(),
        None => match default_config_path() {
            Some(path) => path,
            None => {
                warn!("No configuration directory available, using defaults");
                return Ok(LoadedConfig {
                    config: Config::default(),
                    path: PathBuf::from(LOCAL_CONFIG_PATH),
                });
            }
        },
    };

    if config_path.exists() {
        let content = fs::read_to_string(&config_path)
            .await
            .with_context(|| format!("Failed to read config file {}", config_path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", config_path.display()))?;
        info!(path = %config_path.display(), "Loaded configuration");
        Ok(LoadedConfig {
            config,
            path: config_path,
        })
    } else {
        warn!(
            path = %config_path.display(),
            "Config file not found, using defaults"
        );
        Ok(LoadedConfig {
            config: Config::default(),
            path: config_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_lines_skip_comments_and_unquote() {
        let parsed = parse_env_lines(
            "# comment\n\nWAYMARK_CHROME=/usr/bin/chromium\nGREETING=\"say \\\"hi\\\"\"\nbroken\n=novalue\n",
        );
        assert_eq!(
            parsed,
            vec![
                ("WAYMARK_CHROME".to_string(), "/usr/bin/chromium".to_string()),
                ("GREETING".to_string(), "say \"hi\"".to_string()),
            ]
        );
    }

    #[test]
    fn explicit_config_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("waymark.yaml");
        std::fs::write(&path, "library:\n  storage_dir: /srv/flows\n").unwrap();

        let loaded = tokio_test::block_on(load_config(Some(&path))).unwrap();
        assert_eq!(loaded.path, path);
        assert_eq!(loaded.config.library.storage_dir, PathBuf::from("/srv/flows"));

        let missing = dir.path().join("absent.yaml");
        let loaded = tokio_test::block_on(load_config(Some(&missing))).unwrap();
        assert_eq!(loaded.config, Config::default());
    }

    #[test]
    fn malformed_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "browser: [not, a, map]\n").unwrap();
        assert!(tokio_test::block_on(load_config(Some(&path))).is_err());
    }
}
