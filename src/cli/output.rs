use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    Yaml,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

impl OutputFormat {
    /// Print `value` as JSON/YAML, or call `human` for the readable form.
    pub fn emit<T: Serialize>(&self, value: &T, human: impl FnOnce()) -> Result<()> {
        match self {
            OutputFormat::Human => human(),
            OutputFormat::Json => println!(
                "{}",
                serde_json::to_string_pretty(value).context("Failed to render JSON")?
            ),
            OutputFormat::Yaml => print!(
                "{}",
                serde_yaml::to_string(value).context("Failed to render YAML")?
            ),
        }
        Ok(())
    }
}
