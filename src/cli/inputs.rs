//! Workflow input parsing for `waymark replay`

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use serde_json::Value;

/// Parse `key=value`. Values that read as JSON scalars, arrays or objects
/// keep their type; anything else is a string.
pub fn parse_input(raw: &str) -> Result<(String, Value)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("input '{}' must look like key=value", raw))?;
    let key = key.trim();
    if key.is_empty() {
        bail!("input '{}' has an empty key", raw);
    }
    let value = serde_json::from_str::<Value>(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

/// Read a JSON or YAML mapping of inputs.
pub fn load_inputs_file(path: &Path) -> Result<HashMap<String, Value>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read inputs file {}", path.display()))?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let inputs = if is_json {
        serde_json::from_str(&content).context("Inputs file is not a JSON object")?
    } else {
        serde_yaml::from_str(&content).context("Inputs file is not a YAML mapping")?
    };
    Ok(inputs)
}

/// File inputs first, then `--input` pairs on top.
pub fn collect_inputs(file: Option<&Path>, pairs: &[String]) -> Result<HashMap<String, Value>> {
    let mut inputs = match file {
        Some(path) => load_inputs_file(path)?,
        None => HashMap::new(),
    };
    for raw in pairs {
        let (key, value) = parse_input(raw)?;
        inputs.insert(key, value);
    }
    Ok(inputs)
}
