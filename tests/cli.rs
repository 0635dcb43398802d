use assert_cmd::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const LOGIN_YAML: &str = r#"
name: Login Flow
description: Sign in to the dashboard
tags: [auth]
input_schema:
  - name: user
    type: string
steps:
  - step_number: 1
    action:
      type: navigation
      url: "https://example.com/login?u={user}"
  - step_number: 2
    action:
      type: input
      value: "{user}"
      element:
        target_text: Username
        selector_strategies:
          - type: id
            value: username
            priority: 1
  - step_number: 3
    action:
      type: click
      element:
        target_text: Sign in
        selector_strategies:
          - type: text_exact
            value: Sign in
            priority: 1
            metadata: { tag: button }
        coordinates: { x: 40, y: 25 }
"#;

/// Runs inside `dir` with a config path that does not exist, so defaults apply.
fn waymark(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("waymark"));
    cmd.current_dir(dir)
        .env_remove("RUST_LOG")
        .args(["--config", "absent.yaml", "--log-level", "warn"]);
    cmd
}

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("json on stdout")
}

#[test]
fn validate_reports_valid_and_invalid_files() {
    let dir = tempfile::tempdir().unwrap();
    let good = write(dir.path(), "login.yaml", LOGIN_YAML);
    let bad = write(dir.path(), "empty.json", r#"{"name": "Empty", "steps": []}"#);

    let ok = waymark(dir.path())
        .args(["--output", "json", "validate"])
        .arg(&good)
        .output()
        .unwrap();
    assert!(ok.status.success(), "{}", String::from_utf8_lossy(&ok.stderr));
    let reports = stdout_json(&ok);
    assert_eq!(reports[0]["valid"], true);
    assert_eq!(reports[0]["name"], "Login Flow");
    assert_eq!(reports[0]["steps"], 3);
    assert!(reports[0].get("warnings").is_none());

    let failed = waymark(dir.path())
        .args(["--output", "json", "validate"])
        .arg(&good)
        .arg(&bad)
        .output()
        .unwrap();
    assert!(!failed.status.success());
    let reports = stdout_json(&failed);
    assert_eq!(reports[1]["valid"], false);
    assert!(reports[1]["error"]
        .as_str()
        .unwrap()
        .contains("invalid workflow"));
}

#[test]
fn show_prints_steps() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(dir.path(), "login.yaml", LOGIN_YAML);

    let assert = waymark(dir.path()).arg("show").arg(&file).assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("Login Flow (v1.0)"));
    assert!(stdout.contains("1. go to https://example.com/login?u={user}"));
    assert!(stdout.contains("via text_exact:Sign in (1 strategies + coordinates)"));
}

#[test]
fn library_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(dir.path(), "login.yaml", LOGIN_YAML);
    let lib = dir.path().join("lib");
    let lib = lib.to_str().unwrap();

    let added = waymark(dir.path())
        .args(["--output", "json", "library", "--dir", lib, "add"])
        .arg(&file)
        .args(["--mode", "ai", "--task", "log in"])
        .output()
        .unwrap();
    assert!(added.status.success(), "{}", String::from_utf8_lossy(&added.stderr));
    let metadata = stdout_json(&added);
    let id = metadata["id"].as_str().unwrap().to_string();
    assert_eq!(metadata["generation_mode"], "ai");
    assert!(dir.path().join("lib/definitions/login_flow.json").is_file());

    let found = waymark(dir.path())
        .args(["--output", "json", "library", "--dir", lib, "search", "sign", "--tag", "auth"])
        .output()
        .unwrap();
    assert_eq!(stdout_json(&found).as_array().unwrap().len(), 1);

    let exported = dir.path().join("exported.yaml");
    waymark(dir.path())
        .args(["library", "--dir", lib, "export", "login flow"])
        .arg(&exported)
        .assert()
        .success();
    assert!(fs::read_to_string(&exported)
        .unwrap()
        .contains("name: Login Flow"));

    waymark(dir.path())
        .args(["library", "--dir", lib, "delete", &id])
        .assert()
        .success();
    waymark(dir.path())
        .args(["library", "--dir", lib, "delete", &id])
        .assert()
        .failure();

    let listed = waymark(dir.path())
        .args(["--output", "json", "library", "--dir", lib, "list"])
        .output()
        .unwrap();
    assert!(stdout_json(&listed).as_array().unwrap().is_empty());
}

#[test]
fn info_reports_version_and_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let output = waymark(dir.path())
        .args(["--output", "json", "info"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let info = stdout_json(&output);
    assert_eq!(info["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(info["config_found"], false);
    assert_eq!(info["config"]["replay"]["element_timeout_ms"], 5000);
}
