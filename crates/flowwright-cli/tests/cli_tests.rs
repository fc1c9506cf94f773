//! Integration tests for the `flowwright` binary.
//!
//! None of these reach a real provider: they cover argument handling and
//! the failure paths that must not need one.

#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use std::fs;
use tempfile::tempdir;

fn flowwright() -> Command {
    let mut cmd = Command::cargo_bin("flowwright").expect("flowwright bin");
    cmd.env_remove("GEMINI_API_KEY")
        .env_remove("GEMINI_MODEL")
        .env_remove("GEMINI_BASE_URL")
        .env_remove("FLOWWRIGHT_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

const SAVED_WORKFLOW: &str = r#"[
  {
    "id": "step-1",
    "title": "Fetch feed",
    "nodeType": "API 请求",
    "description": "GET the feed",
    "rationale": "source data"
  },
  {
    "id": "step-2",
    "title": "Parse",
    "nodeType": "代码 (Code)",
    "description": "Parse the XML",
    "rationale": "structure",
    "codeSnippet": "return parse(input);"
  }
]"#;

#[test]
fn help_lists_commands() {
    flowwright()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("generate").and(contains("chat")).and(contains("copy")));
}

#[test]
fn blank_goal_is_rejected_without_credentials() {
    flowwright()
        .args(["generate", "   "])
        .assert()
        .failure()
        .stderr(contains("Goal is empty"));
}

#[test]
fn missing_api_key_is_reported() {
    flowwright()
        .args(["generate", "summarize", "AI", "news"])
        .assert()
        .failure()
        .stderr(contains("GEMINI_API_KEY"));
}

#[test]
fn unsupported_config_format_is_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.xml");
    fs::write(&path, "<settings/>").unwrap();

    flowwright()
        .arg("--config")
        .arg(&path)
        .args(["generate", "news digest"])
        .assert()
        .failure()
        .stderr(contains("Unsupported format"));
}

#[test]
fn unreachable_provider_fails_generation() {
    // bind then release a port so nothing listens on it
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();

    flowwright()
        .env("GEMINI_API_KEY", "test-key")
        .env("GEMINI_BASE_URL", format!("http://127.0.0.1:{port}"))
        .args(["generate", "news digest"])
        .assert()
        .failure()
        .stderr(contains("Workflow generation failed"));
}

#[test]
fn copy_reports_step_without_code() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("plan.json");
    fs::write(&path, SAVED_WORKFLOW).unwrap();

    flowwright()
        .arg("copy")
        .arg(&path)
        .arg("1")
        .assert()
        .failure()
        .stderr(contains("Step 1 has no code snippet"));
}

#[test]
fn copy_reports_missing_step() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("plan.json");
    fs::write(&path, SAVED_WORKFLOW).unwrap();

    flowwright()
        .arg("copy")
        .arg(&path)
        .arg("7")
        .assert()
        .failure()
        .stderr(contains("Step 7 does not exist"));
}

#[test]
fn copy_without_clipboard_still_yields_the_snippet() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("plan.json");
    fs::write(&path, SAVED_WORKFLOW).unwrap();

    // headless: the snippet is printed; with a clipboard: a confirmation
    flowwright()
        .arg("copy")
        .arg(&path)
        .arg("2")
        .env_remove("DISPLAY")
        .env_remove("WAYLAND_DISPLAY")
        .assert()
        .success()
        .stdout(contains("return parse(input);").or(contains("Copied the code of step 2")));
}
