//! Integration tests for the CLI surface: help, version and the task list.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;

fn pushdeploy() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("pushdeploy"));
    cmd.env("NO_COLOR", "1");
    cmd
}

// --- Help and version tests ---

#[test]
fn test_cli_no_args_shows_help_and_exits_two() {
    pushdeploy().assert().code(2).stderr(predicate::str::contains(
        "Provision a server for a small web app",
    ));
}

#[test]
fn test_cli_help_lists_every_task() {
    let mut assert = pushdeploy().arg("--help").assert().success();
    for task in [
        "install_requirements",
        "install_flask",
        "configure_nginx",
        "configure_supervisor",
        "configure_git",
        "run_app",
        "deploy",
        "rollback",
        "status",
        "create",
    ] {
        assert = assert.stdout(predicate::str::contains(task));
    }
}

#[test]
fn test_cli_version_flag_shows_version() {
    pushdeploy()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pushdeploy"));
}

#[test]
fn test_version_command_shows_version() {
    pushdeploy()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pushdeploy 0.1.0"));
}

#[test]
fn test_version_command_json_outputs_valid_json() {
    pushdeploy()
        .args(["version", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""version": "0.1.0""#));
}

#[test]
fn test_unknown_task_is_rejected() {
    pushdeploy()
        .args(["run", "reboot"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid value"));
}

// --- list ---

#[test]
fn test_list_shows_summaries() {
    pushdeploy()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("configure_supervisor"))
        .stdout(predicate::str::contains("rollback"));
}

#[test]
fn test_list_json_has_every_task_in_order() {
    let output = pushdeploy()
        .args(["list", "--json"])
        .output()
        .expect("run pushdeploy");
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    let names: Vec<&str> = value["tasks"]
        .as_array()
        .expect("tasks array")
        .iter()
        .filter_map(|t| t["name"].as_str())
        .collect();
    assert_eq!(names.len(), 10);
    assert_eq!(names.first(), Some(&"install_requirements"));
    assert!(value["tasks"][0]["summary"].is_string());
}
