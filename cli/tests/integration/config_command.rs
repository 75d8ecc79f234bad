//! Integration tests for `pushdeploy config`.
//!
//! Every test points `--config` or `PUSHDEPLOY_CONFIG` at a temp path so
//! they never read `./pushdeploy.yaml` or `~/.pushdeploy/config.yaml`.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn pushdeploy() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("pushdeploy"));
    cmd.env("NO_COLOR", "1")
        .env_remove("PUSHDEPLOY_HOST")
        .env_remove("PUSHDEPLOY_USER");
    cmd
}

/// Returns a `TempDir` and the path string for a config file inside it.
fn temp_config_path() -> (TempDir, String) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir
        .path()
        .join("pushdeploy.yaml")
        .to_string_lossy()
        .into_owned();
    (dir, path)
}

#[test]
fn test_config_help_shows_subcommands() {
    pushdeploy()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("path"));
}

#[test]
fn test_config_show_without_file_uses_defaults() {
    let (_dir, path) = temp_config_path();
    pushdeploy()
        .args(["config", "show"])
        .env("PUSHDEPLOY_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains("add_ip_or_domain"))
        .stdout(predicate::str::contains("/home/www/flask_project"));
}

#[test]
fn test_config_show_reads_file_and_applies_overrides() {
    let (dir, path) = temp_config_path();
    std::fs::write(dir.path().join("pushdeploy.yaml"), "hosts: [web1]\napp_name: shop\n")
        .expect("write config");

    let output = pushdeploy()
        .args(["config", "show", "--json", "--user", "deploy", "--config", &path])
        .output()
        .expect("run pushdeploy");
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(value["config"]["hosts"][0], "web1");
    assert_eq!(value["config"]["app_name"], "shop");
    assert_eq!(value["config"]["user"], "deploy");
    assert_eq!(value["config"]["remote"]["app_dir"], "/home/www");
}

#[test]
fn test_config_show_rejects_malformed_yaml() {
    let (dir, path) = temp_config_path();
    std::fs::write(dir.path().join("pushdeploy.yaml"), "hosts: [unterminated\n")
        .expect("write config");

    pushdeploy()
        .args(["config", "show", "--config", &path])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot parse"));
}

#[test]
fn test_config_path_prints_env_path() {
    let (_dir, path) = temp_config_path();
    pushdeploy()
        .args(["config", "path"])
        .env("PUSHDEPLOY_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains(path.as_str()));
}

#[test]
fn test_config_path_json_reports_existence() {
    let (_dir, path) = temp_config_path();
    let output = pushdeploy()
        .args(["config", "path", "--json", "--config", &path])
        .output()
        .expect("run pushdeploy");
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(value["path"], path.as_str());
    assert_eq!(value["exists"], false);
}
