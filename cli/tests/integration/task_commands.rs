//! Integration tests for task subcommands. Nothing here reaches a server:
//! runs either fail validation or use --dry-run.

#![allow(clippy::expect_used)]

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn pushdeploy_in(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("pushdeploy"));
    cmd.env("NO_COLOR", "1")
        .env_remove("PUSHDEPLOY_HOST")
        .env_remove("PUSHDEPLOY_USER")
        .env("PUSHDEPLOY_CONFIG", dir.join("pushdeploy.yaml"))
        .current_dir(dir);
    cmd
}

/// A project directory with generated config files and a one-file app.
fn project() -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    pushdeploy_in(dir.path()).arg("init").assert().success();
    std::fs::create_dir_all(dir.path().join("flask_project")).expect("mkdir");
    std::fs::write(dir.path().join("flask_project/app.py"), "app = None\n").expect("write");
    dir
}

#[test]
fn test_placeholder_host_is_rejected() {
    let dir = TempDir::new().expect("temp dir");
    pushdeploy_in(dir.path())
        .arg("status")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("placeholder"));
}

#[test]
fn test_json_error_goes_to_stderr() {
    let dir = TempDir::new().expect("temp dir");
    let output = pushdeploy_in(dir.path())
        .args(["status", "--json"])
        .output()
        .expect("run pushdeploy");
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());

    let value: serde_json::Value = serde_json::from_slice(&output.stderr).expect("valid JSON");
    assert_eq!(value["error"], true);
    assert_eq!(value["code"], "invalid_config");
}

#[test]
fn test_empty_git_branch_stops_deploy_before_commit() {
    let dir = project();
    std::fs::write(
        dir.path().join("pushdeploy.yaml"),
        "hosts: [192.0.2.1]\ngit:\n  remote: production\n  branch: ''\n",
    )
    .expect("write config");
    pushdeploy_in(dir.path())
        .args(["--dry-run", "deploy"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Committing").not())
        .stderr(predicate::str::contains("git.branch must not be empty"));
}

#[test]
fn test_missing_local_file_is_reported_before_connecting() {
    let dir = TempDir::new().expect("temp dir");
    pushdeploy_in(dir.path())
        .args(["--host", "192.0.2.1", "configure_nginx"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("local path not found"));
}

#[test]
fn test_dry_run_create_prints_plan() {
    let dir = project();
    pushdeploy_in(dir.path())
        .args(["--host", "web1", "--dry-run", "create"])
        .assert()
        .success()
        .stdout(predicate::str::contains("create (web1)"))
        .stdout(predicate::str::contains("$ apt-get update"))
        .stdout(predicate::str::contains("$ cd /home/git/flask_project.git && git init --bare"))
        .stdout(predicate::str::contains("Dry run: nothing was executed."));
}

#[test]
fn test_dry_run_json_lists_skipped_steps_per_host() {
    let dir = project();
    let output = pushdeploy_in(dir.path())
        .args(["--host", "web1,web2", "--dry-run", "--json", "run", "install_requirements", "run_app"])
        .output()
        .expect("run pushdeploy");
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(value["ok"], true);
    assert_eq!(value["dry_run"], true);
    let reports = value["reports"].as_array().expect("reports");
    let pairs: Vec<(&str, &str)> = reports
        .iter()
        .filter_map(|r| Some((r["task"].as_str()?, r["host"].as_str()?)))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("install_requirements", "web1"),
            ("install_requirements", "web2"),
            ("run_app", "web1"),
            ("run_app", "web2"),
        ]
    );
    assert!(
        reports
            .iter()
            .flat_map(|r| r["steps"].as_array().into_iter().flatten())
            .all(|s| s["skipped"] == true)
    );
}

#[test]
fn test_dry_run_deploy_does_not_prompt() {
    let dir = project();
    pushdeploy_in(dir.path())
        .args(["--host", "web1", "--dry-run", "deploy"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("git push production master"))
        .stdout(predicate::str::contains("supervisorctl restart flask_project"));
}
