//! Tests for deploy and rollback: git sequence, commit message handling,
//! confirmation and the supervisor restart.

#![allow(clippy::expect_used)]

use pushdeploy_cli::application::services::release;
use pushdeploy_cli::domain::{DeployConfig, TaskError};

use crate::mocks::{CallLog, MockGit, MockHost, RecordingReporter, ScriptedPrompter};

#[tokio::test]
async fn commit_and_push_uses_given_message_without_prompting() {
    let cfg = DeployConfig::default();
    let log = CallLog::default();
    let git = MockGit::new(&log);
    let prompter = ScriptedPrompter::answering("ignored");

    release::commit_and_push(
        &cfg,
        &git,
        &prompter,
        &RecordingReporter::default(),
        Some("fix typo"),
        "deploy now",
    )
    .await
    .expect("commit_and_push");

    assert_eq!(
        log.for_host("local"),
        vec![
            "git add -A",
            "git commit -am 'fix typo'",
            "git push production master",
        ]
    );
    assert!(prompter.asked().is_empty());
}

#[tokio::test]
async fn commit_and_push_prompts_for_missing_message() {
    let cfg = DeployConfig::default();
    let log = CallLog::default();
    let git = MockGit::new(&log);
    let prompter = ScriptedPrompter::answering("  add about page ");

    release::commit_and_push(
        &cfg,
        &git,
        &prompter,
        &RecordingReporter::default(),
        None,
        "deploy now",
    )
    .await
    .expect("commit_and_push");

    assert_eq!(prompter.asked(), vec!["Commit message?"]);
    assert!(
        log.for_host("local")
            .contains(&"git commit -am 'add about page'".to_string())
    );
}

#[tokio::test]
async fn progress_is_paused_before_commit_message_prompt() {
    let cfg = DeployConfig::default();
    let log = CallLog::default();
    let reporter = RecordingReporter::default();

    release::commit_and_push(
        &cfg,
        &MockGit::new(&log),
        &ScriptedPrompter::answering("wip"),
        &reporter,
        None,
        "deploy now",
    )
    .await
    .expect("commit_and_push");

    let events = reporter.events();
    let staging = events
        .iter()
        .position(|e| e == "step: Staging changes")
        .expect("staging step");
    assert_eq!(events.get(staging + 1).map(String::as_str), Some("pause: "));
}

#[tokio::test]
async fn given_message_does_not_pause_progress() {
    let cfg = DeployConfig::default();
    let log = CallLog::default();
    let reporter = RecordingReporter::default();

    release::commit_and_push(
        &cfg,
        &MockGit::new(&log),
        &ScriptedPrompter::defaults(),
        &reporter,
        Some("wip"),
        "deploy now",
    )
    .await
    .expect("commit_and_push");

    assert!(!reporter.events().iter().any(|e| e.starts_with("pause")));
}

#[tokio::test]
async fn commit_and_push_falls_back_to_default_message() {
    let cfg = DeployConfig::default();
    let log = CallLog::default();
    let git = MockGit::new(&log);

    release::commit_and_push(
        &cfg,
        &git,
        &ScriptedPrompter::defaults(),
        &RecordingReporter::default(),
        None,
        "deploy now",
    )
    .await
    .expect("commit_and_push");

    assert!(
        log.for_host("local")
            .contains(&"git commit -am 'deploy now'".to_string())
    );
}

#[tokio::test]
async fn blank_commit_message_is_rejected_before_commit() {
    let cfg = DeployConfig::default();
    let log = CallLog::default();
    let git = MockGit::new(&log);

    let err = release::commit_and_push(
        &cfg,
        &git,
        &ScriptedPrompter::answering("   "),
        &RecordingReporter::default(),
        None,
        "deploy now",
    )
    .await
    .expect_err("should fail");

    assert!(matches!(
        err.downcast_ref::<TaskError>(),
        Some(TaskError::EmptyCommitMessage)
    ));
    assert_eq!(log.for_host("local"), vec!["git add -A"]);
}

#[tokio::test]
async fn failed_commit_skips_push() {
    let cfg = DeployConfig::default();
    let log = CallLog::default();
    let git = MockGit::new(&log).failing_on("commit");

    let err = release::commit_and_push(
        &cfg,
        &git,
        &ScriptedPrompter::defaults(),
        &RecordingReporter::default(),
        Some("wip"),
        "deploy now",
    )
    .await
    .expect_err("should fail");

    assert!(matches!(
        err.downcast_ref::<TaskError>(),
        Some(TaskError::LocalCommand { .. })
    ));
    assert!(!log.for_host("local").iter().any(|c| c.starts_with("git push")));
}

#[tokio::test]
async fn push_follows_configured_remote_and_branch() {
    let mut cfg = DeployConfig::default();
    cfg.git.remote = "staging".to_string();
    cfg.git.branch = "main".to_string();
    let log = CallLog::default();
    let git = MockGit::new(&log);

    release::commit_and_push(
        &cfg,
        &git,
        &ScriptedPrompter::defaults(),
        &RecordingReporter::default(),
        Some("wip"),
        "deploy now",
    )
    .await
    .expect("commit_and_push");

    assert_eq!(
        log.for_host("local").last().map(String::as_str),
        Some("git push staging main")
    );
}

#[tokio::test]
async fn revert_and_push_after_confirmation() {
    let cfg = DeployConfig::default();
    let log = CallLog::default();
    let git = MockGit::new(&log);
    let prompter = ScriptedPrompter::defaults();
    let reporter = RecordingReporter::default();

    release::revert_and_push(&cfg, &git, &prompter, &reporter)
        .await
        .expect("revert_and_push");

    assert_eq!(prompter.asked().len(), 1);
    assert_eq!(reporter.events().first().map(String::as_str), Some("pause: "));
    assert_eq!(
        log.for_host("local"),
        vec!["git revert master --no-edit", "git push production master"]
    );
}

#[tokio::test]
async fn declined_rollback_aborts_without_git() {
    let cfg = DeployConfig::default();
    let log = CallLog::default();
    let git = MockGit::new(&log);

    let err = release::revert_and_push(
        &cfg,
        &git,
        &ScriptedPrompter::declining(),
        &RecordingReporter::default(),
    )
    .await
    .expect_err("should abort");

    assert!(matches!(
        err.downcast_ref::<TaskError>(),
        Some(TaskError::Aborted)
    ));
    assert!(log.all().is_empty());
}

#[tokio::test]
async fn restart_app_restarts_program() {
    let cfg = DeployConfig::default();
    let log = CallLog::default();
    let host = MockHost::new("web1", &log);

    release::restart_app(&cfg, &host, &RecordingReporter::default())
        .await
        .expect("restart_app");

    assert_eq!(log.for_host("web1"), vec!["supervisorctl restart flask_project"]);
}
