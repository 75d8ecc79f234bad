//! Application service — deploy and rollback.
//!
//! Both are split into a local phase (commit or revert, then push to the
//! server's bare repository, which runs the post-receive hook) and a remote
//! phase (restart the program under supervisor). The local phase runs once;
//! the remote phase runs on every host.

use anyhow::{Context, Result};

use crate::application::ports::{LocalShell, ProgressReporter, Prompter, RemoteHost};
use crate::domain::DeployConfig;
use crate::domain::error::TaskError;
use crate::domain::shell::quote;

/// Stage every change, commit it, and push to the deploy remote.
///
/// `message` wins over the prompt; `fallback_message` is what the prompt
/// returns when running non-interactively, and what a dry run uses.
///
/// # Errors
///
/// Returns an error if any git command fails or the message is empty.
pub async fn commit_and_push(
    cfg: &DeployConfig,
    git: &impl LocalShell,
    prompter: &impl Prompter,
    reporter: &impl ProgressReporter,
    message: Option<&str>,
    fallback_message: &str,
) -> Result<()> {
    let dir = cfg.local.app_dir.as_path();

    reporter.step("Staging changes");
    git.git(dir, &["add", "-A"]).await?;

    let message = match message {
        Some(m) => m.to_string(),
        None if git.dry_run() => fallback_message.to_string(),
        None => {
            reporter.pause();
            prompter
                .input("Commit message?", Some(fallback_message))
                .context("reading commit message")?
        }
    };
    let message = message.trim();
    if message.is_empty() {
        return Err(TaskError::EmptyCommitMessage.into());
    }

    reporter.step(&format!("Committing \"{message}\""));
    git.git(dir, &["commit", "-am", message]).await?;

    push(cfg, git, reporter).await
}

/// Revert the tip of the deploy branch and push the revert.
///
/// # Errors
///
/// Returns `TaskError::Aborted` if the user declines, or an error if any
/// git command fails.
pub async fn revert_and_push(
    cfg: &DeployConfig,
    git: &impl LocalShell,
    prompter: &impl Prompter,
    reporter: &impl ProgressReporter,
) -> Result<()> {
    let branch = cfg.git.branch.as_str();
    let question = format!(
        "Revert the last commit on {branch} and push to {}?",
        cfg.git.remote
    );
    let confirmed = git.dry_run() || {
        reporter.pause();
        prompter.confirm(&question, true)?
    };
    if !confirmed {
        return Err(TaskError::Aborted.into());
    }

    reporter.step(&format!("Reverting {branch}"));
    git.git(cfg.local.app_dir.as_path(), &["revert", branch, "--no-edit"])
        .await?;

    push(cfg, git, reporter).await
}

async fn push(
    cfg: &DeployConfig,
    git: &impl LocalShell,
    reporter: &impl ProgressReporter,
) -> Result<()> {
    reporter.step(&format!("Pushing to {}/{}", cfg.git.remote, cfg.git.branch));
    git.git(
        cfg.local.app_dir.as_path(),
        &["push", &cfg.git.remote, &cfg.git.branch],
    )
    .await?;
    reporter.success("Pushed");
    Ok(())
}

/// Restart the app under supervisor.
///
/// # Errors
///
/// Returns an error if `supervisorctl` fails.
pub async fn restart_app(
    cfg: &DeployConfig,
    host: &impl RemoteHost,
    reporter: &impl ProgressReporter,
) -> Result<()> {
    reporter.step(&format!("Restarting {} on {}", cfg.app_name, host.host()));
    host.sudo(&format!("supervisorctl restart {}", quote(&cfg.app_name)))
        .await?;
    reporter.success("Restarted");
    Ok(())
}
