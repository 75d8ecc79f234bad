//! Task commands — run one or more named tasks against the configured hosts.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use pushdeploy_common::TaskName;

use crate::app::AppContext;
use crate::application::services::task_runner::{
    LOCAL_HOST, RunOutcome, RunRequest, TaskDeps, run_tasks,
};
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::dry_run::DryRun;
use crate::infra::fs::StdFs;
use crate::infra::git::GitCli;
use crate::infra::ssh::{SshHost, SshTarget};
use crate::output::TerminalReporter;

/// Arguments for `pushdeploy deploy`.
#[derive(Args)]
pub struct DeployArgs {
    /// Commit message (prompted for when omitted)
    #[arg(short, long)]
    pub message: Option<String>,
}

/// Arguments for `pushdeploy run`.
#[derive(Args)]
pub struct RunArgs {
    /// Tasks to run, in order
    #[arg(value_enum, required = true, num_args = 1..)]
    pub tasks: Vec<TaskName>,

    /// Commit message for `deploy` (prompted for when omitted)
    #[arg(short, long)]
    pub message: Option<String>,
}

/// Run `tasks` in order on every host and render the reports.
///
/// # Errors
///
/// Returns the config validation error, or the error of the first failing
/// task.
pub async fn run(app: &AppContext, tasks: &[TaskName], message: Option<&str>) -> Result<ExitCode> {
    let config = app.load_config()?;
    config.validate()?;
    tracing::debug!(hosts = ?config.hosts, tasks = ?tasks, dry_run = app.dry_run, "starting run");

    let request = RunRequest::new(tasks, message);
    let reporter = TerminalReporter::new(&app.output);
    let fs = StdFs;

    let outcome: RunOutcome = if app.dry_run {
        let git = DryRun::new(LOCAL_HOST);
        let deps = TaskDeps {
            config: &config,
            git: &git,
            fs: &fs,
            prompter: app,
            reporter: &reporter,
        };
        run_tasks(&deps, &request, DryRun::new).await
    } else {
        let runner = TokioCommandRunner::new(Duration::from_secs(config.timeout_secs));
        let git = GitCli::new(&runner);
        let deps = TaskDeps {
            config: &config,
            git: &git,
            fs: &fs,
            prompter: app,
            reporter: &reporter,
        };
        run_tasks(&deps, &request, |host: &str| {
            SshHost::new(SshTarget::from_config(&config, host), &runner)
        })
        .await
    };

    reporter.finish(outcome.error.is_none());
    app.renderer().render_reports(&outcome.reports, app.dry_run)?;
    outcome.into_result()?;
    Ok(ExitCode::SUCCESS)
}
