//! Application service — run named tasks against every configured host.
//!
//! Tasks run in the order given; each task runs on every host in order
//! before the next task starts. The first failure stops the run. Local files
//! a task uploads are checked before any host is contacted.

use anyhow::Result;
use chrono::Utc;
use pushdeploy_common::{TaskName, TaskReport};

use crate::application::ports::{LocalFs, LocalShell, ProgressReporter, Prompter, RemoteHost};
use crate::application::services::journal::{Journal, Journaled};
use crate::application::services::{operate, provision, release};
use crate::domain::DeployConfig;
use crate::domain::error::TaskError;

/// Host name used in reports of steps run on the local machine.
pub const LOCAL_HOST: &str = "localhost";

/// Collaborators every task may use.
pub struct TaskDeps<'a, G, F, P, R> {
    pub config: &'a DeployConfig,
    pub git: &'a G,
    pub fs: &'a F,
    pub prompter: &'a P,
    pub reporter: &'a R,
}

/// What to run.
pub struct RunRequest<'a> {
    pub tasks: &'a [TaskName],
    /// Commit message for `deploy`; prompted for when absent.
    pub message: Option<&'a str>,
    /// Commit message used when prompting is not possible.
    pub fallback_message: String,
}

impl<'a> RunRequest<'a> {
    #[must_use]
    pub fn new(tasks: &'a [TaskName], message: Option<&'a str>) -> Self {
        Self {
            tasks,
            message,
            fallback_message: format!("deploy {}", Utc::now().format("%Y-%m-%d %H:%M:%S UTC")),
        }
    }
}

/// Reports of every task/host pair that ran, plus the error that stopped the
/// run, if any.
pub struct RunOutcome {
    pub reports: Vec<TaskReport>,
    pub error: Option<anyhow::Error>,
}

impl RunOutcome {
    /// Turn the outcome back into a `Result`, keeping the reports.
    ///
    /// # Errors
    ///
    /// Returns the error that stopped the run.
    pub fn into_result(self) -> Result<Vec<TaskReport>> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.reports),
        }
    }
}

/// Whether `task` commits or reverts in the local working copy first.
#[must_use]
pub fn has_local_phase(task: TaskName) -> bool {
    matches!(task, TaskName::Deploy | TaskName::Rollback)
}

/// Check that every local file `task` needs is present.
///
/// # Errors
///
/// Returns `TaskError::MissingLocalFile` naming the first missing path.
pub fn preflight(task: TaskName, cfg: &DeployConfig, fs: &impl LocalFs) -> Result<()> {
    let required = match task {
        TaskName::InstallFlask | TaskName::Deploy | TaskName::Rollback => {
            vec![cfg.local.app_dir.clone()]
        }
        TaskName::ConfigureNginx => vec![cfg.local_nginx_site()],
        TaskName::ConfigureSupervisor => vec![cfg.local_supervisor_conf()],
        TaskName::ConfigureGit => vec![cfg.local_post_receive()],
        TaskName::Create => vec![
            cfg.local.app_dir.clone(),
            cfg.local_nginx_site(),
            cfg.local_supervisor_conf(),
            cfg.local_post_receive(),
        ],
        TaskName::InstallRequirements | TaskName::RunApp | TaskName::Status => Vec::new(),
    };
    match required.into_iter().find(|p| !fs.exists(p)) {
        Some(missing) => Err(TaskError::MissingLocalFile(missing).into()),
        None => Ok(()),
    }
}

/// Run `request.tasks` against every configured host.
///
/// `connect` builds the `RemoteHost` for a host name.
pub async fn run_tasks<H, C, G, F, P, R>(
    deps: &TaskDeps<'_, G, F, P, R>,
    request: &RunRequest<'_>,
    connect: C,
) -> RunOutcome
where
    H: RemoteHost,
    C: Fn(&str) -> H,
    G: LocalShell,
    F: LocalFs,
    P: Prompter,
    R: ProgressReporter,
{
    let mut reports = Vec::new();

    for &task in request.tasks {
        if let Err(error) = preflight(task, deps.config, deps.fs) {
            return RunOutcome {
                reports,
                error: Some(error.context(task.as_str())),
            };
        }
    }

    for &task in request.tasks {
        if has_local_phase(task) {
            deps.reporter.header(&format!("{task} ({LOCAL_HOST})"));
            tracing::info!(task = %task, "running local phase");
            let journal = Journal::new();
            let git = Journaled::new(deps.git, &journal);
            let started_at = Utc::now();
            let result = run_local_phase(task, deps, &git, request).await;
            let (report, error) = finish(task, LOCAL_HOST, started_at, &journal, result);
            reports.push(report);
            if let Some(error) = error {
                return RunOutcome {
                    reports,
                    error: Some(error),
                };
            }
        }

        for name in &deps.config.hosts {
            deps.reporter.header(&format!("{task} ({name})"));
            tracing::info!(task = %task, host = %name, "running task");
            let journal = Journal::new();
            let remote = connect(name);
            let host = Journaled::new(&remote, &journal);
            let started_at = Utc::now();
            let result = run_on_host(task, deps, &host).await;
            let (report, error) = finish(task, name, started_at, &journal, result);
            reports.push(report);
            if let Some(error) = error {
                return RunOutcome {
                    reports,
                    error: Some(error),
                };
            }
        }
    }

    RunOutcome {
        reports,
        error: None,
    }
}

async fn run_local_phase<G, F, P, R>(
    task: TaskName,
    deps: &TaskDeps<'_, G, F, P, R>,
    git: &impl LocalShell,
    request: &RunRequest<'_>,
) -> Result<Option<String>>
where
    F: LocalFs,
    P: Prompter,
    R: ProgressReporter,
{
    match task {
        TaskName::Deploy => release::commit_and_push(
            deps.config,
            git,
            deps.prompter,
            deps.reporter,
            request.message,
            &request.fallback_message,
        )
        .await
        .map(|()| None),
        TaskName::Rollback => {
            release::revert_and_push(deps.config, git, deps.prompter, deps.reporter)
                .await
                .map(|()| None)
        }
        _ => Ok(None),
    }
}

async fn run_on_host<G, F, P, R>(
    task: TaskName,
    deps: &TaskDeps<'_, G, F, P, R>,
    host: &impl RemoteHost,
) -> Result<Option<String>>
where
    F: LocalFs,
    R: ProgressReporter,
{
    let cfg = deps.config;
    let reporter = deps.reporter;
    let result = match task {
        TaskName::InstallRequirements => provision::install_requirements(cfg, host, reporter).await,
        TaskName::InstallFlask => provision::install_flask(cfg, host, deps.fs, reporter).await,
        TaskName::ConfigureNginx => provision::configure_nginx(cfg, host, reporter).await,
        TaskName::ConfigureSupervisor => provision::configure_supervisor(cfg, host, reporter).await,
        TaskName::ConfigureGit => provision::configure_git(cfg, host, reporter).await,
        TaskName::Create => provision::create(cfg, host, deps.fs, reporter).await,
        TaskName::RunApp => operate::run_app(cfg, host, reporter).await,
        TaskName::Deploy | TaskName::Rollback => release::restart_app(cfg, host, reporter).await,
        TaskName::Status => return operate::status(host).await.map(Some),
    };
    result.map(|()| None)
}

fn finish(
    task: TaskName,
    host: &str,
    started_at: chrono::DateTime<Utc>,
    journal: &Journal,
    result: Result<Option<String>>,
) -> (TaskReport, Option<anyhow::Error>) {
    let (output, error) = match result {
        Ok(output) => (output, None),
        Err(e) => (None, Some(e.context(format!("{task} on {host}")))),
    };
    if let Some(e) = &error {
        tracing::warn!(task = %task, host = %host, error = %format!("{e:#}"), "task failed");
    }
    let report = TaskReport {
        task,
        host: host.to_string(),
        steps: journal.take(),
        started_at,
        finished_at: Utc::now(),
        ok: error.is_none(),
        output,
        error: error.as_ref().map(|e| format!("{e:#}")),
    };
    (report, error)
}
