use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Named task exposed on the command line.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[cfg_attr(feature = "clap", value(rename_all = "snake_case"))]
pub enum TaskName {
    InstallRequirements,
    InstallFlask,
    ConfigureNginx,
    ConfigureSupervisor,
    ConfigureGit,
    RunApp,
    Deploy,
    Rollback,
    Status,
    Create,
}

impl TaskName {
    pub const ALL: [TaskName; 10] = [
        TaskName::InstallRequirements,
        TaskName::InstallFlask,
        TaskName::ConfigureNginx,
        TaskName::ConfigureSupervisor,
        TaskName::ConfigureGit,
        TaskName::RunApp,
        TaskName::Deploy,
        TaskName::Rollback,
        TaskName::Status,
        TaskName::Create,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TaskName::InstallRequirements => "install_requirements",
            TaskName::InstallFlask => "install_flask",
            TaskName::ConfigureNginx => "configure_nginx",
            TaskName::ConfigureSupervisor => "configure_supervisor",
            TaskName::ConfigureGit => "configure_git",
            TaskName::RunApp => "run_app",
            TaskName::Deploy => "deploy",
            TaskName::Rollback => "rollback",
            TaskName::Status => "status",
            TaskName::Create => "create",
        }
    }

    /// One-line description shown in `pushdeploy list`.
    #[must_use]
    pub fn summary(self) -> &'static str {
        match self {
            TaskName::InstallRequirements => "Install required packages",
            TaskName::InstallFlask => "Create project directories, virtualenv, copy app files",
            TaskName::ConfigureNginx => "Replace the default site with the app's nginx config",
            TaskName::ConfigureSupervisor => "Register the app with supervisor",
            TaskName::ConfigureGit => "Set up the bare repo and post-receive hook",
            TaskName::RunApp => "Start the app under supervisor",
            TaskName::Deploy => "Commit, push to the production remote, restart",
            TaskName::Rollback => "Revert the last commit, push, restart",
            TaskName::Status => "Show supervisor status",
            TaskName::Create => "Run every provisioning task in order",
        }
    }
}

impl fmt::Display for TaskName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the known task names.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown task '{0}'")]
pub struct UnknownTask(pub String);

impl FromStr for TaskName {
    type Err = UnknownTask;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.replace('-', "_");
        TaskName::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| UnknownTask(s.to_string()))
    }
}

/// What a recorded step did.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// Command run as root on the remote host.
    RemoteSudo,
    /// Existence check on the remote host.
    RemoteCheck,
    /// File or directory upload.
    Upload,
    /// Command run on the local machine.
    Local,
}

/// One step of a task run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StepRecord {
    pub kind: StepKind,
    pub command: String,
    /// True when the step was printed but not executed (`--dry-run`).
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub skipped: bool,
}

/// Result of running one task against one host, emitted with `--json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskReport {
    pub task: TaskName,
    pub host: String,
    pub steps: Vec<StepRecord>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub ok: bool,
    /// Command output the task surfaces to the user (`status`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Payload of the demo application's `GET /data`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FirstNames {
    pub first_names: Vec<String>,
}

impl FirstNames {
    #[must_use]
    pub fn demo() -> Self {
        Self {
            first_names: ["John", "Jacob", "Julie", "Jenn"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}
