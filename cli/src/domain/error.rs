//! Typed domain error enums.
//!
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator. `code()` gives the stable identifier used in the
//! `--json` error object.

use std::path::PathBuf;

use thiserror::Error;

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors found while validating a deployment configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No hosts configured. Set `hosts` in pushdeploy.yaml or pass --host.")]
    NoHosts,

    #[error("Host is still the placeholder '{0}'. Replace it with an IP address or hostname.")]
    PlaceholderHost(String),

    #[error("Host must not be empty.")]
    EmptyHost,

    #[error("User must not be empty. Set `user` in pushdeploy.yaml or pass --user.")]
    EmptyUser,

    #[error("{0} must not be empty. Set it in pushdeploy.yaml.")]
    EmptyGitSetting(&'static str),

    #[error("Invalid app name '{0}': must match ^[A-Za-z0-9][A-Za-z0-9_.-]*$")]
    InvalidAppName(String),

    #[error("{key} must be an absolute path, got '{path}'")]
    RelativeRemotePath { key: &'static str, path: String },

    #[error("Package list must not be empty.")]
    NoPackages,
}

impl ConfigError {
    #[must_use]
    pub fn code(&self) -> &'static str {
        "invalid_config"
    }
}

// ── Task errors ───────────────────────────────────────────────────────────────

/// Errors that abort a task sequence.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("[{host}] command failed ({}): {command}\n{}", exit_label(.code), captured(.stdout, .stderr))]
    RemoteCommand {
        host: String,
        command: String,
        code: Option<i32>,
        /// Kept so tools that report on stdout (`supervisorctl status`) still show it.
        stdout: String,
        stderr: String,
    },

    #[error("[{host}] cannot connect: {stderr}")]
    Connection { host: String, stderr: String },

    #[error("local command failed ({}): {command}\n{stderr}", exit_label(.code))]
    LocalCommand {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("local path not found: {}", .0.display())]
    MissingLocalFile(PathBuf),

    #[error("nothing to upload: {} is empty", .0.display())]
    EmptyLocalDir(PathBuf),

    #[error("Commit message must not be empty.")]
    EmptyCommitMessage,

    #[error("Aborted.")]
    Aborted,
}

impl TaskError {
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            TaskError::RemoteCommand { .. } => "remote_command_failed",
            TaskError::Connection { .. } => "connection_failed",
            TaskError::LocalCommand { .. } => "local_command_failed",
            TaskError::MissingLocalFile(_) => "missing_local_file",
            TaskError::EmptyLocalDir(_) => "empty_local_dir",
            TaskError::EmptyCommitMessage => "empty_commit_message",
            TaskError::Aborted => "aborted",
        }
    }
}

fn captured(stdout: &str, stderr: &str) -> String {
    [stdout.trim_end(), stderr.trim_end()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn exit_label(code: &Option<i32>) -> String {
    code.map_or_else(|| "killed by signal".to_string(), |c| format!("exit {c}"))
}

/// Map any error in the chain to its `--json` code.
#[must_use]
pub fn error_code(err: &anyhow::Error) -> &'static str {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<TaskError>() {
            return e.code();
        }
        if let Some(e) = cause.downcast_ref::<ConfigError>() {
            return e.code();
        }
    }
    "error"
}
