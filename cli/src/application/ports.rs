//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;

use anyhow::Result;

use crate::domain::DeployConfig;

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
    /// Run a program with `dir` as its working directory.
    async fn run_in(&self, dir: &Path, program: &str, args: &[&str]) -> Result<Output>;
}

// ── Remote Host Port ──────────────────────────────────────────────────────────

/// The operations provisioning tasks perform against one server.
#[allow(async_fn_in_trait)]
pub trait RemoteHost {
    /// Host name or address, for messages and reports.
    fn host(&self) -> &str;

    /// `true` when commands are only recorded, not executed.
    fn dry_run(&self) -> bool {
        false
    }

    /// Run `command` as root, optionally inside `dir`, and return its stdout.
    ///
    /// # Errors
    ///
    /// Returns `TaskError::RemoteCommand` when the command exits non-zero.
    async fn sudo_in(&self, dir: Option<&str>, command: &str) -> Result<String>;

    /// Run `command` as root from the login directory.
    async fn sudo(&self, command: &str) -> Result<String> {
        self.sudo_in(None, command).await
    }

    /// Whether `path` exists on the host.
    async fn exists(&self, path: &str) -> Result<bool>;

    /// Upload local files or directories into `remote_dir`, owned by root.
    async fn put(&self, sources: &[PathBuf], remote_dir: &str) -> Result<()>;
}

// ── Local Ports ───────────────────────────────────────────────────────────────

/// Runs `git` in the local working copy.
#[allow(async_fn_in_trait)]
pub trait LocalShell {
    /// `true` when commands are only recorded, not executed.
    fn dry_run(&self) -> bool {
        false
    }

    /// Run `git <args>` inside `dir`.
    ///
    /// # Errors
    ///
    /// Returns `TaskError::LocalCommand` when git exits non-zero.
    async fn git(&self, dir: &Path, args: &[&str]) -> Result<()>;
}

/// Abstracts the local filesystem reads tasks need before uploading.
pub trait LocalFs {
    /// Whether `path` exists.
    fn exists(&self, path: &Path) -> bool;
    /// Entries of `dir` a shell `*` would match, sorted by name.
    fn glob_entries(&self, dir: &Path) -> Result<Vec<PathBuf>>;
}

/// Interactive questions asked during `deploy` and `rollback`.
pub trait Prompter {
    /// Ask for a line of text. Returns `default` when non-interactive.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails, or when running
    /// non-interactively without a default.
    fn input(&self, prompt: &str, default: Option<&str>) -> Result<String>;
    /// Ask a yes/no question. Returns `default` when non-interactive.
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait — no async needed.
pub trait ProgressReporter {
    /// Emit a section header (one per task and host).
    fn header(&self, message: &str);
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
    /// Stop any live progress display; called before an interactive prompt.
    fn pause(&self);
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Abstracts loading the deployment configuration.
pub trait ConfigStore {
    /// Load the config file, or defaults when it does not exist.
    fn load(&self) -> Result<DeployConfig>;
    /// Path the config is (or would be) read from.
    fn path(&self) -> Result<PathBuf>;
}
