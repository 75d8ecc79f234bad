//! `LocalShell` backed by the `git` binary.

use std::path::Path;

use anyhow::Result;

use crate::application::ports::{CommandRunner, LocalShell};
use crate::domain::error::TaskError;
use crate::domain::shell;

/// Runs `git` through a `CommandRunner` in the local working copy.
pub struct GitCli<'r, R: CommandRunner> {
    runner: &'r R,
}

impl<'r, R: CommandRunner> GitCli<'r, R> {
    pub fn new(runner: &'r R) -> Self {
        Self { runner }
    }
}

impl<R: CommandRunner> LocalShell for GitCli<'_, R> {
    async fn git(&self, dir: &Path, args: &[&str]) -> Result<()> {
        let output = self.runner.run_in(dir, "git", args).await?;
        if output.status.success() {
            return Ok(());
        }
        let mut words = vec!["git"];
        words.extend_from_slice(args);
        Err(TaskError::LocalCommand {
            command: shell::join(&words),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
        .into())
    }
}
