//! Port implementations for `--dry-run`: nothing is executed.
//!
//! Every call succeeds. Existence checks answer "absent", so the steps a
//! fresh server would need are the ones that get listed.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::application::ports::{LocalShell, RemoteHost};

/// Stands in for both the remote host and the local git working copy.
pub struct DryRun {
    host: String,
}

impl DryRun {
    #[must_use]
    pub fn new(host: &str) -> Self {
        Self {
            host: host.to_string(),
        }
    }
}

impl RemoteHost for DryRun {
    fn host(&self) -> &str {
        &self.host
    }

    fn dry_run(&self) -> bool {
        true
    }

    async fn sudo_in(&self, _dir: Option<&str>, _command: &str) -> Result<String> {
        Ok(String::new())
    }

    async fn exists(&self, _path: &str) -> Result<bool> {
        Ok(false)
    }

    async fn put(&self, _sources: &[PathBuf], _remote_dir: &str) -> Result<()> {
        Ok(())
    }
}

impl LocalShell for DryRun {
    fn dry_run(&self) -> bool {
        true
    }

    async fn git(&self, _dir: &Path, _args: &[&str]) -> Result<()> {
        Ok(())
    }
}
