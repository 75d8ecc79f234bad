//! Step journal — records every command a task issues.
//!
//! `Journaled` wraps a `RemoteHost` or `LocalShell` and appends a
//! `StepRecord` before delegating, so a failing step is the last entry of
//! the journal.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Result;
use pushdeploy_common::{StepKind, StepRecord};

use crate::application::ports::{LocalShell, RemoteHost};
use crate::domain::shell;

/// Ordered list of steps issued during one task run.
#[derive(Default)]
pub struct Journal {
    steps: Mutex<Vec<StepRecord>>,
}

impl Journal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, kind: StepKind, command: String, skipped: bool) {
        if let Ok(mut steps) = self.steps.lock() {
            steps.push(StepRecord {
                kind,
                command,
                skipped,
            });
        }
    }

    /// Drain the recorded steps.
    #[must_use]
    pub fn take(&self) -> Vec<StepRecord> {
        self.steps
            .lock()
            .map(|mut s| std::mem::take(&mut *s))
            .unwrap_or_default()
    }
}

/// Wraps a port implementation and journals each call.
pub struct Journaled<'a, T> {
    inner: &'a T,
    journal: &'a Journal,
}

impl<'a, T> Journaled<'a, T> {
    pub fn new(inner: &'a T, journal: &'a Journal) -> Self {
        Self { inner, journal }
    }
}

fn describe_put(sources: &[PathBuf], remote_dir: &str) -> String {
    let names: Vec<String> = sources.iter().map(|p| p.display().to_string()).collect();
    format!("put {} -> {remote_dir}", names.join(" "))
}

impl<T: RemoteHost> RemoteHost for Journaled<'_, T> {
    fn host(&self) -> &str {
        self.inner.host()
    }

    fn dry_run(&self) -> bool {
        RemoteHost::dry_run(self.inner)
    }

    async fn sudo_in(&self, dir: Option<&str>, command: &str) -> Result<String> {
        self.journal
            .record(StepKind::RemoteSudo, shell::in_dir(dir, command), RemoteHost::dry_run(self));
        self.inner.sudo_in(dir, command).await
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        self.journal.record(
            StepKind::RemoteCheck,
            format!("test -e {}", shell::quote(path)),
            RemoteHost::dry_run(self),
        );
        self.inner.exists(path).await
    }

    async fn put(&self, sources: &[PathBuf], remote_dir: &str) -> Result<()> {
        self.journal
            .record(StepKind::Upload, describe_put(sources, remote_dir), RemoteHost::dry_run(self));
        self.inner.put(sources, remote_dir).await
    }
}

impl<T: LocalShell> LocalShell for Journaled<'_, T> {
    fn dry_run(&self) -> bool {
        LocalShell::dry_run(self.inner)
    }

    async fn git(&self, dir: &Path, args: &[&str]) -> Result<()> {
        let mut words = vec!["git"];
        words.extend_from_slice(args);
        self.journal.record(
            StepKind::Local,
            shell::in_dir(Some(&dir.display().to_string()), &shell::join(&words)),
            LocalShell::dry_run(self),
        );
        self.inner.git(dir, args).await
    }
}
