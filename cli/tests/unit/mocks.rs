//! Shared mock infrastructure for unit tests.
//!
//! Every mock records what it was asked to do into a shared `CallLog` so
//! tests can assert on the exact sequence of commands.

#![allow(dead_code, clippy::expect_used)]

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use pushdeploy_cli::application::ports::{
    CommandRunner, LocalFs, LocalShell, ProgressReporter, Prompter, RemoteHost,
};
use pushdeploy_cli::domain::TaskError;
use pushdeploy_cli::domain::shell;

use crate::helpers::ok_output;

// ── Call log ─────────────────────────────────────────────────────────────────

/// Ordered `"<host>: <entry>"` lines shared by every mock in a test.
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn push(&self, host: &str, entry: String) {
        self.0.lock().expect("mutex poisoned").push(format!("{host}: {entry}"));
    }

    pub fn all(&self) -> Vec<String> {
        self.0.lock().expect("mutex poisoned").clone()
    }

    /// Entries recorded for `host`, without the prefix.
    pub fn for_host(&self, host: &str) -> Vec<String> {
        let prefix = format!("{host}: ");
        self.all()
            .into_iter()
            .filter_map(|line| line.strip_prefix(&prefix).map(String::from))
            .collect()
    }

    /// Hosts in the order they first appear.
    pub fn hosts(&self) -> Vec<String> {
        let mut hosts: Vec<String> = Vec::new();
        for line in self.all() {
            let host = line.split(": ").next().unwrap_or_default().to_string();
            if hosts.last() != Some(&host) {
                hosts.push(host);
            }
        }
        hosts
    }
}

// ── RemoteHost ───────────────────────────────────────────────────────────────

/// Scriptable `RemoteHost`.
pub struct MockHost {
    name: String,
    existing: Vec<String>,
    fail_on: Option<String>,
    stdout: String,
    log: CallLog,
}

impl MockHost {
    pub fn new(name: &str, log: &CallLog) -> Self {
        Self {
            name: name.to_string(),
            existing: Vec::new(),
            fail_on: None,
            stdout: String::new(),
            log: log.clone(),
        }
    }

    /// Paths `exists` reports as present.
    pub fn with_existing(mut self, paths: &[&str]) -> Self {
        self.existing = paths.iter().map(|p| (*p).to_string()).collect();
        self
    }

    /// Fail the first command containing `needle`.
    pub fn failing_on(mut self, needle: &str) -> Self {
        self.fail_on = Some(needle.to_string());
        self
    }

    /// Stdout returned by every `sudo` call.
    pub fn with_stdout(mut self, stdout: &str) -> Self {
        self.stdout = stdout.to_string();
        self
    }

    fn check(&self, command: &str) -> Result<()> {
        match &self.fail_on {
            Some(needle) if command.contains(needle.as_str()) => Err(TaskError::RemoteCommand {
                host: self.name.clone(),
                command: command.to_string(),
                code: Some(1),
                stdout: String::new(),
                stderr: "boom".to_string(),
            }
            .into()),
            _ => Ok(()),
        }
    }
}

impl RemoteHost for MockHost {
    fn host(&self) -> &str {
        &self.name
    }

    async fn sudo_in(&self, dir: Option<&str>, command: &str) -> Result<String> {
        let line = shell::in_dir(dir, command);
        self.log.push(&self.name, line.clone());
        self.check(&line)?;
        Ok(self.stdout.clone())
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        self.log.push(&self.name, format!("exists {path}"));
        Ok(self.existing.iter().any(|p| p == path))
    }

    async fn put(&self, sources: &[PathBuf], remote_dir: &str) -> Result<()> {
        let names: Vec<String> = sources.iter().map(|p| p.display().to_string()).collect();
        let line = format!("put {} -> {remote_dir}", names.join(" "));
        self.log.push(&self.name, line.clone());
        self.check(&line)
    }
}

// ── LocalShell ───────────────────────────────────────────────────────────────

/// Records `git` invocations under the host name `local`.
pub struct MockGit {
    fail_on: Option<String>,
    log: CallLog,
}

impl MockGit {
    pub fn new(log: &CallLog) -> Self {
        Self {
            fail_on: None,
            log: log.clone(),
        }
    }

    pub fn failing_on(mut self, needle: &str) -> Self {
        self.fail_on = Some(needle.to_string());
        self
    }
}

impl LocalShell for MockGit {
    async fn git(&self, _dir: &Path, args: &[&str]) -> Result<()> {
        let mut words = vec!["git"];
        words.extend_from_slice(args);
        let line = shell::join(&words);
        self.log.push("local", line.clone());
        match &self.fail_on {
            Some(needle) if line.contains(needle.as_str()) => Err(TaskError::LocalCommand {
                command: line,
                code: Some(1),
                stderr: "rejected".to_string(),
            }
            .into()),
            _ => Ok(()),
        }
    }
}

// ── LocalFs ──────────────────────────────────────────────────────────────────

/// In-memory `LocalFs`.
#[derive(Default)]
pub struct FakeFs {
    pub existing: Vec<PathBuf>,
    /// What `glob_entries` returns for any existing directory.
    pub entries: Vec<PathBuf>,
}

impl FakeFs {
    pub fn with(existing: Vec<PathBuf>) -> Self {
        Self {
            existing,
            entries: vec![PathBuf::from("flask_project/app.py")],
        }
    }
}

impl LocalFs for FakeFs {
    fn exists(&self, path: &Path) -> bool {
        self.existing.iter().any(|p| p == path)
    }

    fn glob_entries(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        if self.exists(dir) {
            Ok(self.entries.clone())
        } else {
            Err(TaskError::MissingLocalFile(dir.to_path_buf()).into())
        }
    }
}

// ── Prompter ─────────────────────────────────────────────────────────────────

/// Answers prompts from a script and records the questions.
pub struct ScriptedPrompter {
    pub answer: Option<String>,
    pub confirm: bool,
    pub asked: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: Some(answer.to_string()),
            confirm: true,
            asked: Mutex::new(Vec::new()),
        }
    }

    /// Returns the default for every question.
    pub fn defaults() -> Self {
        Self {
            answer: None,
            confirm: true,
            asked: Mutex::new(Vec::new()),
        }
    }

    pub fn declining() -> Self {
        Self {
            answer: None,
            confirm: false,
            asked: Mutex::new(Vec::new()),
        }
    }

    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().expect("mutex poisoned").clone()
    }
}

impl Prompter for ScriptedPrompter {
    fn input(&self, prompt: &str, default: Option<&str>) -> Result<String> {
        self.asked.lock().expect("mutex poisoned").push(prompt.to_string());
        self.answer
            .clone()
            .or_else(|| default.map(String::from))
            .ok_or_else(|| anyhow::anyhow!("no answer scripted"))
    }

    fn confirm(&self, prompt: &str, _default: bool) -> Result<bool> {
        self.asked.lock().expect("mutex poisoned").push(prompt.to_string());
        Ok(self.confirm)
    }
}

// ── ProgressReporter ─────────────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingReporter {
    pub events: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().expect("mutex poisoned").clone()
    }

    fn push(&self, kind: &str, message: &str) {
        self.events
            .lock()
            .expect("mutex poisoned")
            .push(format!("{kind}: {message}"));
    }
}

impl ProgressReporter for RecordingReporter {
    fn header(&self, message: &str) {
        self.push("header", message);
    }
    fn step(&self, message: &str) {
        self.push("step", message);
    }
    fn success(&self, message: &str) {
        self.push("success", message);
    }
    fn warn(&self, message: &str) {
        self.push("warn", message);
    }
    fn pause(&self) {
        self.push("pause", "");
    }
}

// ── CommandRunner ────────────────────────────────────────────────────────────

/// A `CommandRunner` that records every `(program, args)` call and answers
/// from a queue of canned outputs (success with empty output once drained).
#[derive(Clone, Default)]
pub struct MockCommandRunner {
    calls: Arc<Mutex<Vec<(String, Vec<String>)>>>,
    responses: Arc<Mutex<VecDeque<Output>>>,
}

impl MockCommandRunner {
    pub fn with_responses(responses: Vec<Output>) -> Self {
        Self {
            calls: Arc::default(),
            responses: Arc::new(Mutex::new(responses.into())),
        }
    }

    pub fn recorded_calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().expect("mutex poisoned").clone()
    }

    fn respond(&self, program: &str, args: &[&str]) -> Output {
        self.calls.lock().expect("mutex poisoned").push((
            program.to_string(),
            args.iter().map(|a| (*a).to_string()).collect(),
        ));
        self.responses
            .lock()
            .expect("mutex poisoned")
            .pop_front()
            .unwrap_or_else(|| ok_output(b""))
    }
}

impl CommandRunner for MockCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        Ok(self.respond(program, args))
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        _timeout: Duration,
    ) -> Result<Output> {
        Ok(self.respond(program, args))
    }

    async fn run_in(&self, _dir: &Path, program: &str, args: &[&str]) -> Result<Output> {
        Ok(self.respond(program, args))
    }
}
