//! JSON output helpers.
//!
//! Every `--json` document is written to stdout as one pretty-printed
//! object. Errors go to stderr through [`format_error`].

use std::path::Path;

use anyhow::{Context, Result};
use pushdeploy_common::{TaskName, TaskReport};

use crate::domain::DeployConfig;
use crate::domain::template::GeneratedFile;

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Renders command results as JSON on stdout.
pub struct JsonRenderer;

impl JsonRenderer {
    fn print(value: &serde_json::Value) -> Result<()> {
        let text = serde_json::to_string_pretty(value).context("JSON serialization failed")?;
        println!("{text}");
        Ok(())
    }

    /// Render the reports of a task run.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_reports(reports: &[TaskReport], dry_run: bool) -> Result<()> {
        Self::print(&serde_json::json!({
            "ok": reports.iter().all(|r| r.ok),
            "dry_run": dry_run,
            "reports": reports,
        }))
    }

    /// Render the task catalogue.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_task_list(tasks: &[TaskName]) -> Result<()> {
        let tasks: Vec<_> = tasks
            .iter()
            .map(|t| serde_json::json!({ "name": t, "summary": t.summary() }))
            .collect();
        Self::print(&serde_json::json!({ "tasks": tasks }))
    }

    /// Render the effective configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_config(config: &DeployConfig, path: &Path) -> Result<()> {
        Self::print(&serde_json::json!({
            "path": path,
            "config": config,
        }))
    }

    /// Render the resolved config path.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_config_path(path: &Path, exists: bool) -> Result<()> {
        Self::print(&serde_json::json!({ "path": path, "exists": exists }))
    }

    /// Render the files written by `init`.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_init(files: &[GeneratedFile]) -> Result<()> {
        Self::print(&serde_json::json!({ "files": files }))
    }

    /// Render the CLI version.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_version(version: &str) -> Result<()> {
        Self::print(&serde_json::json!({ "version": version }))
    }
}
