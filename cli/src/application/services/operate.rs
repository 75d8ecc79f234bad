//! Application service — day-to-day operations on a provisioned server.

use anyhow::Result;

use crate::application::ports::{ProgressReporter, RemoteHost};
use crate::domain::DeployConfig;
use crate::domain::shell::quote;

/// Start the app under supervisor.
///
/// # Errors
///
/// Returns an error if `supervisorctl` fails.
pub async fn run_app(
    cfg: &DeployConfig,
    host: &impl RemoteHost,
    reporter: &impl ProgressReporter,
) -> Result<()> {
    reporter.step(&format!("Starting {}", cfg.app_name));
    host.sudo_in(
        Some(&cfg.remote_flask_dir()),
        &format!("supervisorctl start {}", quote(&cfg.app_name)),
    )
    .await?;
    reporter.success(&format!("{} started", cfg.app_name));
    Ok(())
}

/// Fetch `supervisorctl status` output.
///
/// # Errors
///
/// Returns an error if `supervisorctl` fails.
pub async fn status(host: &impl RemoteHost) -> Result<String> {
    host.sudo("supervisorctl status").await
}
