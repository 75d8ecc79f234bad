//! `pushdeploy list` — print every task with a one-line summary.

use std::process::ExitCode;

use anyhow::Result;
use pushdeploy_common::TaskName;

use crate::app::AppContext;

/// Run the list command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn run(app: &AppContext) -> Result<ExitCode> {
    app.renderer().render_task_list(&TaskName::ALL)?;
    Ok(ExitCode::SUCCESS)
}
