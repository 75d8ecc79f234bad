//! `pushdeploy init` — write the config files tasks upload.

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use pushdeploy_common::DemoServerConfig;

use crate::app::AppContext;
use crate::domain::template::{ConfigFile, TemplateParams};
use crate::infra::templates;

/// Arguments for the `pushdeploy init` command.
#[derive(Args)]
pub struct InitArgs {
    /// App name used in file names and templates (default: from config)
    #[arg(long)]
    pub app_name: Option<String>,

    /// Port the app listens on behind nginx
    #[arg(long, default_value_t = DemoServerConfig::default().listen_addr.port())]
    pub listen_port: u16,

    /// Command supervisor runs in the app directory
    /// (default: gunicorn app:app -b localhost:<listen-port>)
    #[arg(long, value_name = "COMMAND")]
    pub command: Option<String>,

    /// Do not write a sample pushdeploy.yaml
    #[arg(long)]
    pub no_config: bool,
}

/// Run the init command in the current directory.
///
/// Existing files are left untouched.
///
/// # Errors
///
/// Returns an error if the app name is invalid or a file cannot be written.
pub fn run(app: &AppContext, args: &InitArgs) -> Result<ExitCode> {
    let mut config = app.load_config()?;
    if let Some(name) = &args.app_name {
        config.app_name.clone_from(name);
        config.local.app_dir = Path::new(".").join(name);
    }
    config.validate_app_name()?;

    let files: Vec<ConfigFile> = ConfigFile::ALL
        .into_iter()
        .filter(|f| !(args.no_config && *f == ConfigFile::DeployConfig))
        .collect();
    let params = TemplateParams {
        listen_port: args.listen_port,
        program_command: args.command.as_deref(),
    };
    let written = templates::write_missing(&config, &params, Path::new("."), &files)?;
    app.renderer().render_init(&written)?;
    Ok(ExitCode::SUCCESS)
}
