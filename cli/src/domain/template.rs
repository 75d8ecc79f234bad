//! Config file templates written by `pushdeploy init`.

use std::path::PathBuf;

use serde::Serialize;

use crate::domain::DeployConfig;
use crate::domain::config::LOCAL_CONFIG_FILE;

/// Files `pushdeploy init` can generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFile {
    NginxSite,
    SupervisorProgram,
    PostReceive,
    DeployConfig,
}

impl ConfigFile {
    pub const ALL: [ConfigFile; 4] = [
        ConfigFile::NginxSite,
        ConfigFile::SupervisorProgram,
        ConfigFile::PostReceive,
        ConfigFile::DeployConfig,
    ];

    /// Name of the embedded template.
    #[must_use]
    pub fn template_name(self) -> &'static str {
        match self {
            ConfigFile::NginxSite => "nginx.site",
            ConfigFile::SupervisorProgram => "supervisor.conf",
            ConfigFile::PostReceive => "post-receive",
            ConfigFile::DeployConfig => "pushdeploy.yaml",
        }
    }

    /// Where the rendered file goes for `cfg`.
    #[must_use]
    pub fn target(self, cfg: &DeployConfig) -> PathBuf {
        match self {
            ConfigFile::NginxSite => cfg.local_nginx_site(),
            ConfigFile::SupervisorProgram => cfg.local_supervisor_conf(),
            ConfigFile::PostReceive => cfg.local_post_receive(),
            ConfigFile::DeployConfig => PathBuf::from(LOCAL_CONFIG_FILE),
        }
    }

    #[must_use]
    pub fn executable(self) -> bool {
        self == ConfigFile::PostReceive
    }
}

/// Outcome of writing one generated file.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    /// False when the file already existed and was left untouched.
    pub created: bool,
}

/// Values for the templates that do not come from `DeployConfig`.
#[derive(Debug, Clone, Copy)]
pub struct TemplateParams<'a> {
    /// Port the app listens on behind nginx.
    pub listen_port: u16,
    /// What supervisor runs in the app directory; gunicorn serving `app:app`
    /// when unset.
    pub program_command: Option<&'a str>,
}

impl TemplateParams<'_> {
    #[must_use]
    pub fn new(listen_port: u16) -> Self {
        Self {
            listen_port,
            program_command: None,
        }
    }

    #[must_use]
    pub fn program_command(&self) -> String {
        self.program_command.map_or_else(
            || format!("gunicorn app:app -b localhost:{}", self.listen_port),
            String::from,
        )
    }
}

/// Placeholder values for `cfg`.
#[must_use]
pub fn template_vars(cfg: &DeployConfig, params: &TemplateParams<'_>) -> Vec<(&'static str, String)> {
    vec![
        ("app_name", cfg.app_name.clone()),
        ("remote_flask_dir", cfg.remote_flask_dir()),
        ("listen_port", params.listen_port.to_string()),
        ("program_command", params.program_command()),
    ]
}

/// Replace every `{{key}}` in `template` with its value.
///
/// Unknown placeholders are left as they are.
#[must_use]
pub fn render(template: &str, vars: &[(&str, String)]) -> String {
    vars.iter().fold(template.to_string(), |acc, (key, value)| {
        acc.replace(&format!("{{{{{key}}}}}"), value)
    })
}
