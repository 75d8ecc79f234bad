//! Domain types and validators for deployment configuration.
//!
//! Pure functions only — no I/O, no async, no filesystem access.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

/// Host value shipped in the sample config; must be replaced before use.
pub const PLACEHOLDER_HOST: &str = "add_ip_or_domain";

/// Virtualenv `install_flask` creates under `remote.app_dir`.
pub const VIRTUALENV_NAME: &str = "env";

/// Config file looked up in the current directory.
pub const LOCAL_CONFIG_FILE: &str = "pushdeploy.yaml";

pub const DEFAULT_PACKAGES: &[&str] = &[
    "python",
    "python-pip",
    "python-virtualenv",
    "nginx",
    "gunicorn",
    "supervisor",
    "git",
];

#[allow(clippy::expect_used)] // Pattern is a compile-time constant
static APP_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]*$").expect("valid regex"));

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `pushdeploy.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DeployConfig {
    /// Hosts every task runs against, in order.
    pub hosts: Vec<String>,
    /// SSH login user; must be able to `sudo` without a password.
    pub user: String,
    /// SSH port, when not 22.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Private key passed to `ssh -i`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity_file: Option<PathBuf>,
    /// Name of the app; used for the nginx site, supervisor program and bare repo.
    pub app_name: String,
    pub local: LocalPaths,
    pub remote: RemotePaths,
    /// Packages `install_requirements` installs, in order.
    pub packages: Vec<String>,
    /// Requirement `install_flask` installs into the virtualenv.
    pub flask_requirement: String,
    pub git: GitSettings,
    /// Per-command timeout in seconds.
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LocalPaths {
    /// Application sources; also the working copy `deploy` commits from.
    pub app_dir: PathBuf,
    /// Holds the nginx site, supervisor program and post-receive hook.
    pub config_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RemotePaths {
    pub app_dir: String,
    pub git_dir: String,
    pub nginx_available_dir: String,
    pub nginx_enabled_dir: String,
    pub supervisor_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GitSettings {
    /// Remote pointing at the bare repository on the server.
    pub remote: String,
    pub branch: String,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            hosts: vec![PLACEHOLDER_HOST.to_string()],
            user: "newuser".to_string(),
            port: None,
            identity_file: None,
            app_name: "flask_project".to_string(),
            local: LocalPaths::default(),
            remote: RemotePaths::default(),
            packages: DEFAULT_PACKAGES.iter().map(|p| (*p).to_string()).collect(),
            flask_requirement: "Flask==0.10.1".to_string(),
            git: GitSettings::default(),
            timeout_secs: 600,
        }
    }
}

impl Default for LocalPaths {
    fn default() -> Self {
        Self {
            app_dir: PathBuf::from("./flask_project"),
            config_dir: PathBuf::from("./config"),
        }
    }
}

impl Default for RemotePaths {
    fn default() -> Self {
        Self {
            app_dir: "/home/www".to_string(),
            git_dir: "/home/git".to_string(),
            nginx_available_dir: "/etc/nginx/sites-available".to_string(),
            nginx_enabled_dir: "/etc/nginx/sites-enabled".to_string(),
            supervisor_dir: "/etc/supervisor/conf.d".to_string(),
        }
    }
}

impl Default for GitSettings {
    fn default() -> Self {
        Self {
            remote: "production".to_string(),
            branch: "master".to_string(),
        }
    }
}

// ── Derived paths ────────────────────────────────────────────────────────────

fn remote_join(dir: &str, name: &str) -> String {
    format!("{}/{name}", dir.trim_end_matches('/'))
}

impl DeployConfig {
    /// Where the app files live on the server.
    #[must_use]
    pub fn remote_flask_dir(&self) -> String {
        remote_join(&self.remote.app_dir, &self.app_name)
    }

    /// Virtualenv created by `install_flask`.
    #[must_use]
    pub fn remote_env_dir(&self) -> String {
        remote_join(&self.remote.app_dir, VIRTUALENV_NAME)
    }

    #[must_use]
    pub fn bare_repo_dir(&self) -> String {
        remote_join(&self.remote.git_dir, &format!("{}.git", self.app_name))
    }

    #[must_use]
    pub fn nginx_site(&self) -> String {
        remote_join(&self.remote.nginx_enabled_dir, &self.app_name)
    }

    #[must_use]
    pub fn nginx_available_site(&self) -> String {
        remote_join(&self.remote.nginx_available_dir, &self.app_name)
    }

    #[must_use]
    pub fn nginx_default_site(&self) -> String {
        remote_join(&self.remote.nginx_enabled_dir, "default")
    }

    #[must_use]
    pub fn supervisor_conf(&self) -> String {
        remote_join(&self.remote.supervisor_dir, &self.supervisor_conf_name())
    }

    #[must_use]
    pub fn supervisor_conf_name(&self) -> String {
        format!("{}.conf", self.app_name)
    }

    /// Local nginx site uploaded by `configure_nginx`.
    #[must_use]
    pub fn local_nginx_site(&self) -> PathBuf {
        self.local.config_dir.join(&self.app_name)
    }

    /// Local supervisor program uploaded by `configure_supervisor`.
    #[must_use]
    pub fn local_supervisor_conf(&self) -> PathBuf {
        self.local.config_dir.join(self.supervisor_conf_name())
    }

    /// Local hook uploaded by `configure_git`.
    #[must_use]
    pub fn local_post_receive(&self) -> PathBuf {
        self.local.config_dir.join("post-receive")
    }

    /// Replace hosts and user with values given on the command line.
    pub fn apply_overrides(&mut self, hosts: &[String], user: Option<&str>) {
        if !hosts.is_empty() {
            self.hosts = hosts.to_vec();
        }
        if let Some(user) = user {
            self.user = user.to_string();
        }
    }

    /// Check `app_name` is safe to use in file names and remote paths.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidAppName`.
    pub fn validate_app_name(&self) -> Result<(), ConfigError> {
        if APP_NAME_RE.is_match(&self.app_name) {
            Ok(())
        } else {
            Err(ConfigError::InvalidAppName(self.app_name.clone()))
        }
    }

    /// Check the config is usable for running tasks.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hosts.is_empty() {
            return Err(ConfigError::NoHosts);
        }
        for host in &self.hosts {
            if host.trim().is_empty() {
                return Err(ConfigError::EmptyHost);
            }
            if host == PLACEHOLDER_HOST {
                return Err(ConfigError::PlaceholderHost(host.clone()));
            }
        }
        if self.user.trim().is_empty() {
            return Err(ConfigError::EmptyUser);
        }
        self.validate_app_name()?;
        for (key, value) in [("git.remote", &self.git.remote), ("git.branch", &self.git.branch)] {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyGitSetting(key));
            }
        }
        let remote = [
            ("remote.app_dir", &self.remote.app_dir),
            ("remote.git_dir", &self.remote.git_dir),
            ("remote.nginx_available_dir", &self.remote.nginx_available_dir),
            ("remote.nginx_enabled_dir", &self.remote.nginx_enabled_dir),
            ("remote.supervisor_dir", &self.remote.supervisor_dir),
        ];
        for (key, path) in remote {
            if !path.starts_with('/') {
                return Err(ConfigError::RelativeRemotePath {
                    key,
                    path: path.clone(),
                });
            }
        }
        if self.packages.is_empty() {
            return Err(ConfigError::NoPackages);
        }
        Ok(())
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
