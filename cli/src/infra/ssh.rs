//! `RemoteHost` over the system `ssh` and `scp` clients.
//!
//! Every call is one `ssh` invocation in batch mode, so authentication must
//! come from the agent or an identity file and `sudo` must not ask for a
//! password.

use std::path::PathBuf;
use std::process::Output;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, RemoteHost};
use crate::domain::DeployConfig;
use crate::domain::error::TaskError;
use crate::domain::shell::{self, quote};

/// `ssh` exits with 255 when the connection itself fails.
const SSH_TRANSPORT_FAILURE: i32 = 255;

/// Where and how to log in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshTarget {
    pub user: String,
    pub host: String,
    pub port: Option<u16>,
    pub identity_file: Option<PathBuf>,
}

impl SshTarget {
    /// Target for `host` using the login settings of `cfg`.
    #[must_use]
    pub fn from_config(cfg: &DeployConfig, host: &str) -> Self {
        Self {
            user: cfg.user.clone(),
            host: host.to_string(),
            port: cfg.port,
            identity_file: cfg.identity_file.clone(),
        }
    }

    #[must_use]
    pub fn destination(&self) -> String {
        format!("{}@{}", self.user, self.host)
    }

    fn common_options(&self, port_flag: &str) -> Vec<String> {
        let mut args = vec!["-o".to_string(), "BatchMode=yes".to_string()];
        if let Some(port) = self.port {
            args.push(port_flag.to_string());
            args.push(port.to_string());
        }
        if let Some(identity) = &self.identity_file {
            args.push("-i".to_string());
            args.push(identity.display().to_string());
        }
        args
    }

    /// Arguments for `ssh` running `remote_command` on the target.
    #[must_use]
    pub fn ssh_args(&self, remote_command: &str) -> Vec<String> {
        let mut args = self.common_options("-p");
        args.push(self.destination());
        args.push("--".to_string());
        args.push(remote_command.to_string());
        args
    }

    /// Arguments for `scp -r` copying `sources` into `remote_dir`.
    #[must_use]
    pub fn scp_args(&self, sources: &[PathBuf], remote_dir: &str) -> Vec<String> {
        let mut args = self.common_options("-P");
        args.push("-r".to_string());
        args.extend(sources.iter().map(|p| p.display().to_string()));
        args.push(format!("{}:{remote_dir}/", self.destination()));
        args
    }
}

/// Infrastructure adapter that routes every remote operation through a
/// `CommandRunner`.
///
/// Generic over `R: CommandRunner` so that tests can inject a mock runner
/// without spawning real processes.
pub struct SshHost<'r, R: CommandRunner> {
    target: SshTarget,
    runner: &'r R,
}

impl<'r, R: CommandRunner> SshHost<'r, R> {
    pub fn new(target: SshTarget, runner: &'r R) -> Self {
        Self { target, runner }
    }

    async fn ssh(&self, remote_command: &str) -> Result<Output> {
        let args = self.target.ssh_args(remote_command);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        self.runner
            .run("ssh", &args)
            .await
            .with_context(|| format!("ssh {}", self.target.destination()))
    }

    /// Run `remote_command` and fail on any non-zero exit.
    async fn ssh_checked(&self, remote_command: &str, shown: &str) -> Result<String> {
        let output = self.ssh(remote_command).await?;
        self.check(&output, shown)?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn check(&self, output: &Output, shown: &str) -> Result<()> {
        if output.status.success() {
            return Ok(());
        }
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let code = output.status.code();
        if code == Some(SSH_TRANSPORT_FAILURE) {
            return Err(TaskError::Connection {
                host: self.target.host.clone(),
                stderr,
            }
            .into());
        }
        Err(TaskError::RemoteCommand {
            host: self.target.host.clone(),
            command: shown.to_string(),
            code,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr,
        }
        .into())
    }

    async fn upload(&self, sources: &[PathBuf], remote_dir: &str) -> Result<()> {
        let stage = self
            .ssh_checked("mktemp -d /tmp/pushdeploy.XXXXXX", "mktemp -d")
            .await?
            .trim()
            .to_string();

        let result = async {
            let args = self.target.scp_args(sources, &stage);
            let args: Vec<&str> = args.iter().map(String::as_str).collect();
            let output = self
                .runner
                .run("scp", &args)
                .await
                .context("failed to run scp")?;
            self.check(&output, &format!("scp -> {stage}"))?;

            let copy = format!("cp -r {}/. {}/", quote(&stage), quote(remote_dir));
            self.ssh_checked(&shell::sudo(None, &copy), &copy).await?;
            Ok::<(), anyhow::Error>(())
        }
        .await;

        let cleanup = format!("rm -rf {}", quote(&stage));
        if let Err(e) = self.ssh_checked(&cleanup, &cleanup).await {
            tracing::warn!(host = %self.target.host, stage = %stage, error = %e, "failed to remove upload staging dir");
        }
        result
    }
}

impl<R: CommandRunner> RemoteHost for SshHost<'_, R> {
    fn host(&self) -> &str {
        &self.target.host
    }

    async fn sudo_in(&self, dir: Option<&str>, command: &str) -> Result<String> {
        tracing::debug!(host = %self.target.host, dir, command, "sudo");
        self.ssh_checked(&shell::sudo(dir, command), &shell::in_dir(dir, command))
            .await
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        let test = format!("test -e {}", quote(path));
        let output = self.ssh(&test).await?;
        match output.status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => {
                self.check(&output, &test)?;
                Ok(true)
            }
        }
    }

    async fn put(&self, sources: &[PathBuf], remote_dir: &str) -> Result<()> {
        tracing::debug!(host = %self.target.host, ?sources, remote_dir, "put");
        self.upload(sources, remote_dir)
            .await
            .with_context(|| format!("uploading to {}:{remote_dir}", self.target.host))
    }
}
