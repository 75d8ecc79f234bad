//! Application service — server provisioning tasks.
//!
//! Each task is a fixed sequence of remote commands. Steps that create
//! something are guarded by an existence check so re-running a task is safe;
//! the first failing command aborts the task.

use anyhow::{Context, Result};

use crate::application::ports::{LocalFs, ProgressReporter, RemoteHost};
use crate::domain::DeployConfig;
use crate::domain::config::VIRTUALENV_NAME;
use crate::domain::error::TaskError;
use crate::domain::shell::quote;

/// Install required packages.
///
/// # Errors
///
/// Returns an error if `apt-get` fails for any package.
pub async fn install_requirements(
    cfg: &DeployConfig,
    host: &impl RemoteHost,
    reporter: &impl ProgressReporter,
) -> Result<()> {
    reporter.step("Updating package index");
    host.sudo("apt-get update").await?;
    for package in &cfg.packages {
        reporter.step(&format!("Installing {package}"));
        host.sudo(&format!("apt-get install -y {}", quote(package)))
            .await
            .with_context(|| format!("installing {package}"))?;
    }
    reporter.success("Packages installed");
    Ok(())
}

/// Create the project directories and virtualenv, then copy the app files.
///
/// # Errors
///
/// Returns an error if the local app directory is missing or empty, or if
/// any remote command fails.
pub async fn install_flask(
    cfg: &DeployConfig,
    host: &impl RemoteHost,
    fs: &impl LocalFs,
    reporter: &impl ProgressReporter,
) -> Result<()> {
    let app_dir = cfg.remote.app_dir.as_str();
    let flask_dir = cfg.remote_flask_dir();

    let sources = fs.glob_entries(&cfg.local.app_dir)?;
    if sources.is_empty() {
        return Err(TaskError::EmptyLocalDir(cfg.local.app_dir.clone()).into());
    }

    reporter.step("Creating project directories");
    ensure_dir(host, app_dir).await?;
    ensure_dir(host, &flask_dir).await?;

    reporter.step("Creating virtualenv");
    host.sudo_in(Some(app_dir), &format!("virtualenv {VIRTUALENV_NAME}"))
        .await?;
    host.sudo_in(Some(app_dir), &format!("source {VIRTUALENV_NAME}/bin/activate"))
        .await?;

    reporter.step(&format!("Installing {}", cfg.flask_requirement));
    host.sudo_in(
        Some(app_dir),
        &format!("pip install {}", quote(&cfg.flask_requirement)),
    )
    .await?;

    reporter.step(&format!("Copying app files to {flask_dir}"));
    host.put(&sources, &flask_dir)
        .await
        .context("copying app files")?;

    reporter.success("App installed");
    Ok(())
}

async fn ensure_dir(host: &impl RemoteHost, dir: &str) -> Result<()> {
    if !host.exists(dir).await? {
        host.sudo(&format!("mkdir {}", quote(dir))).await?;
    }
    Ok(())
}

/// Replace the default nginx site with the app's site and restart nginx.
///
/// # Errors
///
/// Returns an error if any remote command or the upload fails.
pub async fn configure_nginx(
    cfg: &DeployConfig,
    host: &impl RemoteHost,
    reporter: &impl ProgressReporter,
) -> Result<()> {
    reporter.step("Starting nginx");
    host.sudo("/etc/init.d/nginx start").await?;

    let default_site = cfg.nginx_default_site();
    if host.exists(&default_site).await? {
        reporter.step("Removing default site");
        host.sudo(&format!("rm {}", quote(&default_site))).await?;
    }

    let site = cfg.nginx_site();
    if !host.exists(&site).await? {
        let available = cfg.nginx_available_site();
        reporter.step("Linking site");
        host.sudo(&format!("touch {}", quote(&available))).await?;
        host.sudo(&format!("ln -s {} {}", quote(&available), quote(&site)))
            .await?;
    }

    reporter.step("Uploading nginx config");
    host.put(&[cfg.local_nginx_site()], &cfg.remote.nginx_enabled_dir)
        .await
        .context("uploading nginx config")?;

    reporter.step("Restarting nginx");
    host.sudo("/etc/init.d/nginx restart").await?;
    reporter.success("nginx configured");
    Ok(())
}

/// Register the app with supervisor, once.
///
/// # Errors
///
/// Returns an error if the upload or `supervisorctl` fails.
pub async fn configure_supervisor(
    cfg: &DeployConfig,
    host: &impl RemoteHost,
    reporter: &impl ProgressReporter,
) -> Result<()> {
    if host.exists(&cfg.supervisor_conf()).await? {
        reporter.warn(&format!(
            "{} already exists, supervisor left unchanged",
            cfg.supervisor_conf()
        ));
        return Ok(());
    }

    reporter.step("Uploading supervisor config");
    host.put(&[cfg.local_supervisor_conf()], &cfg.remote.supervisor_dir)
        .await
        .context("uploading supervisor config")?;

    let dir = Some(cfg.remote.supervisor_dir.as_str());
    reporter.step("Registering program");
    host.sudo_in(dir, "supervisorctl reread").await?;
    host.sudo_in(dir, "supervisorctl update").await?;
    reporter.success("supervisor configured");
    Ok(())
}

/// Create the bare repository and install the post-receive hook, once.
///
/// # Errors
///
/// Returns an error if any remote command or the upload fails.
pub async fn configure_git(
    cfg: &DeployConfig,
    host: &impl RemoteHost,
    reporter: &impl ProgressReporter,
) -> Result<()> {
    let git_dir = cfg.remote.git_dir.as_str();
    if host.exists(git_dir).await? {
        reporter.warn(&format!("{git_dir} already exists, git left unchanged"));
        return Ok(());
    }

    let repo = cfg.bare_repo_dir();
    let hooks = format!("{repo}/hooks");

    reporter.step("Creating bare repository");
    host.sudo(&format!("mkdir {}", quote(git_dir))).await?;
    host.sudo_in(Some(git_dir), &format!("mkdir {}.git", quote(&cfg.app_name)))
        .await?;
    host.sudo_in(Some(&repo), "git init --bare").await?;

    reporter.step("Installing post-receive hook");
    host.put(&[cfg.local_post_receive()], &hooks)
        .await
        .context("uploading post-receive hook")?;
    host.sudo_in(Some(&hooks), "chmod +x post-receive").await?;

    reporter.success(&format!(
        "Bare repository ready at {}@{}:{repo}",
        cfg.user,
        host.host()
    ));
    Ok(())
}

/// Run every provisioning task in order, stopping at the first failure.
///
/// # Errors
///
/// Returns the error of the first task that fails.
pub async fn create(
    cfg: &DeployConfig,
    host: &impl RemoteHost,
    fs: &impl LocalFs,
    reporter: &impl ProgressReporter,
) -> Result<()> {
    install_requirements(cfg, host, reporter)
        .await
        .context("install_requirements")?;
    install_flask(cfg, host, fs, reporter)
        .await
        .context("install_flask")?;
    configure_nginx(cfg, host, reporter)
        .await
        .context("configure_nginx")?;
    configure_supervisor(cfg, host, reporter)
        .await
        .context("configure_supervisor")?;
    configure_git(cfg, host, reporter)
        .await
        .context("configure_git")?;
    Ok(())
}
