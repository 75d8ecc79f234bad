//! Human-readable terminal renderer.

use std::path::Path;

use owo_colors::OwoColorize as _;
use pushdeploy_common::{TaskName, TaskReport};

use crate::domain::DeployConfig;
use crate::domain::template::GeneratedFile;
use crate::output::OutputContext;

/// Renders command results as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the result of a task run.
    ///
    /// Live progress was already shown by the reporter, so a normal run only
    /// prints command output (`status`). A dry run prints the step plan.
    pub fn render_reports(&self, reports: &[TaskReport], dry_run: bool) {
        if dry_run {
            self.render_plan(reports);
            return;
        }
        for report in reports {
            let Some(output) = &report.output else {
                continue;
            };
            if !self.ctx.quiet {
                println!();
                self.ctx.header(&format!("{} ({})", report.task, report.host));
            }
            print!("{output}");
            if !output.ends_with('\n') {
                println!();
            }
        }
    }

    fn render_plan(&self, reports: &[TaskReport]) {
        for report in reports {
            println!();
            self.ctx.header(&format!("{} ({})", report.task, report.host));
            if report.steps.is_empty() {
                self.ctx.info("nothing to do");
            }
            for step in &report.steps {
                println!(
                    "    {} {}",
                    "$".style(self.ctx.styles.dim),
                    step.command.style(self.ctx.styles.command)
                );
            }
        }
        if !self.ctx.quiet {
            println!();
            self.ctx.info("Dry run: nothing was executed.");
        }
    }

    /// Render the task catalogue.
    pub fn render_task_list(&self, tasks: &[TaskName]) {
        for task in tasks {
            println!(
                "  {:<22} {}",
                task.as_str().style(self.ctx.styles.bold),
                task.summary()
            );
        }
    }

    /// Render the effective deployment configuration.
    pub fn render_config(&self, config: &DeployConfig, path: &Path) {
        println!();
        println!(
            "  {}",
            format!("Configuration ({})", path.display()).style(self.ctx.styles.header)
        );
        println!();
        println!("  {:<28} {}", "hosts:", config.hosts.join(", "));
        println!("  {:<28} {}", "user:", config.user);
        if let Some(port) = config.port {
            println!("  {:<28} {port}", "port:");
        }
        if let Some(identity) = &config.identity_file {
            println!("  {:<28} {}", "identity_file:", identity.display());
        }
        println!("  {:<28} {}", "app_name:", config.app_name);
        println!("  {:<28} {}", "local.app_dir:", config.local.app_dir.display());
        println!("  {:<28} {}", "local.config_dir:", config.local.config_dir.display());
        println!("  {:<28} {}", "remote.app_dir:", config.remote.app_dir);
        println!("  {:<28} {}", "remote.git_dir:", config.remote.git_dir);
        println!("  {:<28} {}", "remote.nginx_available_dir:", config.remote.nginx_available_dir);
        println!("  {:<28} {}", "remote.nginx_enabled_dir:", config.remote.nginx_enabled_dir);
        println!("  {:<28} {}", "remote.supervisor_dir:", config.remote.supervisor_dir);
        println!("  {:<28} {}", "packages:", config.packages.join(", "));
        println!("  {:<28} {}", "flask_requirement:", config.flask_requirement);
        println!("  {:<28} {}/{}", "git:", config.git.remote, config.git.branch);
        println!("  {:<28} {}s", "timeout_secs:", config.timeout_secs);
        println!();
        println!("  {}", "Derived paths:".style(self.ctx.styles.bold));
        println!("    {:<26} {}", "app:", config.remote_flask_dir());
        println!("    {:<26} {}", "virtualenv:", config.remote_env_dir());
        println!("    {:<26} {}", "bare repo:", config.bare_repo_dir());
        println!("    {:<26} {}", "nginx site:", config.nginx_site());
        println!("    {:<26} {}", "supervisor program:", config.supervisor_conf());
        println!();
        println!("  {}", "Environment:".style(self.ctx.styles.bold));
        for var in ["PUSHDEPLOY_CONFIG", "PUSHDEPLOY_HOST", "PUSHDEPLOY_USER", "NO_COLOR"] {
            println!(
                "    {:<26} {}",
                format!("{var}:"),
                std::env::var(var).unwrap_or_else(|_| "(not set)".to_string())
            );
        }
    }

    /// Render the resolved config path.
    pub fn render_config_path(&self, path: &Path, exists: bool) {
        println!("{}", path.display());
        if !exists {
            self.ctx.info("File does not exist; defaults are used. Run: pushdeploy init");
        }
    }

    /// Render the files written by `init`.
    pub fn render_init(&self, files: &[GeneratedFile]) {
        for file in files {
            if file.created {
                self.ctx.success(&format!("Created {}", file.path.display()));
            } else {
                self.ctx.warn(&format!("Kept existing {}", file.path.display()));
            }
        }
        if files.iter().any(|f| f.created) {
            self.ctx.info("Edit pushdeploy.yaml, then run: pushdeploy create");
        }
    }

    /// Render the CLI version information.
    pub fn render_version(&self, version: &str) {
        println!("pushdeploy {version}");
    }
}
