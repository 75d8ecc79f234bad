//! CLI argument parsing with clap derive

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use pushdeploy_common::TaskName;

use crate::app::{AppContext, AppFlags, BehaviourFlags, ConfigFlags, OutputFlags};
use crate::commands;

/// Provision a server for a small web app and deploy it by git push
#[derive(Parser)]
#[command(
    name = "pushdeploy",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Answer prompts with their defaults
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    /// Print the steps a task would run without running them
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Config file (default: $PUSHDEPLOY_CONFIG, ./pushdeploy.yaml, ~/.pushdeploy/config.yaml)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Host to run tasks on; repeat for several hosts (replaces `hosts`)
    #[arg(
        long = "host",
        global = true,
        env = "PUSHDEPLOY_HOST",
        value_delimiter = ',',
        value_name = "HOST"
    )]
    pub hosts: Vec<String>,

    /// SSH login user (replaces `user`)
    #[arg(short, long, global = true, env = "PUSHDEPLOY_USER")]
    pub user: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Install required packages
    #[command(name = "install_requirements", visible_alias = "install-requirements")]
    InstallRequirements,

    /// Create project directories and virtualenv, copy app files
    #[command(name = "install_flask", visible_alias = "install-flask")]
    InstallFlask,

    /// Replace the default nginx site with the app's site
    #[command(name = "configure_nginx", visible_alias = "configure-nginx")]
    ConfigureNginx,

    /// Register the app with supervisor
    #[command(name = "configure_supervisor", visible_alias = "configure-supervisor")]
    ConfigureSupervisor,

    /// Set up the bare repository and post-receive hook
    #[command(name = "configure_git", visible_alias = "configure-git")]
    ConfigureGit,

    /// Start the app under supervisor
    #[command(name = "run_app", visible_alias = "run-app")]
    RunApp,

    /// Commit local changes, push to the server, restart the app
    Deploy(commands::task::DeployArgs),

    /// Revert the last commit, push, restart the app
    Rollback,

    /// Show supervisor status
    Status,

    /// Run every provisioning task in order
    Create,

    /// Run several tasks in order
    Run(commands::task::RunArgs),

    /// List tasks
    List,

    /// Write the nginx, supervisor, hook and pushdeploy.yaml files
    Init(commands::init::InitArgs),

    /// Inspect configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            json,
            quiet,
            no_color,
            yes,
            dry_run,
            config,
            hosts,
            user,
            verbose: _,
            command,
        } = self;

        let app = AppContext::new(AppFlags {
            output: OutputFlags {
                no_color,
                quiet,
                json,
            },
            behaviour: BehaviourFlags { yes, dry_run },
            config: ConfigFlags {
                path: config,
                hosts,
                user,
            },
        });

        match command {
            Command::InstallRequirements => run_task(&app, TaskName::InstallRequirements).await,
            Command::InstallFlask => run_task(&app, TaskName::InstallFlask).await,
            Command::ConfigureNginx => run_task(&app, TaskName::ConfigureNginx).await,
            Command::ConfigureSupervisor => run_task(&app, TaskName::ConfigureSupervisor).await,
            Command::ConfigureGit => run_task(&app, TaskName::ConfigureGit).await,
            Command::RunApp => run_task(&app, TaskName::RunApp).await,
            Command::Deploy(args) => {
                commands::task::run(&app, &[TaskName::Deploy], args.message.as_deref()).await
            }
            Command::Rollback => run_task(&app, TaskName::Rollback).await,
            Command::Status => run_task(&app, TaskName::Status).await,
            Command::Create => run_task(&app, TaskName::Create).await,
            Command::Run(args) => {
                commands::task::run(&app, &args.tasks, args.message.as_deref()).await
            }
            Command::List => commands::list::run(&app),
            Command::Init(args) => commands::init::run(&app, &args),
            Command::Config(cmd) => commands::config::run(&app, &cmd),
            Command::Version => commands::version::run(&app),
        }
    }
}

async fn run_task(app: &AppContext, task: TaskName) -> Result<ExitCode> {
    commands::task::run(app, &[task], None).await
}
