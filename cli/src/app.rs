//! Application context — unified state passed to every command handler.
//!
//! `AppContext` is built once from the global flags. It owns the output
//! context, the config store and the interaction mode, and answers the
//! questions `deploy` and `rollback` ask.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::{ConfigStore, Prompter};
use crate::domain::DeployConfig;
use crate::infra::config::YamlConfigStore;
use crate::output::{HumanRenderer, JsonRenderer, OutputContext, Renderer};

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Behaviour flags.
pub struct BehaviourFlags {
    /// Skip interactive prompts (also set by `CI` / `PUSHDEPLOY_YES` env vars).
    pub yes: bool,
    /// Record steps instead of running them.
    pub dry_run: bool,
}

/// Where the deployment config comes from and what overrides it.
#[derive(Default)]
pub struct ConfigFlags {
    /// `--config` path.
    pub path: Option<PathBuf>,
    /// `--host` values; replace the configured hosts when non-empty.
    pub hosts: Vec<String>,
    /// `--user` value.
    pub user: Option<String>,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Behaviour options.
    pub behaviour: BehaviourFlags,
    /// Config file and overrides.
    pub config: ConfigFlags,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Loads `pushdeploy.yaml`.
    pub config_store: YamlConfigStore,
    /// When `true`, skip interactive prompts and use defaults.
    ///
    /// Set when `--yes` / `-y` is passed, or when the `CI` or `PUSHDEPLOY_YES`
    /// environment variables are present.
    pub non_interactive: bool,
    /// When `true`, tasks only record the steps they would run.
    pub dry_run: bool,
    overrides: ConfigFlags,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    #[must_use]
    pub fn new(flags: AppFlags) -> Self {
        let ci_env = std::env::var("CI").is_ok() || std::env::var("PUSHDEPLOY_YES").is_ok();
        let non_interactive = flags.behaviour.yes || ci_env;

        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        // Progress lines would corrupt the JSON document on stdout.
        let quiet = flags.output.quiet || flags.output.json;

        Self {
            output: OutputContext::new(flags.output.no_color, quiet),
            mode,
            config_store: YamlConfigStore::new(flags.config.path.clone()),
            non_interactive,
            dry_run: flags.behaviour.dry_run,
            overrides: flags.config,
        }
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Returns the appropriate `Renderer` variant for the current output mode.
    #[must_use]
    pub fn renderer(&self) -> Renderer<'_> {
        match self.mode {
            OutputMode::Human => Renderer::Human(HumanRenderer::new(&self.output)),
            OutputMode::Json => Renderer::Json(JsonRenderer),
        }
    }

    /// Load the config file and apply `--host` / `--user`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_config(&self) -> Result<DeployConfig> {
        let mut config = self.config_store.load()?;
        config.apply_overrides(&self.overrides.hosts, self.overrides.user.as_deref());
        Ok(config)
    }

    /// Ask the user for confirmation.
    ///
    /// When `non_interactive` is `true` (CI, `--yes` flag, or `PUSHDEPLOY_YES` env),
    /// returns `default` immediately without prompting.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY available).
    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.non_interactive {
            return Ok(default);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(confirmed)
    }
}

impl Prompter for AppContext {
    fn input(&self, prompt: &str, default: Option<&str>) -> Result<String> {
        if self.non_interactive {
            return default
                .map(String::from)
                .ok_or_else(|| anyhow::anyhow!("{prompt} (no default in non-interactive mode)"));
        }
        let mut input = dialoguer::Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true);
        if let Some(default) = default {
            input = input.default(default.to_string());
        }
        input.interact_text().context("reading answer from terminal")
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        AppContext::confirm(self, prompt, default)
    }
}
