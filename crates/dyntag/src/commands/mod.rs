//! CLI command implementations.

mod list;
mod render;
mod resolve;

use std::path::PathBuf;

use clap::Args;
use dyntag_config::{CliSettings, Config};

use crate::error::CliError;

pub(crate) use list::ListArgs;
pub(crate) use render::RenderArgs;
pub(crate) use resolve::ResolveArgs;

/// Configuration arguments shared by all commands.
#[derive(Args)]
pub(crate) struct ConfigArgs {
    /// Path to configuration file (default: auto-discover dyntag.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Subject id passed to tag handlers (overrides config).
    #[arg(short, long)]
    subject: Option<u64>,

    /// Render context passed to tag handlers (overrides config).
    #[arg(long)]
    context: Option<String>,

    /// Disable the resolution cache.
    #[arg(long)]
    no_cache: bool,

    /// Do not register the built-in example tags.
    #[arg(long)]
    no_examples: bool,
}

impl ConfigArgs {
    /// Load configuration with these arguments applied as overrides.
    pub(crate) fn load(&self) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            subject: self.subject,
            context: self.context.clone(),
            cache_enabled: self.no_cache.then_some(false),
            example_tags: self.no_examples.then_some(false),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        if let Some(path) = &config.config_path {
            tracing::info!(path = %path.display(), "loaded configuration");
        }

        Ok(config)
    }
}
