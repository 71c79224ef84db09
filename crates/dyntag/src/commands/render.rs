//! `dyntag render` command implementation.

use std::io::{self, Read, Write};
use std::path::PathBuf;

use clap::Args;

use super::ConfigArgs;
use crate::error::CliError;
use crate::output::Output;
use crate::tags::build_registry;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// File to render (default: read stdin).
    file: Option<PathBuf>,

    /// Write rendered content to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    config: ConfigArgs,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or content cannot be read or written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let config = self.config.load()?;
        let registry = build_registry(&config);

        if registry.is_empty() {
            Output::new().warning("No tags registered, content is passed through unchanged");
        }

        let content = match &self.file {
            Some(path) => std::fs::read_to_string(path)?,
            None => {
                let mut buf = String::new();
                io::stdin().lock().read_to_string(&mut buf)?;
                buf
            }
        };

        let rendered = registry.render(&content, config.render.subject, &config.render.context);
        tracing::info!(
            subject = config.render.subject,
            context = %config.render.context,
            cached = registry.cached_len(),
            "rendered content"
        );

        match &self.output {
            Some(path) => std::fs::write(path, rendered)?,
            None => io::stdout().lock().write_all(rendered.as_bytes())?,
        }

        Ok(())
    }
}
