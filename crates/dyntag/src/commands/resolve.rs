//! `dyntag resolve` command implementation.

use std::io::{self, Write};

use clap::Args;
use dyntag_registry::parse_tag_id;

use super::ConfigArgs;
use crate::error::CliError;
use crate::output::Output;
use crate::tags::build_registry;

/// Arguments for the resolve command.
#[derive(Args)]
pub(crate) struct ResolveArgs {
    /// Tag occurrence to resolve, e.g. `{tag_with_attr:a:b}`.
    tag: String,

    #[command(flatten)]
    config: ConfigArgs,
}

impl ResolveArgs {
    /// Execute the resolve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or output cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let config = self.config.load()?;
        let registry = build_registry(&config);

        if !registry.contains(parse_tag_id(&self.tag)) {
            Output::new().warning(&format!("Unknown tag: {}", self.tag));
        }

        let value = registry.resolve(&self.tag, config.render.subject, &config.render.context);
        writeln!(io::stdout().lock(), "{value}")?;

        Ok(())
    }
}
