//! `dyntag list` command implementation.

use std::collections::BTreeMap;
use std::io::{self, Write};

use clap::Args;
use dyntag_registry::TagInfo;

use super::ConfigArgs;
use crate::error::CliError;
use crate::output::Output;
use crate::tags::build_registry;

/// Arguments for the list command.
#[derive(Args)]
pub(crate) struct ListArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Print tags as JSON to stdout.
    #[arg(long)]
    json: bool,
}

impl ListArgs {
    /// Execute the list command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or output cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let config = self.config.load()?;
        let registry = build_registry(&config);
        let tags = registry.list_tags();

        if self.json {
            let mut stdout = io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, &tags)?;
            writeln!(stdout)?;
            return Ok(());
        }

        let output = Output::new();
        if tags.is_empty() {
            output.warning("No tags registered");
            return Ok(());
        }

        for (group, tags) in group_tags(&tags) {
            output.highlight(if group.is_empty() { "(ungrouped)" } else { group });
            for tag in tags {
                output.info(&format!("  {:<28} {}", tag.name, tag.label));
            }
        }
        output.muted(&format!("{} tag(s)", tags.len()));

        Ok(())
    }
}

/// Group tags by their group name, groups in alphabetical order.
fn group_tags(tags: &[TagInfo]) -> BTreeMap<&str, Vec<&TagInfo>> {
    let mut groups: BTreeMap<&str, Vec<&TagInfo>> = BTreeMap::new();
    for tag in tags {
        groups.entry(tag.group.as_str()).or_default().push(tag);
    }
    groups
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn info(name: &str, group: &str) -> TagInfo {
        TagInfo {
            name: name.to_owned(),
            label: String::new(),
            group: group.to_owned(),
        }
    }

    #[test]
    fn test_group_tags() {
        let tags = vec![info("{b}", "Site"), info("{a}", "Example"), info("{c}", "Site")];
        let groups = group_tags(&tags);

        let keys: Vec<_> = groups.keys().copied().collect();
        assert_eq!(keys, vec!["Example", "Site"]);
        assert_eq!(groups["Site"].len(), 2);
        assert_eq!(groups["Site"][0].name, "{b}");
    }
}
