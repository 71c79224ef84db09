//! Registry construction from configuration.
//!
//! Tags declared in `dyntag.toml` resolve to a template where `{0}`, `{1}`,
//! ... stand for the occurrence's positional attributes and `{subject}` /
//! `{context}` for the render arguments.

use std::sync::LazyLock;

use dyntag_cache::{MemoryCache, NullCache, ResultCache};
use dyntag_config::{Config, TagConfig};
use dyntag_registry::{ExampleTags, Handlers, TagDeclaration, TagOccurrence, TagRegistry, TagSet};
use regex::{Captures, Regex};

static PLACEHOLDER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(\d+|subject|context)\}").expect("invalid placeholder regex"));

/// Tags declared in the config file.
pub(crate) struct ConfigTags {
    tags: Vec<TagConfig>,
}

impl ConfigTags {
    pub(crate) fn new(tags: Vec<TagConfig>) -> Self {
        Self { tags }
    }
}

impl TagSet for ConfigTags {
    fn tags(&self) -> Vec<TagDeclaration> {
        self.tags
            .iter()
            .map(|tag| TagDeclaration::new(tag.name.clone(), tag.label.clone(), tag.group.clone()))
            .collect()
    }

    fn handlers(&self) -> Handlers {
        self.tags.iter().fold(Handlers::new(), |handlers, tag| {
            let template = tag.value.clone();
            handlers.with(tag.id(), move |subject_id, occurrence, context| {
                expand_template(&template, occurrence, subject_id, context)
            })
        })
    }
}

/// Fill a value template for one occurrence.
///
/// Unknown placeholders are left as written. The expanded text is not
/// scanned again.
fn expand_template(template: &str, occurrence: &str, subject_id: u64, context: &str) -> String {
    let occurrence = TagOccurrence::new(occurrence);
    PLACEHOLDER_PATTERN
        .replace_all(template, |caps: &Captures<'_>| match &caps[1] {
            "subject" => subject_id.to_string(),
            "context" => context.to_owned(),
            index => index
                .parse::<usize>()
                .map_or_else(|_| caps[0].to_owned(), |i| occurrence.attr(i).to_owned()),
        })
        .into_owned()
}

/// Build a registry holding the example tags (if enabled) and the config tags.
///
/// Config tags are registered last, so they replace example tags with the
/// same id.
pub(crate) fn build_registry(config: &Config) -> TagRegistry {
    let cache: Box<dyn ResultCache> = if config.cache.enabled {
        Box::new(MemoryCache::new())
    } else {
        Box::new(NullCache)
    };
    let registry = TagRegistry::with_cache(cache);

    if config.render.example_tags {
        let count = registry.register_set(&ExampleTags);
        tracing::info!(count, "registered example tags");
    }

    let count = registry.register_set(&ConfigTags::new(config.tags.clone()));
    tracing::info!(count, "registered config tags");

    registry
}
