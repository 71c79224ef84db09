//! Declarative tag sets.
//!
//! A [`TagSet`] describes a group of tags as data (name, label, group) plus a
//! table of handlers keyed by tag id. [`TagRegistry::register_set`] turns the
//! declarations into registrations, so a set of tags needs no hand-written
//! `register` calls.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::registry::TagRegistry;
use crate::tag::{TagCallback, TagOptions, empty_callback, parse_tag_id};

/// One declared tag: `{name, label, group}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagDeclaration {
    /// Tag name as written, e.g. `{site_name}`.
    pub name: String,
    /// Human readable label.
    #[serde(default)]
    pub label: String,
    /// Group the tag is listed under.
    #[serde(default)]
    pub group: String,
}

impl TagDeclaration {
    /// Create a declaration.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        group: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            group: group.into(),
        }
    }

    /// Id this declaration registers under.
    #[must_use]
    pub fn id(&self) -> &str {
        parse_tag_id(&self.name)
    }
}

/// Handler table mapping tag id to callback.
#[derive(Clone, Default)]
pub struct Handlers {
    map: HashMap<String, TagCallback>,
}

impl Handlers {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a handler for the tag with the given id (braces are stripped).
    #[must_use]
    pub fn with<F>(mut self, id: &str, handler: F) -> Self
    where
        F: Fn(u64, &str, &str) -> String + Send + Sync + 'static,
    {
        self.insert(id, Arc::new(handler));
        self
    }

    /// Add an already shared handler.
    pub fn insert(&mut self, id: &str, handler: TagCallback) {
        self.map.insert(parse_tag_id(id).to_owned(), handler);
    }

    /// Handler registered for `id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&TagCallback> {
        self.map.get(id)
    }

    /// Number of handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// A group of tags declared as data.
///
/// # Example
///
/// ```
/// use dyntag_registry::{Handlers, TagDeclaration, TagRegistry, TagSet};
///
/// struct SiteTags {
///     name: String,
/// }
///
/// impl TagSet for SiteTags {
///     fn tags(&self) -> Vec<TagDeclaration> {
///         vec![
///             TagDeclaration::new("{site_name}", "Site name", "Site"),
///             TagDeclaration::new("{site_logo}", "Site logo", "Site"),
///         ]
///     }
///
///     fn handlers(&self) -> Handlers {
///         let name = self.name.clone();
///         Handlers::new().with("site_name", move |_, _, _| name.clone())
///     }
/// }
///
/// let registry = TagRegistry::new();
/// registry.register_set(&SiteTags { name: "Acme".into() });
///
/// // {site_logo} has no handler and resolves to an empty string
/// assert_eq!(registry.render("{site_name}{site_logo}", 1, "text"), "Acme");
/// ```
pub trait TagSet {
    /// Tags in this set.
    fn tags(&self) -> Vec<TagDeclaration>;

    /// Handlers for the declared tags, keyed by tag id.
    ///
    /// Declared tags without a handler resolve to an empty string.
    fn handlers(&self) -> Handlers;
}

impl TagRegistry {
    /// Register every tag declared by `set`.
    ///
    /// Each declaration is matched to the handler stored under its id; tags
    /// with no handler get [`empty_callback`]. Returns the number of tags
    /// registered.
    pub fn register_set<S: TagSet + ?Sized>(&self, set: &S) -> usize {
        let handlers = set.handlers();
        let tags = set.tags();

        for tag in &tags {
            let callback = handlers.get(tag.id()).map_or_else(
                || {
                    tracing::trace!(name = %tag.name, "no handler declared, using empty callback");
                    Arc::new(empty_callback) as TagCallback
                },
                Arc::clone,
            );
            self.register_callback(
                &tag.name,
                TagOptions::new(tag.label.clone(), tag.group.clone()),
                callback,
            );
        }

        tags.len()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::tag::TagInfo;

    struct FixedTags;

    impl TagSet for FixedTags {
        fn tags(&self) -> Vec<TagDeclaration> {
            vec![
                TagDeclaration::new("{alpha}", "Alpha", "Fixed"),
                TagDeclaration::new("{beta}", "Beta", "Fixed"),
            ]
        }

        fn handlers(&self) -> Handlers {
            Handlers::new().with("alpha", |id, _, ctx| format!("alpha:{id}:{ctx}"))
        }
    }

    #[test]
    fn test_register_set() {
        let registry = TagRegistry::new();
        let count = registry.register_set(&FixedTags);

        assert_eq!(count, 2);
        assert_eq!(
            registry.list_tags(),
            vec![
                TagInfo {
                    name: "{alpha}".to_owned(),
                    label: "Alpha".to_owned(),
                    group: "Fixed".to_owned(),
                },
                TagInfo {
                    name: "{beta}".to_owned(),
                    label: "Beta".to_owned(),
                    group: "Fixed".to_owned(),
                },
            ]
        );
    }

    #[test]
    fn test_missing_handler_resolves_empty() {
        let registry = TagRegistry::new();
        registry.register_set(&FixedTags);

        assert_eq!(registry.render("[{alpha}][{beta}]", 3, "html"), "[alpha:3:html][]");
    }

    #[test]
    fn test_handlers_keyed_with_braces() {
        let handlers = Handlers::new().with("{alpha}", |_, _, _| String::new());
        assert!(handlers.get("alpha").is_some());
        assert_eq!(handlers.len(), 1);
    }

    #[test]
    fn test_register_set_as_trait_object() {
        let sets: Vec<Box<dyn TagSet>> = vec![Box::new(FixedTags)];
        let registry = TagRegistry::new();

        for set in &sets {
            registry.register_set(set.as_ref());
        }

        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_declaration_id() {
        assert_eq!(TagDeclaration::new("{a:b}", "", "").id(), "a");
    }

    #[test]
    fn test_declaration_deserialize_defaults() {
        let declaration: TagDeclaration = serde_json::from_str(r#"{"name":"{x}"}"#).unwrap();
        assert_eq!(declaration, TagDeclaration::new("{x}", "", ""));
    }
}
