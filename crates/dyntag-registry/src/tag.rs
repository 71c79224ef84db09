//! Tag definitions, metadata and occurrence parsing.
//!
//! A tag is written as `{name}` or `{name:attr1:attr2:...}`. The tag id is the
//! name with the braces stripped and everything from the first `:` removed.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Separator between the tag name and its positional attributes.
pub const ATTRIBUTE_SEPARATOR: char = ':';

/// Handler invoked to resolve a tag occurrence.
///
/// Receives `(subject_id, occurrence_text, context)` and returns the
/// replacement text. Handlers must be fast and synchronous; the engine applies
/// no timeout or retry around them.
pub type TagCallback = Arc<dyn Fn(u64, &str, &str) -> String + Send + Sync>;

/// Handler that always resolves to an empty string.
///
/// Used for declared tags that have no handler of their own.
///
/// # Example
///
/// ```
/// use dyntag_registry::{TagOptions, TagRegistry, empty_callback};
///
/// let registry = TagRegistry::new();
/// registry.register("{placeholder}", TagOptions::default(), empty_callback);
/// assert_eq!(registry.render("[{placeholder}]", 1, "text"), "[]");
/// ```
pub fn empty_callback(_subject_id: u64, _occurrence: &str, _context: &str) -> String {
    String::new()
}

/// Derive the tag id from a declared tag name or an occurrence.
///
/// Strips every leading and trailing brace, then keeps the segment before the
/// first attribute separator.
///
/// # Example
///
/// ```
/// use dyntag_registry::parse_tag_id;
///
/// assert_eq!(parse_tag_id("{tag}"), "tag");
/// assert_eq!(parse_tag_id("{tag_with_attr:a:b}"), "tag_with_attr");
/// assert_eq!(parse_tag_id("plain"), "plain");
/// ```
#[must_use]
pub fn parse_tag_id(tag: &str) -> &str {
    let trimmed = strip_braces(tag);
    trimmed
        .split_once(ATTRIBUTE_SEPARATOR)
        .map_or(trimmed, |(id, _)| id)
}

fn strip_braces(tag: &str) -> &str {
    tag.trim_matches(|c| c == '{' || c == '}')
}

/// Display options supplied when registering a tag.
///
/// Neither field affects substitution; both are surfaced through
/// [`TagInfo`] for tag pickers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagOptions {
    /// Human readable label.
    pub label: String,
    /// Group the tag is listed under.
    pub group: String,
}

impl TagOptions {
    /// Create options with a label and group.
    #[must_use]
    pub fn new(label: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            group: group.into(),
        }
    }

    /// Build options from a loosely-typed host value.
    ///
    /// Unknown keys are ignored. Missing keys, non-string values and
    /// non-object input all fall back to empty strings.
    ///
    /// # Example
    ///
    /// ```
    /// use dyntag_registry::TagOptions;
    /// use serde_json::json;
    ///
    /// let options = TagOptions::from_value(&json!({"label": "Title", "priority": 5}));
    /// assert_eq!(options.label, "Title");
    /// assert_eq!(options.group, "");
    /// ```
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let field = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned()
        };
        Self {
            label: field("label"),
            group: field("group"),
        }
    }
}

/// Listing entry for a registered tag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagInfo {
    /// Tag name as it was declared (e.g., `{site_name}`).
    pub name: String,
    /// Human readable label.
    pub label: String,
    /// Group the tag is listed under.
    pub group: String,
}

/// A registered tag.
#[derive(Clone)]
pub struct TagDefinition {
    /// Canonical id (see [`parse_tag_id`]).
    pub id: String,
    /// Name as declared, braces included if they were given.
    pub raw_name: String,
    /// Display options.
    pub options: TagOptions,
    /// Handler producing the replacement text.
    pub callback: TagCallback,
    /// Registration counter value when this definition was stored.
    ///
    /// Cached results are only reused while the revision they were computed
    /// with is still the current one.
    pub revision: u64,
}

impl TagDefinition {
    /// Listing entry for this definition.
    #[must_use]
    pub fn info(&self) -> TagInfo {
        TagInfo {
            name: self.raw_name.clone(),
            label: self.options.label.clone(),
            group: self.options.group.clone(),
        }
    }
}

impl fmt::Debug for TagDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagDefinition")
            .field("id", &self.id)
            .field("raw_name", &self.raw_name)
            .field("options", &self.options)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

/// View over one matched tag occurrence.
///
/// Attributes are positional and always strings. Asking for a position that
/// was not written yields an empty string.
///
/// # Example
///
/// ```
/// use dyntag_registry::TagOccurrence;
///
/// let occurrence = TagOccurrence::new("{attr:foo}");
/// assert_eq!(occurrence.id(), "attr");
/// assert_eq!(occurrence.attr(0), "foo");
/// assert_eq!(occurrence.attr(1), "");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TagOccurrence<'a> {
    text: &'a str,
}

impl<'a> TagOccurrence<'a> {
    /// Wrap the full occurrence text, braces included.
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    /// Full occurrence text.
    #[must_use]
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Tag id of this occurrence.
    #[must_use]
    pub fn id(&self) -> &'a str {
        parse_tag_id(self.text)
    }

    /// Positional attributes in written order.
    ///
    /// `{tag}` has none; `{tag:}` has a single empty attribute.
    #[must_use]
    pub fn attributes(&self) -> Vec<&'a str> {
        strip_braces(self.text)
            .split(ATTRIBUTE_SEPARATOR)
            .skip(1)
            .collect()
    }

    /// Attribute at `index`, or `""` if absent.
    #[must_use]
    pub fn attr(&self, index: usize) -> &'a str {
        strip_braces(self.text)
            .split(ATTRIBUTE_SEPARATOR)
            .nth(index + 1)
            .unwrap_or_default()
    }
}
