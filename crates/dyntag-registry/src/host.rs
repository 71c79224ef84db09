//! Host integration hooks.
//!
//! A host (CMS, page builder, static site generator) calls into the engine at
//! four points: to list tags for a picker, to resolve one tag it matched
//! itself, to render full content, and to render data without an explicit
//! context. [`HostHooks`] exposes those entry points over a borrowed
//! [`TagRegistry`] and normalizes the host's loosely-typed arguments.

use serde_json::Value;

use crate::DEFAULT_CONTEXT;
use crate::registry::TagRegistry;
use crate::tag::TagInfo;

/// Host entry points backed by a registry.
///
/// # Example
///
/// ```
/// use dyntag_registry::{HostHooks, TagOptions, TagRegistry};
/// use serde_json::json;
///
/// let registry = TagRegistry::new();
/// registry.register("{post_id}", TagOptions::default(), |id, _, _| id.to_string());
///
/// let hooks = HostHooks::new(&registry).with_current_subject(10);
///
/// // Explicit entity, numeric string, and fallback to the current subject
/// assert_eq!(hooks.render_content("{post_id}", &json!({"ID": 3}), None), "3");
/// assert_eq!(hooks.render_content("{post_id}", &json!("4"), None), "4");
/// assert_eq!(hooks.render_content("{post_id}", &json!(null), None), "10");
/// ```
#[derive(Debug)]
pub struct HostHooks<'a> {
    registry: &'a TagRegistry,
    current_subject: u64,
    default_context: String,
}

impl<'a> HostHooks<'a> {
    /// Create hooks over `registry`.
    ///
    /// The current subject defaults to `0` and the default context to
    /// [`DEFAULT_CONTEXT`].
    #[must_use]
    pub fn new(registry: &'a TagRegistry) -> Self {
        Self {
            registry,
            current_subject: 0,
            default_context: DEFAULT_CONTEXT.to_owned(),
        }
    }

    /// Set the subject used when the host passes no usable subject.
    #[must_use]
    pub fn with_current_subject(mut self, subject_id: u64) -> Self {
        self.current_subject = subject_id;
        self
    }

    /// Set the context used when the host passes none.
    #[must_use]
    pub fn with_default_context(mut self, context: impl Into<String>) -> Self {
        self.default_context = context.into();
        self
    }

    /// Map a host subject argument to a subject id.
    ///
    /// Accepts an entity object carrying an `ID` (or `id`) field, a
    /// non-negative integer, or a string holding one. Anything else falls
    /// back to the current subject.
    #[must_use]
    pub fn subject_id(&self, subject: &Value) -> u64 {
        let id = match subject {
            Value::Object(entity) => entity
                .get("ID")
                .or_else(|| entity.get("id"))
                .and_then(numeric_id),
            other => numeric_id(other),
        };
        id.unwrap_or(self.current_subject)
    }

    /// Append the registry's tags to the host's tag list.
    #[must_use]
    pub fn dynamic_tags_list(&self, mut existing: Vec<TagInfo>) -> Vec<TagInfo> {
        existing.extend(self.registry.list_tags());
        existing
    }

    /// Resolve a single tag the host matched itself.
    ///
    /// Non-string values pass through unchanged.
    #[must_use]
    pub fn render_tag(&self, tag: Value, subject: &Value, context: Option<&str>) -> Value {
        self.registry
            .resolve_value(tag, self.subject_id(subject), self.context(context))
    }

    /// Substitute every registered tag in `content`.
    #[must_use]
    pub fn render_content(&self, content: &str, subject: &Value, context: Option<&str>) -> String {
        self.registry
            .render(content, self.subject_id(subject), self.context(context))
    }

    /// Substitute every registered tag in `content` using the default context.
    #[must_use]
    pub fn render_data(&self, content: &str, subject: &Value) -> String {
        self.render_content(content, subject, None)
    }

    fn context<'c>(&'c self, context: Option<&'c str>) -> &'c str {
        context.unwrap_or(&self.default_context)
    }
}

fn numeric_id(value: &Value) -> Option<u64> {
    match value {
        Value::Number(number) => number.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
