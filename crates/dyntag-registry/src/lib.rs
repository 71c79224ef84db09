//! Dynamic tag registry and text substitution engine.
//!
//! Dynamic tags are placeholder tokens such as `{site_name}` or
//! `{date:Y-m-d}` that get replaced with computed strings when content is
//! rendered.
//!
//! # Architecture
//!
//! - [`TagRegistry`]: Owns tag definitions, the compiled match pattern and the
//!   resolution cache; performs substitution via
//!   [`resolve`](TagRegistry::resolve) and [`render`](TagRegistry::render)
//! - [`TagSet`]: Declares a group of tags as data plus a handler table,
//!   registered in one call with [`TagRegistry::register_set`]
//! - [`HostHooks`]: Entry points for a host that lists, resolves and renders
//!   tags with loosely-typed arguments
//! - [`global`]: Optional process-wide registry for integrations that need one
//!
//! # Tag Syntax
//!
//! ```text
//! {name}                  bare tag
//! {name:attr1:attr2}      tag with positional attributes
//! ```
//!
//! The tag id is the name with braces stripped, up to the first `:`.
//! Attributes are raw strings; the engine does not sanitize or escape them,
//! so handlers producing markup must escape attribute text themselves.
//!
//! # Failure Policy
//!
//! Substitution never fails. Unknown tags are left as literal text, tags
//! without a handler resolve to an empty string, and missing attributes read
//! as empty strings.
//!
//! # Example
//!
//! ```
//! use dyntag_registry::{ExampleTags, TagRegistry};
//!
//! let registry = TagRegistry::new();
//! registry.register_set(&ExampleTags);
//!
//! let output = registry.render("{tag} / {tag_with_attr:x} / {nope}", 1, "text");
//! assert_eq!(output, "Processed Tag Value / Attribute1: x, Attribute2:  / {nope}");
//! ```

mod example;
mod global;
mod host;
mod pattern;
mod registry;
mod tag;
mod tag_set;

pub use example::ExampleTags;
pub use global::{global, register_custom_tag};
pub use host::HostHooks;
pub use registry::TagRegistry;
pub use tag::{
    ATTRIBUTE_SEPARATOR, TagCallback, TagDefinition, TagInfo, TagOccurrence, TagOptions,
    empty_callback, parse_tag_id,
};
pub use tag_set::{Handlers, TagDeclaration, TagSet};

/// Context used when the caller does not specify one.
pub const DEFAULT_CONTEXT: &str = "text";
