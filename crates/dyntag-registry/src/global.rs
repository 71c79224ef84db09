//! Process-wide default registry.
//!
//! Library code should take a `&TagRegistry` explicitly. The shared instance
//! exists for integrations where tags are registered from many independent
//! places and the host expects a single registry.

use std::sync::LazyLock;

use crate::registry::TagRegistry;
use crate::tag::TagOptions;

static GLOBAL: LazyLock<TagRegistry> = LazyLock::new(TagRegistry::new);

/// The process-wide registry, created on first access.
#[must_use]
pub fn global() -> &'static TagRegistry {
    &GLOBAL
}

/// Register a tag in the process-wide registry.
///
/// # Example
///
/// ```
/// use dyntag_registry::{TagOptions, global, register_custom_tag};
///
/// register_custom_tag("{year}", TagOptions::new("Year", "Date"), |_, _, _| "2024".to_owned());
/// assert_eq!(global().render("(c) {year}", 1, "text"), "(c) 2024");
/// ```
pub fn register_custom_tag<F>(raw_name: &str, options: TagOptions, callback: F)
where
    F: Fn(u64, &str, &str) -> String + Send + Sync + 'static,
{
    global().register(raw_name, options, callback);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_custom_tag_uses_global() {
        register_custom_tag("{global_test_tag}", TagOptions::default(), |_, _, _| {
            "G".to_owned()
        });

        assert!(global().contains("global_test_tag"));
        assert_eq!(global().render("{global_test_tag}", 1, "text"), "G");
    }

    #[test]
    fn test_global_is_shared() {
        assert!(std::ptr::eq(global(), global()));
    }
}
