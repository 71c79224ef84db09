//! Resolution cache for dynamic tag substitution.
//!
//! Resolved tag occurrences are memoized per `(occurrence, subject, context)`
//! triple. This crate decouples the registry from the storage of those
//! results:
//!
//! - [`CacheKey`]: Derives the hashed key for one occurrence
//! - [`ResultCache`]: Key-value store with etag-based validation
//!
//! # Implementations
//!
//! - [`MemoryCache`]: Unbounded in-process map, safe for concurrent use
//! - [`NullCache`]: No-op implementation (always misses)
//!
//! # Example
//!
//! ```
//! use dyntag_cache::{CacheKey, MemoryCache, ResultCache};
//!
//! let cache = MemoryCache::new();
//! let key = CacheKey::new("{site_name}", 42, "text").compute_hash();
//!
//! cache.set(&key, "1", "Acme");
//! assert_eq!(cache.get(&key, "1").as_deref(), Some("Acme"));
//! assert_eq!(cache.get(&key, "2"), None); // produced by an older revision
//! ```

mod key;
mod memory;

pub use key::CacheKey;
pub use memory::MemoryCache;

/// Store for resolved tag values.
///
/// Each entry is stored together with an etag, an opaque string chosen by
/// the caller (the registry uses the revision of the tag definition that
/// produced the value). A cache hit occurs only when both the key and etag
/// match.
///
/// Entries are never removed: storing under an existing key overwrites the
/// value and etag in place.
pub trait ResultCache: Send + Sync {
    /// Retrieve a cached value.
    ///
    /// Returns `Some(value)` if the key exists **and** was stored with the same
    /// `etag`. Returns `None` on cache miss or etag mismatch.
    ///
    /// If `etag` is an empty string, etag validation is skipped and the cached
    /// value is returned regardless of the stored etag.
    ///
    /// # Arguments
    ///
    /// * `key` - Cache key (see [`CacheKey::compute_hash`])
    /// * `etag` - Expected etag for cache validity (empty string skips validation)
    fn get(&self, key: &str, etag: &str) -> Option<String>;

    /// Store a value in the cache.
    ///
    /// Overwrites any existing entry for the same key, regardless of the
    /// previous etag.
    fn set(&self, key: &str, etag: &str, value: &str);

    /// Number of stored entries.
    fn len(&self) -> usize;

    /// Whether the cache holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// No-op [`ResultCache`] that never stores or retrieves data.
///
/// Every `get` returns `None`; every `set` is silently discarded.
/// Use when memoization is disabled and every occurrence should reach its
/// callback.
#[derive(Debug, Default)]
pub struct NullCache;

impl ResultCache for NullCache {
    fn get(&self, _key: &str, _etag: &str) -> Option<String> {
        None
    }

    fn set(&self, _key: &str, _etag: &str, _value: &str) {}

    fn len(&self) -> usize {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static_assertions::assert_impl_all!(NullCache: Send, Sync);
    static_assertions::assert_impl_all!(MemoryCache: Send, Sync);
    static_assertions::assert_obj_safe!(ResultCache);

    #[test]
    fn test_null_cache_always_misses() {
        let cache = NullCache;

        assert_eq!(cache.get("key", "1"), None);

        // Setting a value and reading it back still returns None
        cache.set("key", "1", "hello");
        assert_eq!(cache.get("key", "1"), None);
        assert_eq!(cache.get("key", ""), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_boxed_cache_dispatch() {
        let caches: Vec<Box<dyn ResultCache>> =
            vec![Box::new(NullCache), Box::new(MemoryCache::new())];

        for cache in &caches {
            cache.set("k", "v", "data");
        }

        assert_eq!(caches[0].get("k", "v"), None);
        assert_eq!(caches[1].get("k", "v").as_deref(), Some("data"));
    }
}
