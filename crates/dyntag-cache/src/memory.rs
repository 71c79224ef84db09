//! In-process cache implementation.
//!
//! [`MemoryCache`] keeps every resolved value for the lifetime of the cache.
//! There is no eviction and no TTL: the number of distinct
//! `(occurrence, subject, context)` triples is expected to stay small
//! relative to the process lifetime.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::ResultCache;

/// A cached value together with the etag it was stored under.
#[derive(Debug)]
struct Entry {
    etag: String,
    value: String,
}

/// Unbounded in-memory [`ResultCache`].
///
/// # Thread Safety
///
/// Entries live behind a `RwLock`, so lookups from concurrent renders only
/// take a shared lock. Two renders missing on the same key may both compute
/// and store the value; the later write wins and the map stays consistent.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResultCache for MemoryCache {
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    fn get(&self, key: &str, etag: &str) -> Option<String> {
        let entries = self.entries.read().unwrap();
        let entry = entries.get(key)?;

        // Validate etag (skip if caller passes empty etag)
        if !etag.is_empty() && entry.etag != etag {
            tracing::trace!(key, stored = %entry.etag, etag, "cache entry is stale");
            return None;
        }

        Some(entry.value.clone())
    }

    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    fn set(&self, key: &str, etag: &str, value: &str) {
        let mut entries = self.entries.write().unwrap();
        entries.insert(
            key.to_owned(),
            Entry {
                etag: etag.to_owned(),
                value: value.to_owned(),
            },
        );
    }

    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn test_memory_cache_set_and_get() {
        let cache = MemoryCache::new();
        cache.set("key", "1", "value");
        assert_eq!(cache.get("key", "1").as_deref(), Some("value"));
    }

    #[test]
    fn test_memory_cache_etag_mismatch() {
        let cache = MemoryCache::new();
        cache.set("key", "1", "value");

        assert_eq!(cache.get("key", "2"), None);
    }

    #[test]
    fn test_memory_cache_empty_etag_skips_validation() {
        let cache = MemoryCache::new();
        cache.set("key", "1", "value");

        assert_eq!(cache.get("key", "").as_deref(), Some("value"));
    }

    #[test]
    fn test_memory_cache_get_nonexistent_key() {
        let cache = MemoryCache::new();
        assert_eq!(cache.get("missing", "1"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_memory_cache_overwrite_keeps_single_entry() {
        let cache = MemoryCache::new();
        cache.set("key", "1", "old");
        cache.set("key", "2", "new");

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("key", "1"), None);
        assert_eq!(cache.get("key", "2").as_deref(), Some("new"));
    }

    #[test]
    fn test_memory_cache_empty_value_is_a_hit() {
        let cache = MemoryCache::new();
        cache.set("key", "1", "");

        assert_eq!(cache.get("key", "1").as_deref(), Some(""));
    }

    #[test]
    fn test_memory_cache_concurrent_inserts() {
        let cache = Arc::new(MemoryCache::new());

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for i in 0..100 {
                        // Half the keys are shared between all threads
                        let key = if i % 2 == 0 {
                            format!("shared-{i}")
                        } else {
                            format!("thread-{t}-{i}")
                        };
                        cache.set(&key, "1", &format!("v{i}"));
                        assert_eq!(cache.get(&key, "1"), Some(format!("v{i}")));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        // 50 shared keys + 50 per-thread keys for each of the 8 threads
        assert_eq!(cache.len(), 50 + 8 * 50);
    }
}
