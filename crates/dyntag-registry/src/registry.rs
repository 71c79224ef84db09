//! Tag registry and substitution engine.
//!
//! [`TagRegistry`] owns the tag definitions, the compiled match pattern and
//! the resolution cache. Substitution ([`resolve`](TagRegistry::resolve),
//! [`render`](TagRegistry::render)) runs against the registry and keeps no
//! state of its own.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, RwLock};

use dyntag_cache::{CacheKey, MemoryCache, ResultCache};
use regex::{Captures, Regex};
use serde_json::Value;

use crate::pattern::compile_pattern;
use crate::tag::{TagCallback, TagDefinition, TagInfo, TagOptions, parse_tag_id};

/// Registry state guarded by a single lock.
#[derive(Default)]
struct RegistryState {
    tags: HashMap<String, TagDefinition>,
    /// Compiled lazily on first use; replaced with an empty cell on every
    /// registration.
    pattern: OnceLock<Option<Arc<Regex>>>,
    /// Revision handed to the next registered definition.
    next_revision: u64,
}

/// Registry of dynamic tags and the engine that substitutes them.
///
/// # Thread Safety
///
/// `TagRegistry` is `Send + Sync` and may be shared across concurrent renders:
/// - Definitions and the compiled pattern live behind one `RwLock`; renders
///   only take it for reading, and only long enough to clone what they need
/// - Callbacks run with no registry lock held, so a callback may itself call
///   back into the registry
/// - The cache tolerates concurrent misses on the same key (the value may be
///   computed twice, the map is never corrupted)
///
/// # Example
///
/// ```
/// use dyntag_registry::{TagOccurrence, TagOptions, TagRegistry};
///
/// let registry = TagRegistry::new();
/// registry.register("{greeting}", TagOptions::new("Greeting", "Demo"), |id, tag, _ctx| {
///     let name = TagOccurrence::new(tag).attr(0);
///     format!("Hello {name} from #{id}")
/// });
///
/// let output = registry.render("{greeting:Ada}! {unknown}", 7, "text");
/// assert_eq!(output, "Hello Ada from #7! {unknown}");
/// ```
pub struct TagRegistry {
    state: RwLock<RegistryState>,
    cache: Box<dyn ResultCache>,
}

impl Default for TagRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TagRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagRegistry")
            .field("tags", &self.len())
            .field("cached", &self.cache.len())
            .finish_non_exhaustive()
    }
}

impl TagRegistry {
    /// Create an empty registry with an unbounded in-memory cache.
    #[must_use]
    pub fn new() -> Self {
        Self::with_cache(Box::new(MemoryCache::new()))
    }

    /// Create an empty registry backed by the given cache.
    ///
    /// Pass [`NullCache`](dyntag_cache::NullCache) to disable memoization.
    #[must_use]
    pub fn with_cache(cache: Box<dyn ResultCache>) -> Self {
        Self {
            state: RwLock::new(RegistryState::default()),
            cache,
        }
    }

    /// Register a tag.
    ///
    /// The tag id is derived from `raw_name` (see
    /// [`parse_tag_id`](crate::parse_tag_id)). Registering an id that already
    /// exists replaces the previous definition; results cached for the old
    /// definition are no longer served.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    pub fn register<F>(&self, raw_name: &str, options: TagOptions, callback: F)
    where
        F: Fn(u64, &str, &str) -> String + Send + Sync + 'static,
    {
        self.register_callback(raw_name, options, Arc::new(callback));
    }

    /// Register a tag with an already shared callback.
    ///
    /// Same semantics as [`register`](Self::register).
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    pub fn register_callback(&self, raw_name: &str, options: TagOptions, callback: TagCallback) {
        let id = parse_tag_id(raw_name).to_owned();

        let mut state = self.state.write().unwrap();
        let revision = state.next_revision;
        state.next_revision += 1;

        tracing::debug!(id = %id, raw_name, revision, "registering tag");

        let previous = state.tags.insert(
            id.clone(),
            TagDefinition {
                id,
                raw_name: raw_name.to_owned(),
                options,
                callback,
                revision,
            },
        );
        if let Some(previous) = previous {
            tracing::debug!(id = %previous.id, "replaced existing tag definition");
        }

        state.pattern = OnceLock::new();
    }

    /// List every registered tag, sorted by id.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    #[must_use]
    pub fn list_tags(&self) -> Vec<TagInfo> {
        let state = self.state.read().unwrap();
        let mut definitions: Vec<&TagDefinition> = state.tags.values().collect();
        definitions.sort_by(|a, b| a.id.cmp(&b.id));
        definitions.into_iter().map(TagDefinition::info).collect()
    }

    /// Get the definition registered under `id`.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<TagDefinition> {
        self.state.read().unwrap().tags.get(id).cloned()
    }

    /// Check whether a tag with this id is registered.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.state.read().unwrap().tags.contains_key(id)
    }

    /// Number of registered tags.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.read().unwrap().tags.len()
    }

    /// Whether no tags are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of memoized resolutions.
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// Pattern matching any registered tag occurrence.
    ///
    /// Compiled on first use and reused until the next registration.
    /// Returns `None` when no tags are registered.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    #[must_use]
    pub fn compile_pattern(&self) -> Option<Arc<Regex>> {
        let state = self.state.read().unwrap();
        state
            .pattern
            .get_or_init(|| compile_pattern(state.tags.keys().map(String::as_str)).map(Arc::new))
            .clone()
    }

    /// Resolve a single tag occurrence.
    ///
    /// `occurrence` is the full matched text, braces and attributes included.
    /// Unknown tags are returned unchanged and never cached. Known tags are
    /// resolved through their callback once per
    /// `(occurrence, subject_id, context)` and then served from the cache.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    #[must_use]
    pub fn resolve(&self, occurrence: &str, subject_id: u64, context: &str) -> String {
        let id = parse_tag_id(occurrence);

        // Clone out of the lock so the callback runs unlocked
        let Some((callback, revision)) = self
            .state
            .read()
            .unwrap()
            .tags
            .get(id)
            .map(|definition| (Arc::clone(&definition.callback), definition.revision))
        else {
            tracing::trace!(occurrence, "unknown tag left as is");
            return occurrence.to_owned();
        };

        let key = CacheKey::new(occurrence, subject_id, context).compute_hash();
        let etag = revision.to_string();

        if let Some(cached) = self.cache.get(&key, &etag) {
            tracing::trace!(occurrence, subject_id, context, "cache hit");
            return cached;
        }

        tracing::trace!(occurrence, subject_id, context, "cache miss, invoking callback");
        let result = callback(subject_id, occurrence, context);
        self.cache.set(&key, &etag, &result);
        result
    }

    /// Resolve a loosely-typed host value.
    ///
    /// Strings are resolved as in [`resolve`](Self::resolve); any other value
    /// is returned unchanged.
    ///
    /// # Example
    ///
    /// ```
    /// use dyntag_registry::{TagOptions, TagRegistry};
    /// use serde_json::json;
    ///
    /// let registry = TagRegistry::new();
    /// registry.register("{one}", TagOptions::default(), |_, _, _| "1".to_owned());
    ///
    /// assert_eq!(registry.resolve_value(json!("{one}"), 1, "text"), json!("1"));
    /// assert_eq!(registry.resolve_value(json!(["{one}"]), 1, "text"), json!(["{one}"]));
    /// ```
    #[must_use]
    pub fn resolve_value(&self, value: Value, subject_id: u64, context: &str) -> Value {
        match value {
            Value::String(occurrence) => {
                Value::String(self.resolve(&occurrence, subject_id, context))
            }
            other => other,
        }
    }

    /// Substitute every registered tag occurrence in `content`.
    ///
    /// Matches are replaced left to right in a single pass: text produced by
    /// a callback is never scanned again, so a tag resolving to tag-like
    /// syntax cannot expand recursively. Unknown tags stay literal.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    #[must_use]
    pub fn render(&self, content: &str, subject_id: u64, context: &str) -> String {
        if self.is_empty() {
            return content.to_owned();
        }

        let Some(pattern) = self.compile_pattern() else {
            return content.to_owned();
        };

        pattern
            .replace_all(content, |caps: &Captures<'_>| {
                self.resolve(&caps[0], subject_id, context)
            })
            .into_owned()
    }
}
