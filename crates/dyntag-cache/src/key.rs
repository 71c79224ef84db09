//! Cache key computation for tag occurrences.

use sha2::{Digest, Sha256};

/// Parameters identifying one resolution of a tag occurrence.
///
/// Two resolutions share a cache entry only when the occurrence text, the
/// subject and the context are all identical.
#[derive(Debug, Clone, Copy)]
pub struct CacheKey<'a> {
    /// Full occurrence text including braces and attributes.
    pub occurrence: &'a str,
    /// Identifier of the entity being rendered.
    pub subject_id: u64,
    /// Render context (e.g., "text", "html").
    pub context: &'a str,
}

impl<'a> CacheKey<'a> {
    /// Create a key for one occurrence.
    #[must_use]
    pub fn new(occurrence: &'a str, subject_id: u64, context: &'a str) -> Self {
        Self {
            occurrence,
            subject_id,
            context,
        }
    }

    /// Compute the hash used as the cache key.
    ///
    /// # Hash Format
    ///
    /// SHA-256 of `"{occurrence}|{subject_id}|{context}"`, hex encoded.
    #[must_use]
    pub fn compute_hash(&self) -> String {
        let content = format!("{}|{}|{}", self.occurrence, self.subject_id, self.context);
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        let result = hasher.finalize();
        hex::encode(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_hash() {
        let key1 = CacheKey::new("{tag}", 1, "text");
        let key2 = CacheKey::new("{tag}", 1, "text");
        let key3 = CacheKey::new("{tag:a}", 1, "text");

        assert_eq!(key1.compute_hash(), key2.compute_hash());
        assert_ne!(key1.compute_hash(), key3.compute_hash());
        // Hash is 64 hex characters (256 bits)
        assert_eq!(key1.compute_hash().len(), 64);
    }

    #[test]
    fn test_cache_key_subject_matters() {
        let a = CacheKey::new("{tag}", 1, "text");
        let b = CacheKey::new("{tag}", 2, "text");

        assert_ne!(a.compute_hash(), b.compute_hash());
    }

    #[test]
    fn test_cache_key_context_matters() {
        let text = CacheKey::new("{tag}", 1, "text");
        let html = CacheKey::new("{tag}", 1, "html");

        assert_ne!(text.compute_hash(), html.compute_hash());
    }

    #[test]
    fn test_cache_key_hash_is_hex() {
        let hash = CacheKey::new("{tag}", 7, "text").compute_hash();
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
