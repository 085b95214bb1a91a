/*!
 * Translation caching functionality.
 *
 * This module provides caching mechanisms for provider requests to avoid
 * redundant API calls. Entries are keyed by a digest of task, model, and
 * target language so a chunk translation never collides with a rewrite of
 * the same text. The entry count is bounded; a full cache resets wholesale
 * instead of tracking per-entry recency.
 */

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use parking_lot::RwLock;
use sha2::{Digest, Sha256};

/// Entries kept before the cache resets itself
const MAX_ENTRIES: usize = 4096;

/// Cache key: SHA-256 over the task, model, target language, and source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey([u8; 32]);

impl CacheKey {
    fn new(task: &str, model: &str, target_language: &str, source_text: &str) -> Self {
        let mut hasher = Sha256::new();
        // Length-prefix each field so ("ab", "c") never collides with ("a", "bc")
        for field in [task, model, target_language, source_text] {
            hasher.update((field.len() as u64).to_le_bytes());
            hasher.update(field.as_bytes());
        }
        Self(hasher.finalize().into())
    }
}

/// Translation cache for storing and retrieving provider results
pub struct TranslationCache {
    /// Internal cache storage
    cache: Arc<RwLock<HashMap<CacheKey, String>>>,

    /// Cache hit counter
    hits: Arc<RwLock<usize>>,

    /// Cache miss counter
    misses: Arc<RwLock<usize>>,

    /// Whether caching is enabled
    enabled: bool,
}

impl TranslationCache {
    /// Create a new translation cache
    pub fn new(enabled: bool) -> Self {
        Self {
            cache: Arc::new(RwLock::new(HashMap::new())),
            hits: Arc::new(RwLock::new(0)),
            misses: Arc::new(RwLock::new(0)),
            enabled,
        }
    }

    /// Get a cached result for a task
    pub fn get(&self, task: &str, model: &str, target_language: &str, source_text: &str) -> Option<String> {
        if !self.enabled {
            return None;
        }

        let key = CacheKey::new(task, model, target_language, source_text);
        let cache = self.cache.read();

        match cache.get(&key) {
            Some(translation) => {
                let mut hits = self.hits.write();
                *hits += 1;

                debug!(
                    "Cache hit for {} '{}' -> {}",
                    task,
                    truncate_text(source_text, 30),
                    target_language
                );

                Some(translation.clone())
            }
            None => {
                let mut misses = self.misses.write();
                *misses += 1;

                debug!(
                    "Cache miss for {} '{}' -> {}",
                    task,
                    truncate_text(source_text, 30),
                    target_language
                );

                None
            }
        }
    }

    /// Store a result in the cache
    pub fn store(&self, task: &str, model: &str, target_language: &str, source_text: &str, translation: &str) {
        if !self.enabled {
            return;
        }

        let key = CacheKey::new(task, model, target_language, source_text);
        let mut cache = self.cache.write();

        // Bounded storage: a full cache drops everything and starts over
        if cache.len() >= MAX_ENTRIES {
            debug!("Translation cache full ({} entries), resetting", cache.len());
            cache.clear();
        }

        cache.insert(key, translation.to_string());

        debug!(
            "Cached {} result for '{}' -> {}",
            task,
            truncate_text(source_text, 30),
            target_language
        );
    }

    /// Get cache statistics as (hits, misses, hit rate)
    pub fn stats(&self) -> (usize, usize, f64) {
        let hits = *self.hits.read();
        let misses = *self.misses.read();
        let total = hits + misses;

        let hit_rate = if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        };

        (hits, misses, hit_rate)
    }

    /// Clear the cache
    pub fn clear(&self) {
        let mut cache = self.cache.write();
        cache.clear();

        let mut hits = self.hits.write();
        *hits = 0;

        let mut misses = self.misses.write();
        *misses = 0;

        debug!("Translation cache cleared");
    }

    /// Get the number of entries in the cache
    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }

    /// Check if the cache is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Clone for TranslationCache {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            hits: self.hits.clone(),
            misses: self.misses.clone(),
            enabled: self.enabled,
        }
    }
}

/// Truncate text to a maximum number of characters with ellipsis
fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let prefix: String = text.chars().take(max_chars).collect();
        format!("{}...", prefix)
    }
}
