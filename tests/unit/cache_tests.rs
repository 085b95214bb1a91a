/*!
 * Tests for the in-memory translation cache
 */

use creatorflow::translation::cache::TranslationCache;

/// Test that a stored result comes back for the same key
#[test]
fn test_cache_withStoredEntry_shouldReturnItOnGet() {
    let cache = TranslationCache::new(true);

    cache.store("chunk", "model-a", "my", "Hello", "translated");
    let hit = cache.get("chunk", "model-a", "my", "Hello");

    assert_eq!(hit, Some("translated".to_string()));
}

/// Test that every key field participates in the lookup
#[test]
fn test_cache_withDifferentKeyFields_shouldMiss() {
    let cache = TranslationCache::new(true);
    cache.store("chunk", "model-a", "my", "Hello", "translated");

    assert_eq!(cache.get("rewrite:pure", "model-a", "my", "Hello"), None);
    assert_eq!(cache.get("chunk", "model-b", "my", "Hello"), None);
    assert_eq!(cache.get("chunk", "model-a", "fr", "Hello"), None);
    assert_eq!(cache.get("chunk", "model-a", "my", "Goodbye"), None);
}

/// Test that field boundaries are part of the key.
///
/// With naive concatenation ("ab" + "c" vs "a" + "bc") two different
/// requests would collide; the length-prefixed digest must keep them apart.
#[test]
fn test_cache_withShiftedFieldBoundaries_shouldNotCollide() {
    let cache = TranslationCache::new(true);

    cache.store("chunk", "ab", "c", "text", "first");
    cache.store("chunk", "a", "bc", "text", "second");

    assert_eq!(cache.get("chunk", "ab", "c", "text"), Some("first".to_string()));
    assert_eq!(cache.get("chunk", "a", "bc", "text"), Some("second".to_string()));
}

/// Test a disabled cache never stores or returns anything
#[test]
fn test_cache_withDisabledCache_shouldStayEmpty() {
    let cache = TranslationCache::new(false);

    cache.store("chunk", "model-a", "my", "Hello", "translated");

    assert!(!cache.is_enabled());
    assert_eq!(cache.get("chunk", "model-a", "my", "Hello"), None);
    assert!(cache.is_empty());
}

/// Test hit and miss counters feed the stats tuple
#[test]
fn test_cache_stats_withHitsAndMisses_shouldReportRates() {
    let cache = TranslationCache::new(true);
    cache.store("chunk", "m", "my", "one", "1");

    // Two hits, two misses
    cache.get("chunk", "m", "my", "one");
    cache.get("chunk", "m", "my", "one");
    cache.get("chunk", "m", "my", "two");
    cache.get("chunk", "m", "my", "three");

    let (hits, misses, rate) = cache.stats();
    assert_eq!(hits, 2);
    assert_eq!(misses, 2);
    assert!((rate - 0.5).abs() < f64::EPSILON);
}

/// Test clearing resets entries but keeps the cache usable
#[test]
fn test_cache_clear_withEntries_shouldEmptyTheMap() {
    let cache = TranslationCache::new(true);
    cache.store("chunk", "m", "my", "one", "1");
    cache.store("chunk", "m", "my", "two", "2");
    assert_eq!(cache.len(), 2);

    cache.clear();

    assert!(cache.is_empty());
    cache.store("chunk", "m", "my", "three", "3");
    assert_eq!(cache.get("chunk", "m", "my", "three"), Some("3".to_string()));
}

/// Test clones share the same underlying map
#[test]
fn test_cache_withClone_shouldShareEntries() {
    let cache = TranslationCache::new(true);
    let clone = cache.clone();

    cache.store("chunk", "m", "my", "shared", "value");

    assert_eq!(clone.get("chunk", "m", "my", "shared"), Some("value".to_string()));
}

/// Test the bounded size: filling past the cap resets the whole map
#[test]
fn test_cache_withOverflow_shouldResetInsteadOfGrowing() {
    let cache = TranslationCache::new(true);

    // One more than the cap; the insert that hits the cap clears first
    for i in 0..4097 {
        cache.store("chunk", "m", "my", &format!("text-{i}"), "t");
    }

    assert!(cache.len() <= 4096);
    // The map was reset at the cap, so early entries are gone
    assert_eq!(cache.get("chunk", "m", "my", "text-0"), None);
    // The last entry inserted after the reset is present
    assert_eq!(cache.get("chunk", "m", "my", "text-4096"), Some("t".to_string()));
}
