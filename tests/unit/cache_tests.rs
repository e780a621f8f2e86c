/*!
 * Tests for translation cache functionality
 */

use l2t::translation::cache::TranslationCache;

#[test]
fn test_cache_new_withDisabled_shouldNeverReturnEntries() {
    let cache = TranslationCache::new(false);
    cache.store("hello", Some("eng_Latn"), "fra_Latn", "bonjour");

    assert!(cache.get("hello", Some("eng_Latn"), "fra_Latn").is_none());
    assert!(cache.is_empty());
    assert!(!cache.is_enabled());
}

#[test]
fn test_cache_store_withEnabledCache_shouldStoreTranslation() {
    let cache = TranslationCache::new(true);
    cache.store("hello", Some("eng_Latn"), "fra_Latn", "bonjour");

    assert_eq!(cache.get("hello", Some("eng_Latn"), "fra_Latn"), Some("bonjour".to_string()));
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_cache_get_withDifferentLanguages_shouldReturnNone() {
    let cache = TranslationCache::default();
    cache.store("hello", Some("eng_Latn"), "fra_Latn", "bonjour");

    assert!(cache.get("hello", Some("deu_Latn"), "fra_Latn").is_none());
    assert!(cache.get("hello", None, "fra_Latn").is_none());
    assert!(cache.get("hello", Some("eng_Latn"), "spa_Latn").is_none());
}

#[test]
fn test_cache_stats_withHitsAndMisses_shouldCount() {
    let cache = TranslationCache::new(true);
    cache.store("a", None, "fra_Latn", "A");

    let _ = cache.get("a", None, "fra_Latn");
    let _ = cache.get("a", None, "fra_Latn");
    let _ = cache.get("b", None, "fra_Latn");

    let stats = cache.stats();
    assert_eq!(stats.hits, 2);
    assert_eq!(stats.misses, 1);
    assert!((stats.hit_rate() - 2.0 / 3.0).abs() < f64::EPSILON);
}

#[test]
fn test_cache_clear_shouldResetEntriesAndStats() {
    let cache = TranslationCache::new(true);
    cache.store("a", None, "fra_Latn", "A");
    let _ = cache.get("a", None, "fra_Latn");

    cache.clear();

    assert!(cache.is_empty());
    assert_eq!(cache.stats().hits, 0);
    assert_eq!(cache.stats().hit_rate(), 0.0);
}

/// Clones see each other's entries
#[test]
fn test_cache_clone_shouldShareStorage() {
    let cache = TranslationCache::new(true);
    let clone = cache.clone();

    clone.store("a", None, "fra_Latn", "A");

    assert_eq!(cache.get("a", None, "fra_Latn"), Some("A".to_string()));
    assert_eq!(clone.stats().hits, 1);
}

/// Concurrent writers do not lose entries
#[test]
fn test_cache_store_fromManyTasks_shouldKeepAllEntries() {
    let cache = TranslationCache::new(true);

    tokio_test::block_on(async {
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let cache = cache.clone();
                tokio::spawn(async move {
                    cache.store(&format!("line {}", i), None, "fra_Latn", &format!("ligne {}", i));
                })
            })
            .collect();
        for handle in handles {
            let _ = handle.await;
        }
    });

    assert_eq!(cache.len(), 16);
}
