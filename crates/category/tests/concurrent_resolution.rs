use mindmap_category::{
    CacheConfig, CacheLookup, Categorizer, CategoryResolver, CategoryStore, LookupOutcome,
    StaticTaxonomy, Taxonomy, TaxonomyCandidate, UNKNOWN_CATEGORY,
};
use mindmap_text::Language;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

/// Answers `<word>` → `cat-<word>` and counts every call
#[derive(Default)]
struct EchoTaxonomy {
    calls: AtomicUsize,
}

impl Taxonomy for EchoTaxonomy {
    fn lookup(&self, word: &str, _language: Language) -> LookupOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        LookupOutcome::Found(vec![TaxonomyCandidate::new(word, format!("cat-{word}"))])
    }
}

fn words(prefix: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{prefix}{i}")).collect()
}

#[test]
fn concurrent_callers_fill_one_consistent_cache() {
    let dir = TempDir::new().unwrap();
    let store = CategoryStore::new(CacheConfig::with_dir(dir.path())).unwrap();
    let resolver = Arc::new(CategoryResolver::new(EchoTaxonomy::default(), store));

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let resolver = Arc::clone(&resolver);
            thread::spawn(move || {
                // Each thread has its own words plus a shared set everyone races on
                for word in words(&format!("t{t}w"), 25).into_iter().chain(words("shared", 10)) {
                    let category = resolver.category_of(&word, Language::English);
                    assert_eq!(category, format!("cat-{word}"));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let cache = resolver.store().cache(Language::English).unwrap();
    assert_eq!(cache.len(), 8 * 25 + 10);
    assert_eq!(
        cache.get("shared3"),
        CacheLookup::Fresh("cat-shared3".to_string())
    );

    // Own words are looked up exactly once; shared ones at least once
    let calls = resolver.taxonomy().calls.load(Ordering::SeqCst);
    assert!(calls >= 8 * 25 + 10, "calls = {calls}");
    assert!(calls <= 8 * 25 + 8 * 10, "calls = {calls}");

    resolver.checkpoint().unwrap();
    let raw: serde_json::Map<String, serde_json::Value> = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("en.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(raw.len(), 8 * 25 + 10);
}

#[test]
fn cache_survives_a_restart() {
    let dir = TempDir::new().unwrap();
    let taxonomy = Arc::new(
        StaticTaxonomy::new(1)
            .with_entry(Language::German, "katze", "tier")
            .with_entry(Language::German, "matte", "möbel"),
    );

    let first = CategoryResolver::new(
        Arc::clone(&taxonomy),
        CategoryStore::new(CacheConfig::with_dir(dir.path())).unwrap(),
    );
    assert_eq!(first.category_of("Katze", Language::German), "tier");
    assert_eq!(first.category_of("hund", Language::German), UNKNOWN_CATEGORY);
    first.checkpoint().unwrap();
    assert!(dir.path().join("de.json").exists());

    let second = CategoryResolver::new(
        taxonomy,
        CategoryStore::new(CacheConfig::with_dir(dir.path())).unwrap(),
    );
    assert_eq!(second.category_of("katze", Language::German), "tier");
    assert_eq!(second.category_of("hund", Language::German), UNKNOWN_CATEGORY);

    let stats = second.stats();
    assert_eq!(stats.lookups, 0);
    assert_eq!(stats.cache_hits, 2);
}

#[test]
fn unreadable_cache_surfaces_in_prepare() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("en.json"), "{ not json").unwrap();

    let resolver = CategoryResolver::new(
        EchoTaxonomy::default(),
        CategoryStore::new(CacheConfig::with_dir(dir.path())).unwrap(),
    );
    assert!(resolver.prepare(Language::English).is_err());
    assert_eq!(resolver.category_of("cat", Language::English), UNKNOWN_CATEGORY);
}
