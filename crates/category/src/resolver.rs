use crate::cache::{CacheLookup, CategoryCache, CategoryStore, UNKNOWN_CATEGORY};
use crate::distance::closest_match;
use crate::error::Result;
use crate::taxonomy::{LookupOutcome, Taxonomy, TaxonomyCandidate};
use mindmap_text::Language;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Maps words to coarse semantic categories
pub trait Categorizer: Send + Sync {
    /// Category for `word`, or `"unknown"`; never fails
    fn category_of(&self, word: &str, language: Language) -> String;

    /// Called before a batch of lookups; configuration and storage errors surface here
    fn prepare(&self, _language: Language) -> Result<()> {
        Ok(())
    }

    /// Persist whatever was learned since the last checkpoint
    fn checkpoint(&self) -> Result<()> {
        Ok(())
    }
}

/// Label and category picked from a taxonomy answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryMatch {
    pub label: String,
    pub category: String,
}

/// Pick the sense for `word` among `candidates`.
///
/// The label equal to `word` wins; otherwise the closest label by edit distance.
/// The label's first category in candidate order is used. Categories equal to
/// the word itself carry no information and are ignored.
pub fn select_category(word: &str, candidates: &[TaxonomyCandidate]) -> Option<CategoryMatch> {
    let usable: Vec<(String, String)> = candidates
        .iter()
        .map(|c| (c.label.to_lowercase(), c.category.to_lowercase()))
        .filter(|(_, category)| category != word)
        .collect();

    let mut labels: Vec<&str> = Vec::new();
    for (label, _) in &usable {
        if !labels.contains(&label.as_str()) {
            labels.push(label);
        }
    }

    let label = if labels.contains(&word) {
        word
    } else {
        closest_match(word, labels.iter().copied())?
    };

    let category = usable
        .iter()
        .find(|(l, _)| l == label)
        .map(|(_, category)| category.as_str())?;

    Some(CategoryMatch {
        label: label.to_string(),
        category: category.to_string(),
    })
}

/// Counters of a [`CategoryResolver`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolverStats {
    pub cache_hits: u64,
    pub cached_errors: u64,
    pub lookups: u64,
    pub not_found: u64,
    pub service_errors: u64,
}

#[derive(Debug, Default)]
struct AtomicStats {
    cache_hits: AtomicU64,
    cached_errors: AtomicU64,
    lookups: AtomicU64,
    not_found: AtomicU64,
    service_errors: AtomicU64,
}

impl AtomicStats {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> ResolverStats {
        ResolverStats {
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cached_errors: self.cached_errors.load(Ordering::Relaxed),
            lookups: self.lookups.load(Ordering::Relaxed),
            not_found: self.not_found.load(Ordering::Relaxed),
            service_errors: self.service_errors.load(Ordering::Relaxed),
        }
    }
}

/// Taxonomy-backed categorizer with a per-language cache.
///
/// Safe to share between threads. Two threads resolving the same uncached word
/// may both query the taxonomy; the last write wins.
pub struct CategoryResolver<T: Taxonomy> {
    taxonomy: T,
    store: CategoryStore,
    stats: AtomicStats,
}

impl<T: Taxonomy> CategoryResolver<T> {
    pub fn new(taxonomy: T, store: CategoryStore) -> Self {
        Self {
            taxonomy,
            store,
            stats: AtomicStats::default(),
        }
    }

    pub fn taxonomy(&self) -> &T {
        &self.taxonomy
    }

    pub fn store(&self) -> &CategoryStore {
        &self.store
    }

    pub fn stats(&self) -> ResolverStats {
        self.stats.snapshot()
    }

    /// Resolve `word`, surfacing cache loading errors
    pub fn resolve(&self, word: &str, language: Language) -> Result<String> {
        let word = word.trim().to_lowercase();
        if word.is_empty() {
            return Ok(UNKNOWN_CATEGORY.to_string());
        }

        let cache = self.store.cache(language)?;
        match cache.get(&word) {
            CacheLookup::Fresh(category) => {
                AtomicStats::bump(&self.stats.cache_hits);
                Ok(category)
            }
            CacheLookup::Error => {
                AtomicStats::bump(&self.stats.cached_errors);
                log::debug!("Taxonomy failed for '{word}' before, not retrying yet");
                Ok(UNKNOWN_CATEGORY.to_string())
            }
            CacheLookup::Missing => Ok(self.query(&word, language, &cache)),
        }
    }

    fn query(&self, word: &str, language: Language, cache: &CategoryCache) -> String {
        AtomicStats::bump(&self.stats.lookups);
        log::debug!("Querying taxonomy for '{word}' ({language})");

        match self.taxonomy.lookup(word, language) {
            LookupOutcome::ServiceError(reason) => {
                AtomicStats::bump(&self.stats.service_errors);
                log::warn!("Taxonomy unavailable for '{word}' ({language}): {reason}");
                cache.mark_error(word);
                UNKNOWN_CATEGORY.to_string()
            }
            LookupOutcome::NotFound => {
                AtomicStats::bump(&self.stats.not_found);
                cache.insert(word, UNKNOWN_CATEGORY);
                UNKNOWN_CATEGORY.to_string()
            }
            LookupOutcome::Found(candidates) => match select_category(word, &candidates) {
                Some(found) => {
                    cache.insert(word, &found.category);
                    if found.label != word {
                        log::debug!(
                            "'{word}' resolved through closest label '{}' → '{}'",
                            found.label,
                            found.category
                        );
                        cache.insert_if_absent(&found.label, &found.category);
                    }
                    found.category
                }
                None => {
                    AtomicStats::bump(&self.stats.not_found);
                    cache.insert(word, UNKNOWN_CATEGORY);
                    UNKNOWN_CATEGORY.to_string()
                }
            },
        }
    }
}

impl<T: Taxonomy> Categorizer for CategoryResolver<T> {
    fn category_of(&self, word: &str, language: Language) -> String {
        self.resolve(word, language).unwrap_or_else(|err| {
            log::warn!("Category cache unavailable for '{language}': {err}");
            UNKNOWN_CATEGORY.to_string()
        })
    }

    fn prepare(&self, language: Language) -> Result<()> {
        self.store.cache(language).map(|_| ())
    }

    fn checkpoint(&self) -> Result<()> {
        self.store.flush().map(|_| ())
    }
}
