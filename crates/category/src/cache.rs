use crate::config::CacheConfig;
use crate::error::{CategoryError, Result};
use chrono::NaiveDateTime;
use mindmap_text::Language;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Category reported when nothing better is known
pub const UNKNOWN_CATEGORY: &str = "unknown";

/// Stored in place of a category when the taxonomy failed for a word
pub const ERROR_MARKER: &str = "__error__";

const CACHETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// Parse a `cachetime` value as written to cache files
pub fn parse_cachetime(raw: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw.trim(), CACHETIME_FORMAT)
        .map_err(|e| CategoryError::invalid_timestamp(raw, e))
}

fn format_cachetime(time: &NaiveDateTime) -> String {
    time.format(CACHETIME_FORMAT).to_string()
}

/// A cached category and the local time it was captured
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub category: String,
    pub cachetime: NaiveDateTime,
}

impl CacheEntry {
    pub fn new(category: impl Into<String>, cachetime: NaiveDateTime) -> Self {
        Self {
            category: category.into(),
            cachetime,
        }
    }

    pub fn is_error(&self) -> bool {
        self.category == ERROR_MARKER
    }
}

/// What the cache knows about a word right now
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup {
    /// A category captured within the staleness window
    Fresh(String),
    /// A taxonomy failure remembered within the error TTL
    Error,
    /// Never cached, or the entry expired
    Missing,
}

#[derive(Deserialize)]
struct StoredRecord {
    category: Option<String>,
    cachetime: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredEntry {
    Record(StoredRecord),
    Legacy(String),
}

#[derive(Serialize)]
struct RecordOut<'a> {
    cachetime: String,
    category: &'a str,
}

/// word → category cache for one language.
///
/// Readers share the map; every write goes through [`CategoryCache::insert`] or
/// [`CategoryCache::mark_error`] and marks the cache dirty until the next flush.
#[derive(Debug)]
pub struct CategoryCache {
    language: Language,
    path: Option<PathBuf>,
    entries: RwLock<HashMap<String, CacheEntry>>,
    dirty: AtomicBool,
    staleness: chrono::Duration,
    error_ttl: chrono::Duration,
    migrated: usize,
}

impl CategoryCache {
    /// Cache without a backing file
    pub fn in_memory(language: Language, config: &CacheConfig) -> Self {
        Self::empty(language, None, config)
    }

    fn empty(language: Language, path: Option<PathBuf>, config: &CacheConfig) -> Self {
        Self {
            language,
            path,
            entries: RwLock::new(HashMap::new()),
            dirty: AtomicBool::new(false),
            staleness: config.staleness(),
            error_ttl: config.error_ttl(),
            migrated: 0,
        }
    }

    /// Load the cache file at `path`; a missing file gives an empty cache.
    ///
    /// Legacy entries (bare strings, `null`, records without a timestamp) are
    /// migrated on read and the cache is marked dirty so the next flush rewrites them.
    pub fn load(path: impl AsRef<Path>, language: Language, config: &CacheConfig) -> Result<Self> {
        let path = path.as_ref();
        let mut cache = Self::empty(language, Some(path.to_path_buf()), config);

        if !path.exists() {
            log::debug!("No category cache at {:?}, starting empty", path);
            return Ok(cache);
        }

        let bytes = std::fs::read(path)?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(cache);
        }

        let raw: HashMap<String, Option<StoredEntry>> = serde_json::from_slice(&bytes)?;
        let loaded_at = now();
        let mut entries = HashMap::with_capacity(raw.len());
        let mut migrated = 0;

        for (word, stored) in raw {
            let (entry, was_legacy) = match stored {
                None => (CacheEntry::new(UNKNOWN_CATEGORY, loaded_at), true),
                Some(StoredEntry::Legacy(category)) => (CacheEntry::new(category, loaded_at), true),
                Some(StoredEntry::Record(record)) => {
                    let mut was_legacy = record.category.is_none() || record.cachetime.is_none();
                    let category = record
                        .category
                        .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string());
                    let cachetime = match record.cachetime.as_deref().map(parse_cachetime) {
                        None => loaded_at,
                        Some(Ok(time)) => time,
                        Some(Err(err)) => {
                            log::warn!("{err}; '{word}' will be looked up again");
                            was_legacy = true;
                            NaiveDateTime::default()
                        }
                    };
                    (CacheEntry::new(category, cachetime), was_legacy)
                }
            };
            if was_legacy {
                migrated += 1;
            }
            entries.insert(word, entry);
        }

        if migrated > 0 {
            log::info!(
                "Migrated {migrated} legacy category entries in {:?}",
                path
            );
            cache.dirty.store(true, Ordering::Release);
        }
        log::info!(
            "Loaded {} cached categories for '{}' from {:?}",
            entries.len(),
            language,
            path
        );

        cache.entries = RwLock::new(entries);
        cache.migrated = migrated;
        Ok(cache)
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Number of legacy entries rewritten while loading
    pub fn migrated(&self) -> usize {
        self.migrated
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    /// Raw entry, regardless of age
    pub fn entry(&self, word: &str) -> Option<CacheEntry> {
        self.read().get(word).cloned()
    }

    pub fn get(&self, word: &str) -> CacheLookup {
        self.get_at(word, now())
    }

    /// Lookup as seen at time `at`
    pub fn get_at(&self, word: &str, at: NaiveDateTime) -> CacheLookup {
        let entries = self.read();
        let Some(entry) = entries.get(word) else {
            return CacheLookup::Missing;
        };

        let age = at.signed_duration_since(entry.cachetime);
        if entry.is_error() {
            if age <= self.error_ttl {
                CacheLookup::Error
            } else {
                CacheLookup::Missing
            }
        } else if age <= self.staleness {
            CacheLookup::Fresh(entry.category.clone())
        } else {
            log::debug!(
                "Cached category for '{word}' is stale (captured {})",
                format_cachetime(&entry.cachetime)
            );
            CacheLookup::Missing
        }
    }

    /// Store `category` for `word`, replacing any previous entry
    pub fn insert(&self, word: &str, category: &str) {
        self.insert_at(word, category, now());
    }

    pub fn insert_at(&self, word: &str, category: &str, cachetime: NaiveDateTime) {
        self.write()
            .insert(word.to_string(), CacheEntry::new(category, cachetime));
        self.dirty.store(true, Ordering::Release);
    }

    /// Store `category` unless `word` already has a fresh entry; returns true if stored
    pub fn insert_if_absent(&self, word: &str, category: &str) -> bool {
        if matches!(self.get(word), CacheLookup::Fresh(_)) {
            return false;
        }
        self.insert(word, category);
        true
    }

    /// Remember that the taxonomy failed for `word`
    pub fn mark_error(&self, word: &str) {
        self.insert(word, ERROR_MARKER);
    }

    /// Write the cache to its file if anything changed since the last flush.
    ///
    /// Returns whether a file was written.
    pub fn flush(&self) -> Result<bool> {
        let Some(path) = &self.path else {
            return Ok(false);
        };
        if !self.dirty.swap(false, Ordering::AcqRel) {
            return Ok(false);
        }

        if let Err(err) = self.save_to(path) {
            self.dirty.store(true, Ordering::Release);
            return Err(err);
        }
        Ok(true)
    }

    /// Mark every entry for rewriting on the next flush
    pub fn touch(&self) {
        self.dirty.store(true, Ordering::Release);
    }

    /// Atomically write the cache as JSON to `path` (temp file + rename)
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let data = {
            let entries = self.read();
            let records: BTreeMap<&str, RecordOut<'_>> = entries
                .iter()
                .map(|(word, entry)| {
                    (
                        word.as_str(),
                        RecordOut {
                            cachetime: format_cachetime(&entry.cachetime),
                            category: &entry.category,
                        },
                    )
                })
                .collect();
            serde_json::to_vec_pretty(&records)?
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &data)?;
        if let Err(err) = std::fs::rename(&tmp, path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(err.into());
        }

        log::debug!("Flushed {} bytes of '{}' categories to {:?}", data.len(), self.language, path);
        Ok(())
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, CacheEntry>> {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, CacheEntry>> {
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// One lazily loaded [`CategoryCache`] per language, stored as `<dir>/<lang>.json`
#[derive(Debug)]
pub struct CategoryStore {
    config: CacheConfig,
    caches: RwLock<HashMap<Language, Arc<CategoryCache>>>,
}

impl CategoryStore {
    pub fn new(config: CacheConfig) -> Result<Self> {
        config.validate().map_err(CategoryError::InvalidConfig)?;
        Ok(Self {
            config,
            caches: RwLock::new(HashMap::new()),
        })
    }

    /// Store that never touches the filesystem
    pub fn in_memory() -> Self {
        Self {
            config: CacheConfig::default(),
            caches: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn cache_path(&self, language: Language) -> Option<PathBuf> {
        self.config
            .dir
            .as_ref()
            .map(|dir| dir.join(format!("{}.json", language.code())))
    }

    /// Cache for `language`, loading it on first use
    pub fn cache(&self, language: Language) -> Result<Arc<CategoryCache>> {
        if let Some(cache) = self
            .caches
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&language)
        {
            return Ok(Arc::clone(cache));
        }

        let mut caches = self
            .caches
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(cache) = caches.get(&language) {
            return Ok(Arc::clone(cache));
        }

        let cache = match self.cache_path(language) {
            Some(path) => CategoryCache::load(path, language, &self.config)?,
            None => CategoryCache::in_memory(language, &self.config),
        };
        let cache = Arc::new(cache);
        caches.insert(language, Arc::clone(&cache));
        Ok(cache)
    }

    /// Flush every dirty cache; returns how many files were written
    pub fn flush(&self) -> Result<usize> {
        let caches: Vec<Arc<CategoryCache>> = self
            .caches
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .values()
            .cloned()
            .collect();

        let mut written = 0;
        for cache in caches {
            if cache.flush()? {
                written += 1;
            }
        }
        if written > 0 {
            log::info!("Flushed {written} category cache file(s)");
        }
        Ok(written)
    }

    /// Load the cache for `language`, migrating legacy entries, and write it back
    pub fn migrate(&self, language: Language) -> Result<MigrationReport> {
        let cache = self.cache(language)?;
        cache.touch();
        let written = cache.flush()?;
        Ok(MigrationReport {
            language,
            path: cache.path().map(Path::to_path_buf),
            entries: cache.len(),
            migrated: cache.migrated(),
            written,
        })
    }
}

/// Outcome of [`CategoryStore::migrate`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    pub language: Language,
    pub path: Option<PathBuf>,
    pub entries: usize,
    pub migrated: usize,
    pub written: bool,
}
