//! # Mind Map Category
//!
//! Resolves words to coarse semantic categories through an external taxonomy,
//! remembering answers in a per-language cache file.
//!
//! ## Resolution
//!
//! ```text
//! word ──> lowercase ──> empty? ──────────────────────────────> "unknown"
//!                          │
//!                          └─> cache ── fresh ────────────────> category
//!                                 ├──── error (within TTL) ───> "unknown"
//!                                 └──── missing / stale
//!                                          │
//!                                          └─> taxonomy lookup
//!                                                ├─ Found ────> exact or closest label
//!                                                ├─ NotFound ─> "unknown" (cached)
//!                                                └─ ServiceError → error marker, "unknown"
//! ```
//!
//! Cache files live at `<dir>/<lang>.json` and map each word to
//! `{"cachetime": "%Y-%m-%d %H:%M:%S", "category": ...}`.

mod cache;
mod config;
mod distance;
mod error;
mod resolver;
mod taxonomy;

pub use cache::{
    parse_cachetime, CacheEntry, CacheLookup, CategoryCache, CategoryStore, MigrationReport,
    ERROR_MARKER, UNKNOWN_CATEGORY,
};
pub use config::CacheConfig;
pub use distance::{closest_match, levenshtein, MAX_MATCH_DISTANCE};
pub use error::{CategoryError, Result};
pub use resolver::{select_category, Categorizer, CategoryMatch, CategoryResolver, ResolverStats};
pub use taxonomy::{LookupOutcome, StaticTaxonomy, Taxonomy, TaxonomyCandidate};
