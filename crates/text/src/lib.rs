//! # Mind Map Text
//!
//! Turns natural-language text into weighted word pairs.
//!
//! ## Pipeline
//!
//! ```text
//! Raw text
//!     │
//!     ├──> Punctuation restorer (optional, best-effort)
//!     │
//!     ├──> Sentence segmentation → lowercase → strip non-word chars
//!     │      └─> stopword removal → ordered token sequence
//!     │
//!     └──> Co-occurrence engine (bounded worker pool)
//!            ├─ shard the sequence (contiguous or strided)
//!            ├─ count window pairs per shard
//!            └─ join + merge partial sums → CooccurrenceMap
//! ```
//!
//! ## Example
//!
//! ```rust
//! use mindmap_text::{CooccurrenceEngine, Language, Preprocessor, TextConfig};
//!
//! let tokens = Preprocessor::new().preprocess(
//!     "The cat sat on the mat. The cat likes the mat.",
//!     Language::English,
//! );
//! let engine = CooccurrenceEngine::new(TextConfig::default()).unwrap();
//! let pairs = engine.count(&tokens);
//!
//! assert!(pairs.get("cat", "mat").unwrap() > 0.0);
//! ```

mod config;
mod cooccurrence;
mod engine;
mod error;
mod language;
mod preprocess;
mod tagging;

pub use config::{PairCounting, ShardStrategy, TextConfig};
pub use cooccurrence::{count_cooccurrence, CooccurrenceMap, PairKey};
pub use engine::CooccurrenceEngine;
pub use error::{Result, TextError};
pub use language::Language;
pub use preprocess::{
    preprocess, Preprocessor, PunctuationRestorer, SentenceSegmenter, UnicodeSentenceSegmenter,
};
pub use tagging::{subject_chain_links, ChainClass, TaggedToken, Tagger};
