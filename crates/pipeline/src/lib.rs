//! # Mind Map Pipeline
//!
//! One call from raw text to a laid out mind map:
//!
//! ```text
//! text ──> Preprocessor ──> CooccurrenceEngine ──> rank_links ──> GraphBuilder ──> LayoutEngine
//!                                                      │
//!                                                      └─ Categorizer (cache flushed after ranking)
//! ```
//!
//! ```
//! use mindmap_pipeline::{generate_mind_map, MindMapOptions};
//!
//! let map = generate_mind_map(
//!     "The cat sat on the mat. The cat likes the mat.",
//!     "en",
//!     &MindMapOptions::default(),
//! )
//! .unwrap();
//! assert_eq!(map.links[0].source, "cat");
//! assert_eq!(map.links[0].target, "mat");
//! ```

mod error;
mod options;
mod pipeline;
mod view;

pub use error::{PipelineError, Result};
pub use options::MindMapOptions;
pub use pipeline::{generate_mind_map, MindMapPipeline};
pub use view::{EdgeView, MindMap, MindMapView, NodeView};
