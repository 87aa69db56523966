//! # Mind Map Graph
//!
//! Turns co-occurrence weights into a laid out concept graph.
//!
//! ## Features
//!
//! - **Link ranking** - heaviest pairs first, optional top-k and weight normalization
//! - **Categorization** - every kept word tagged through a [`mindmap_category::Categorizer`]
//! - **Graph construction** - per-pair aggregation, top-N edge pruning, node sizes
//! - **Layout** - spring, energy-minimizing and partitioned placement
//!
//! ## Architecture
//!
//! ```text
//! CooccurrenceMap
//!     │
//!     ├──> rank_links
//!     │      ├─ Sort by weight (stable)
//!     │      ├─ Truncate to top_k
//!     │      └─ Resolve categories (skipped in live mode)
//!     │
//!     ├──> GraphBuilder
//!     │      ├─ Sum weights per unordered pair
//!     │      ├─ Keep the max_edges heaviest
//!     │      └─ Nodes: word, category, size
//!     │
//!     └──> LayoutEngine
//!            ├─ Spring (Fruchterman–Reingold)
//!            ├─ Energy (gradient descent)
//!            └─ Partitioned (per group, composed)
//! ```
//!
//! ## Example
//!
//! ```
//! use mindmap_graph::{build_graph, layout, LayoutConfig, LogicalLink};
//!
//! let links = vec![LogicalLink {
//!     source: "cat".to_string(),
//!     target: "mat".to_string(),
//!     source_category: "animal".to_string(),
//!     target_category: "unknown".to_string(),
//!     weight: 0.8,
//! }];
//! let graph = build_graph(&links, 50).unwrap();
//! let placed = layout(&graph, &LayoutConfig::default()).unwrap();
//! assert_eq!(placed.positions.len(), 2);
//! ```

mod builder;
mod error;
mod graph;
mod layout;
mod links;
mod types;

pub use builder::{build_graph, GraphBuilder, GraphConfig};
pub use error::{GraphError, Result};
pub use layout::{
    layout, EnergyConfig, GroupArrangement, Grouping, Layout, LayoutAlgorithm, LayoutConfig,
    LayoutEngine, LayoutReport, LocalLayout, PartitionConfig, Point, PositionMap, SpringConfig,
};
pub use links::{rank_links, LogicalLink, RankOptions, WeightScale};
pub use types::{MindMapGraph, WordEdge, WordNode};
