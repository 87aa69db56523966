use crate::error::{GraphError, Result};
use crate::links::LogicalLink;
use crate::types::{MindMapGraph, WordEdge, WordNode};
use mindmap_category::UNKNOWN_CATEGORY;
use mindmap_text::{CooccurrenceMap, PairKey};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Graph construction settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Keep only this many heaviest aggregated edges
    pub max_edges: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self { max_edges: 50 }
    }
}

impl GraphConfig {
    /// Validate configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.max_edges == 0 {
            return Err("max_edges must be > 0".to_string());
        }
        Ok(())
    }
}

/// Builds a [`MindMapGraph`] from ranked links
pub struct GraphBuilder {
    config: GraphConfig,
}

impl GraphBuilder {
    pub fn new(config: GraphConfig) -> Result<Self> {
        config.validate().map_err(GraphError::InvalidConfig)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Aggregate `links` per unordered pair and keep the `max_edges` heaviest.
    ///
    /// Node size counts the aggregated edges touching a word before pruning;
    /// a word's category is the one from its last link.
    pub fn build(&self, links: &[LogicalLink]) -> MindMapGraph {
        let mut weights = CooccurrenceMap::new();
        let mut categories: HashMap<&str, &str> = HashMap::new();

        for link in links {
            if !weights.add_pair(&link.source, &link.target, link.weight) {
                continue;
            }
            categories.insert(&link.source, &link.source_category);
            categories.insert(&link.target, &link.target_category);
        }

        let mut sizes: HashMap<&str, usize> = HashMap::new();
        for (key, _) in weights.iter() {
            *sizes.entry(key.first()).or_default() += 1;
            *sizes.entry(key.second()).or_default() += 1;
        }

        let mut ranked: Vec<(&PairKey, f64)> = weights.iter().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(self.config.max_edges);

        let mut graph = MindMapGraph::new();
        for (key, weight) in &ranked {
            let a = graph.add_node(self.node(key.first(), &categories, &sizes));
            let b = graph.add_node(self.node(key.second(), &categories, &sizes));
            graph.add_edge(a, b, WordEdge { weight: *weight });
        }

        log::info!(
            "Built mind map graph: {} nodes, {} edges (from {} aggregated pairs)",
            graph.node_count(),
            graph.edge_count(),
            weights.len()
        );
        graph
    }

    fn node(
        &self,
        word: &str,
        categories: &HashMap<&str, &str>,
        sizes: &HashMap<&str, usize>,
    ) -> WordNode {
        WordNode {
            word: word.to_string(),
            category: categories
                .get(word)
                .copied()
                .unwrap_or(UNKNOWN_CATEGORY)
                .to_string(),
            size: sizes.get(word).copied().unwrap_or(0),
        }
    }
}

/// Build a graph with at most `max_edges` edges
pub fn build_graph(links: &[LogicalLink], max_edges: usize) -> Result<MindMapGraph> {
    Ok(GraphBuilder::new(GraphConfig { max_edges })?.build(links))
}
