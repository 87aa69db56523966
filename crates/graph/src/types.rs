use crate::error::{GraphError, Result};
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Concept node of the mind map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordNode {
    pub word: String,

    /// Category from the taxonomy, or `unknown`
    pub category: String,

    /// Number of aggregated edges touching the word before top-N pruning
    pub size: usize,
}

/// Undirected co-occurrence edge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WordEdge {
    /// Weight summed over every link between the two words
    pub weight: f64,
}

/// Undirected, simple word graph
#[derive(Debug, Clone, Default)]
pub struct MindMapGraph {
    pub graph: UnGraph<WordNode, WordEdge>,

    /// Word -> NodeIndex mapping for fast lookup
    pub word_index: HashMap<String, NodeIndex>,
}

impl MindMapGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, or return the existing node for the same word
    pub fn add_node(&mut self, node: WordNode) -> NodeIndex {
        if let Some(&idx) = self.word_index.get(&node.word) {
            return idx;
        }
        let word = node.word.clone();
        let idx = self.graph.add_node(node);
        self.word_index.insert(word, idx);
        idx
    }

    /// Add or update the edge between two distinct nodes; self-loops are ignored
    pub fn add_edge(&mut self, a: NodeIndex, b: NodeIndex, edge: WordEdge) -> bool {
        if a == b {
            return false;
        }
        self.graph.update_edge(a, b, edge);
        true
    }

    /// Find node by word
    pub fn find_node(&self, word: &str) -> Option<NodeIndex> {
        self.word_index.get(word).copied()
    }

    /// Get node data
    pub fn get_node(&self, idx: NodeIndex) -> Option<&WordNode> {
        self.graph.node_weight(idx)
    }

    /// Node data for `word`, or [`GraphError::NodeNotFound`]
    pub fn node(&self, word: &str) -> Result<&WordNode> {
        self.find_node(word)
            .and_then(|idx| self.get_node(idx))
            .ok_or_else(|| GraphError::NodeNotFound(word.to_string()))
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &WordNode)> {
        self.graph
            .node_indices()
            .filter_map(move |idx| self.graph.node_weight(idx).map(|node| (idx, node)))
    }

    /// Edges in insertion order as (source word, target word, weight)
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, f64)> {
        self.graph.edge_references().map(move |edge| {
            (
                self.graph[edge.source()].word.as_str(),
                self.graph[edge.target()].word.as_str(),
                edge.weight().weight,
            )
        })
    }

    /// Weight of the edge between two words, if any
    pub fn edge_weight(&self, a: &str, b: &str) -> Option<f64> {
        let a = self.find_node(a)?;
        let b = self.find_node(b)?;
        self.graph
            .find_edge(a, b)
            .and_then(|edge| self.graph.edge_weight(edge))
            .map(|edge| edge.weight)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }
}
