use crate::error::{GraphError, Result};
use crate::types::MindMapGraph;
use petgraph::graph::NodeIndex;
use petgraph::visit::Bfs;
use std::collections::HashSet;

impl MindMapGraph {
    fn require(&self, word: &str) -> Result<NodeIndex> {
        self.find_node(word)
            .ok_or_else(|| GraphError::NodeNotFound(word.to_string()))
    }

    /// Words adjacent to `word`
    pub fn neighbors(&self, word: &str) -> Result<Vec<&str>> {
        let idx = self.require(word)?;
        Ok(self
            .graph
            .neighbors(idx)
            .map(|n| self.graph[n].word.as_str())
            .collect())
    }

    /// Number of edges touching `word` in this graph
    pub fn degree(&self, word: &str) -> Result<usize> {
        let idx = self.require(word)?;
        Ok(self.graph.edges(idx).count())
    }

    /// Sum of the weights of the edges touching `word`
    pub fn incident_weight(&self, word: &str) -> Result<f64> {
        let idx = self.require(word)?;
        Ok(self.incident_weight_of(idx))
    }

    pub(crate) fn incident_weight_of(&self, idx: NodeIndex) -> f64 {
        self.graph.edges(idx).map(|e| e.weight().weight).sum()
    }

    /// Degree divided by the largest possible degree (`n - 1`)
    pub fn degree_centrality(&self, idx: NodeIndex) -> f64 {
        let n = self.graph.node_count();
        if n < 2 {
            return 0.0;
        }
        self.graph.edges(idx).count() as f64 / (n - 1) as f64
    }

    /// Nodes grouped by category, groups and members in insertion order
    pub fn partition_by_category(&self) -> Vec<(String, Vec<NodeIndex>)> {
        let mut groups: Vec<(String, Vec<NodeIndex>)> = Vec::new();
        for (idx, node) in self.nodes() {
            match groups.iter_mut().find(|(category, _)| *category == node.category) {
                Some((_, members)) => members.push(idx),
                None => groups.push((node.category.clone(), vec![idx])),
            }
        }
        groups
    }

    /// Connected components, ordered by their first node
    pub fn connected_components(&self) -> Vec<Vec<NodeIndex>> {
        let mut seen: HashSet<NodeIndex> = HashSet::new();
        let mut components = Vec::new();

        for start in self.graph.node_indices() {
            if seen.contains(&start) {
                continue;
            }
            let mut component = Vec::new();
            let mut bfs = Bfs::new(&self.graph, start);
            while let Some(idx) = bfs.next(&self.graph) {
                seen.insert(idx);
                component.push(idx);
            }
            component.sort();
            components.push(component);
        }

        components
    }

    /// Nodes by descending size; equal sizes keep insertion order
    pub fn nodes_by_size(&self) -> Vec<NodeIndex> {
        let mut nodes: Vec<NodeIndex> = self.graph.node_indices().collect();
        nodes.sort_by(|a, b| self.graph[*b].size.cmp(&self.graph[*a].size));
        nodes
    }
}
