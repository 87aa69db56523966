use mindmap_graph::{
    LayoutAlgorithm, LayoutReport, LogicalLink, MindMapGraph, Point, PositionMap,
};
use mindmap_text::Language;
use serde::{Deserialize, Serialize};

/// Result of one pipeline run
#[derive(Debug, Clone)]
pub struct MindMap {
    pub language: Language,

    /// Ranked links the graph was built from, heaviest first
    pub links: Vec<LogicalLink>,

    pub graph: MindMapGraph,
    pub positions: PositionMap,
    pub report: LayoutReport,
}

impl MindMap {
    pub(crate) fn empty(language: Language, algorithm: LayoutAlgorithm) -> Self {
        Self {
            language,
            links: Vec::new(),
            graph: MindMapGraph::new(),
            positions: PositionMap::new(),
            report: LayoutReport {
                algorithm,
                iterations: 0,
                converged: true,
                energy: None,
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    /// Flatten into plain records for serialization
    pub fn view(&self) -> MindMapView {
        let nodes = self
            .graph
            .nodes()
            .map(|(_, node)| {
                let point = self.positions.get(&node.word).copied().unwrap_or_default();
                NodeView {
                    word: node.word.clone(),
                    category: node.category.clone(),
                    size: node.size,
                    x: point.x,
                    y: point.y,
                }
            })
            .collect();

        let edges = self
            .graph
            .edges()
            .map(|(source, target, weight)| EdgeView {
                source: source.to_string(),
                target: target.to_string(),
                weight,
            })
            .collect();

        MindMapView {
            language: self.language,
            nodes,
            edges,
            layout: self.report.clone(),
        }
    }
}

/// Serializable mind map: nodes with positions, weighted edges and the layout report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MindMapView {
    pub language: Language,
    pub nodes: Vec<NodeView>,
    pub edges: Vec<EdgeView>,
    pub layout: LayoutReport,
}

impl MindMapView {
    pub fn node(&self, word: &str) -> Option<&NodeView> {
        self.nodes.iter().find(|node| node.word == word)
    }

    pub fn position(&self, word: &str) -> Option<Point> {
        self.node(word).map(|node| Point::new(node.x, node.y))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeView {
    pub word: String,
    pub category: String,
    pub size: usize,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeView {
    pub source: String,
    pub target: String,
    pub weight: f64,
}

#[cfg(test)]
mod tests {
    use crate::{generate_mind_map, MindMapOptions};
    use serde_json::json;

    #[test]
    fn test_view_json_shape() {
        let map = generate_mind_map(
            "The cat sat on the mat. The cat likes the mat.",
            "en",
            &MindMapOptions::default(),
        )
        .unwrap();
        let view = map.view();
        assert_eq!(view.nodes.len(), map.graph.node_count());
        assert_eq!(view.edges.len(), map.graph.edge_count());
        assert_eq!(view.position("cat"), map.positions.get("cat").copied());

        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["language"], json!("en"));
        assert_eq!(value["layout"]["algorithm"], json!("spring"));
        let cat = value["nodes"]
            .as_array()
            .unwrap()
            .iter()
            .find(|node| node["word"] == "cat")
            .unwrap();
        assert_eq!(cat["category"], json!("unknown"));
        assert_eq!(cat["size"], json!(3));
        assert!(cat["x"].is_f64() && cat["y"].is_f64());
    }

    #[test]
    fn test_empty_view() {
        let view = generate_mind_map("", "en", &MindMapOptions::default())
            .unwrap()
            .view();
        assert!(view.nodes.is_empty() && view.edges.is_empty());
    }
}
