//! Node placement for mind map graphs.
//!
//! Three algorithms share one output shape, a [`PositionMap`] plus a [`LayoutReport`]:
//!
//! - [`LayoutAlgorithm::Spring`]: Fruchterman–Reingold simulation, fixed cooling schedule
//! - [`LayoutAlgorithm::Energy`]: gradient descent on a repulsion/attraction/centering energy
//! - [`LayoutAlgorithm::Partitioned`]: independent local layouts per node group, composed
//!   on one canvas

mod energy;
mod partition;
mod spring;

pub use energy::EnergyConfig;
pub use partition::{GroupArrangement, Grouping, LocalLayout, PartitionConfig};
pub use spring::SpringConfig;

use crate::error::{GraphError, Result};
use crate::types::MindMapGraph;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// 2D coordinate
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Word → position, one entry per laid out node
pub type PositionMap = BTreeMap<String, Point>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutAlgorithm {
    #[default]
    Spring,
    Energy,
    Partitioned,
}

/// How a layout run ended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutReport {
    pub algorithm: LayoutAlgorithm,

    /// Iterations performed (summed over groups for partitioned layouts)
    pub iterations: usize,

    /// Whether the optimizer met its stopping tolerance. Fixed-schedule
    /// simulations always report true.
    pub converged: bool,

    /// Final objective value of the energy layout
    pub energy: Option<f64>,
}

impl LayoutReport {
    fn empty(algorithm: LayoutAlgorithm) -> Self {
        Self {
            algorithm,
            iterations: 0,
            converged: true,
            energy: None,
        }
    }
}

/// Layout settings for every algorithm; only the selected one is used
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub algorithm: LayoutAlgorithm,
    pub spring: SpringConfig,
    pub energy: EnergyConfig,
    pub partition: PartitionConfig,
}

impl LayoutConfig {
    pub fn with_algorithm(algorithm: LayoutAlgorithm) -> Self {
        Self {
            algorithm,
            ..Default::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        self.spring.validate()?;
        self.energy.validate()?;
        self.partition.validate()?;
        Ok(())
    }
}

/// Positions of every node plus how the run went
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub positions: PositionMap,
    pub report: LayoutReport,
}

/// Computes node positions for a [`MindMapGraph`]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Result<Self> {
        config.validate().map_err(GraphError::InvalidConfig)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay out every node; a graph without edges gives an empty map
    pub fn layout(&self, graph: &MindMapGraph) -> Layout {
        let algorithm = self.config.algorithm;
        if graph.edge_count() == 0 {
            log::debug!("Graph has no edges, nothing to lay out");
            return Layout {
                positions: PositionMap::new(),
                report: LayoutReport::empty(algorithm),
            };
        }

        let (points, report) = match algorithm {
            LayoutAlgorithm::Spring => {
                let (input, _) = LayoutInput::from_graph(graph);
                let run = spring::layout(&input, &self.config.spring, self.config.spring.scale);
                (
                    run.points,
                    LayoutReport {
                        algorithm,
                        iterations: run.iterations,
                        converged: true,
                        energy: None,
                    },
                )
            }
            LayoutAlgorithm::Energy => {
                let (input, _) = LayoutInput::from_graph(graph);
                let run = energy::minimize(&input, &self.config.energy);
                (
                    run.points,
                    LayoutReport {
                        algorithm,
                        iterations: run.iterations,
                        converged: run.converged,
                        energy: Some(run.energy),
                    },
                )
            }
            LayoutAlgorithm::Partitioned => {
                let run = partition::layout(graph, &self.config.partition, &self.config.spring);
                (
                    run.points,
                    LayoutReport {
                        algorithm,
                        iterations: run.iterations,
                        converged: true,
                        energy: None,
                    },
                )
            }
        };

        if !report.converged {
            log::warn!(
                "{:?} layout did not converge after {} iterations, using best positions found",
                algorithm,
                report.iterations
            );
        }

        let positions = graph
            .graph
            .node_indices()
            .zip(points)
            .map(|(idx, point)| (graph.graph[idx].word.clone(), point))
            .collect();

        Layout { positions, report }
    }
}

/// Lay out `graph` with `config`
pub fn layout(graph: &MindMapGraph, config: &LayoutConfig) -> Result<Layout> {
    Ok(LayoutEngine::new(config.clone())?.layout(graph))
}

/// Index-based view of (part of) a graph handed to the layout algorithms
#[derive(Debug, Clone, Default)]
pub(crate) struct LayoutInput {
    pub n: usize,
    pub edges: Vec<(usize, usize, f64)>,
}

impl LayoutInput {
    /// All nodes, in `node_indices` order
    pub(crate) fn from_graph(graph: &MindMapGraph) -> (Self, Vec<NodeIndex>) {
        let members: Vec<NodeIndex> = graph.graph.node_indices().collect();
        (Self::induced(graph, &members), members)
    }

    /// Subgraph induced by `members`; local index i is `members[i]`
    pub(crate) fn induced(graph: &MindMapGraph, members: &[NodeIndex]) -> Self {
        let local: HashMap<NodeIndex, usize> =
            members.iter().enumerate().map(|(i, &idx)| (idx, i)).collect();
        let edges = graph
            .graph
            .edge_references()
            .filter_map(|edge| {
                let a = *local.get(&edge.source())?;
                let b = *local.get(&edge.target())?;
                Some((a, b, edge.weight().weight))
            })
            .collect();
        Self {
            n: members.len(),
            edges,
        }
    }

    /// Summed weight of the edges touching each node
    pub(crate) fn incident_weights(&self) -> Vec<f64> {
        let mut weights = vec![0.0; self.n];
        for &(a, b, w) in &self.edges {
            weights[a] += w;
            weights[b] += w;
        }
        weights
    }
}

/// Center `points` on the origin and scale so the largest coordinate is `scale`
pub(crate) fn rescale(points: &mut [Point], scale: f64) {
    if points.is_empty() {
        return;
    }
    let n = points.len() as f64;
    let cx = points.iter().map(|p| p.x).sum::<f64>() / n;
    let cy = points.iter().map(|p| p.y).sum::<f64>() / n;

    let mut limit: f64 = 0.0;
    for p in points.iter_mut() {
        p.x -= cx;
        p.y -= cy;
        limit = limit.max(p.x.abs()).max(p.y.abs());
    }

    if limit > 0.0 {
        let factor = scale / limit;
        for p in points.iter_mut() {
            p.x *= factor;
            p.y *= factor;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_graph;
    use crate::links::LogicalLink;

    fn sample_graph() -> MindMapGraph {
        let link = |s: &str, t: &str, w: f64, sc: &str, tc: &str| LogicalLink {
            source: s.to_string(),
            target: t.to_string(),
            source_category: sc.to_string(),
            target_category: tc.to_string(),
            weight: w,
        };
        build_graph(
            &[
                link("cat", "mat", 3.0, "animal", "furniture"),
                link("cat", "dog", 2.0, "animal", "animal"),
                link("dog", "bone", 1.5, "animal", "food"),
                link("mat", "rug", 1.0, "furniture", "furniture"),
                link("sun", "moon", 1.0, "sky", "sky"),
            ],
            50,
        )
        .unwrap()
    }

    fn assert_complete(layout: &Layout, graph: &MindMapGraph) {
        assert_eq!(layout.positions.len(), graph.node_count());
        for (word, point) in &layout.positions {
            assert!(graph.find_node(word).is_some());
            assert!(point.x.is_finite() && point.y.is_finite(), "{word}: {point:?}");
        }
        let points: Vec<&Point> = layout.positions.values().collect();
        for i in 0..points.len() {
            for j in i + 1..points.len() {
                assert!(points[i].distance(points[j]) > 1e-6, "overlapping nodes");
            }
        }
    }

    #[test]
    fn test_every_algorithm_places_every_node() {
        let graph = sample_graph();
        for algorithm in [
            LayoutAlgorithm::Spring,
            LayoutAlgorithm::Energy,
            LayoutAlgorithm::Partitioned,
        ] {
            let layout = layout(&graph, &LayoutConfig::with_algorithm(algorithm)).unwrap();
            assert_eq!(layout.report.algorithm, algorithm);
            assert_complete(&layout, &graph);
        }
    }

    #[test]
    fn test_empty_graph_gives_empty_map() {
        let layout = layout(&MindMapGraph::new(), &LayoutConfig::default()).unwrap();
        assert!(layout.positions.is_empty());
        assert_eq!(layout.report.iterations, 0);
    }

    #[test]
    fn test_seeded_layout_is_reproducible() {
        let graph = sample_graph();
        for algorithm in [LayoutAlgorithm::Spring, LayoutAlgorithm::Energy] {
            let config = LayoutConfig::with_algorithm(algorithm);
            let first = layout(&graph, &config).unwrap();
            let second = layout(&graph, &config).unwrap();
            assert_eq!(first.positions, second.positions);
        }
    }

    #[test]
    fn test_rescale() {
        let mut points = vec![Point::new(1.0, 1.0), Point::new(3.0, 5.0)];
        rescale(&mut points, 2.0);
        assert_eq!(points, vec![Point::new(-1.0, -2.0), Point::new(1.0, 2.0)]);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = LayoutConfig::default();
        config.spring.iterations = 0;
        assert!(matches!(
            LayoutEngine::new(config),
            Err(GraphError::InvalidConfig(_))
        ));
    }
}
