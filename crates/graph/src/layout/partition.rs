use super::spring::{self, SpringConfig};
use super::{LayoutInput, Point};
use crate::types::MindMapGraph;
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::f64::consts::TAU;

/// How nodes are split into independently laid out groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grouping {
    #[default]
    Category,
    ConnectedComponent,
    /// Hubs (degree centrality >= mean) and everything else
    Centrality,
}

/// Placement of nodes inside one group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocalLayout {
    Circular,
    #[default]
    Spring,
}

/// Placement of the group centers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupArrangement {
    /// Centers on a circle wide enough that neighbouring groups do not touch
    #[default]
    Circle,
    /// Centers along the x axis, one widest group plus `spacing` apart
    Row,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartitionConfig {
    pub grouping: Grouping,
    pub local: LocalLayout,
    pub arrangement: GroupArrangement,

    /// Gap between neighbouring groups
    pub spacing: f64,

    /// Radius of each group's local layout
    pub group_scale: f64,

    /// Fraction of the way a peripheral group moves toward the global centroid,
    /// multiplied by its share of the total incident weight
    pub nudge: f64,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            grouping: Grouping::Category,
            local: LocalLayout::Spring,
            arrangement: GroupArrangement::Circle,
            spacing: 10.0,
            group_scale: 5.0,
            nudge: 0.5,
        }
    }
}

impl PartitionConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(self.spacing.is_finite() && self.spacing > 0.0) {
            return Err(format!(
                "partition.spacing must be positive, got {}",
                self.spacing
            ));
        }
        if !(self.group_scale.is_finite() && self.group_scale > 0.0) {
            return Err(format!(
                "partition.group_scale must be positive, got {}",
                self.group_scale
            ));
        }
        if !(0.0..=1.0).contains(&self.nudge) {
            return Err(format!(
                "partition.nudge must be within [0, 1], got {}",
                self.nudge
            ));
        }
        Ok(())
    }
}

pub(crate) struct PartitionRun {
    /// Positions in `node_indices` order
    pub points: Vec<Point>,
    pub iterations: usize,
}

struct Group {
    members: Vec<NodeIndex>,
    local: Vec<Point>,
    extent: f64,
    weight: f64,
    peripheral: bool,
}

/// Lay out each group on its own and place the groups side by side
pub(crate) fn layout(
    graph: &MindMapGraph,
    config: &PartitionConfig,
    spring_config: &SpringConfig,
) -> PartitionRun {
    let centrality: HashMap<NodeIndex, f64> = graph
        .graph
        .node_indices()
        .map(|idx| (idx, graph.degree_centrality(idx)))
        .collect();
    let mean_centrality = if centrality.is_empty() {
        0.0
    } else {
        centrality.values().sum::<f64>() / centrality.len() as f64
    };

    let mut iterations = 0;
    let mut groups: Vec<Group> = Vec::new();
    for (i, members) in split(graph, config.grouping, &centrality, mean_centrality)
        .into_iter()
        .enumerate()
    {
        let local = match config.local {
            LocalLayout::Circular => circle(members.len(), config.group_scale),
            LocalLayout::Spring => {
                let input = LayoutInput::induced(graph, &members);
                let seed = spring_config.seed.wrapping_add(i as u64);
                let run = spring::layout_seeded(&input, spring_config, seed, config.group_scale);
                iterations += run.iterations;
                run.points
            }
        };
        let extent = local
            .iter()
            .map(|p| p.distance(&Point::ORIGIN))
            .fold(0.0_f64, f64::max);
        let weight: f64 = members.iter().map(|&idx| graph.incident_weight_of(idx)).sum();
        let group_centrality =
            members.iter().map(|idx| centrality[idx]).sum::<f64>() / members.len() as f64;

        groups.push(Group {
            peripheral: group_centrality < mean_centrality,
            members,
            local,
            extent,
            weight,
        });
    }

    let mut centers = arrange(&groups, config);
    nudge(&mut centers, &groups, config.nudge);

    log::debug!(
        "Partitioned layout: {} groups by {:?}, {} peripheral",
        groups.len(),
        config.grouping,
        groups.iter().filter(|g| g.peripheral).count()
    );

    let mut positions: HashMap<NodeIndex, Point> = HashMap::new();
    for (group, center) in groups.iter().zip(&centers) {
        for (&idx, p) in group.members.iter().zip(&group.local) {
            positions.insert(idx, Point::new(center.x + p.x, center.y + p.y));
        }
    }

    let points = graph
        .graph
        .node_indices()
        .map(|idx| positions.get(&idx).copied().unwrap_or(Point::ORIGIN))
        .collect();

    PartitionRun { points, iterations }
}

fn split(
    graph: &MindMapGraph,
    grouping: Grouping,
    centrality: &HashMap<NodeIndex, f64>,
    mean_centrality: f64,
) -> Vec<Vec<NodeIndex>> {
    match grouping {
        Grouping::Category => graph
            .partition_by_category()
            .into_iter()
            .map(|(_, members)| members)
            .collect(),
        Grouping::ConnectedComponent => graph.connected_components(),
        Grouping::Centrality => {
            let (hubs, rest): (Vec<NodeIndex>, Vec<NodeIndex>) = graph
                .graph
                .node_indices()
                .partition(|idx| centrality[idx] >= mean_centrality);
            [hubs, rest].into_iter().filter(|g| !g.is_empty()).collect()
        }
    }
}

/// `n` points evenly spaced on a circle of radius `radius`
fn circle(n: usize, radius: f64) -> Vec<Point> {
    if n == 1 {
        return vec![Point::ORIGIN];
    }
    (0..n)
        .map(|i| {
            let angle = TAU * i as f64 / n as f64;
            Point::new(radius * angle.cos(), radius * angle.sin())
        })
        .collect()
}

fn arrange(groups: &[Group], config: &PartitionConfig) -> Vec<Point> {
    let count = groups.len();
    match config.arrangement {
        GroupArrangement::Row => {
            let step = config.spacing.max(
                groups
                    .iter()
                    .map(|g| 2.0 * g.extent + config.spacing)
                    .fold(0.0_f64, f64::max),
            );
            (0..count)
                .map(|i| Point::new(i as f64 * step, 0.0))
                .collect()
        }
        GroupArrangement::Circle => {
            if count <= 1 {
                return vec![Point::ORIGIN; count];
            }
            let widest = groups.iter().map(|g| g.extent).fold(0.0_f64, f64::max);
            // adjacent centers are 2R·sin(π/count) apart
            let chord = 2.0 * widest + config.spacing;
            let radius = chord / (2.0 * (TAU / (2.0 * count as f64)).sin());
            circle(count, radius)
        }
    }
}

/// Pull peripheral group centers toward the centroid of all centers
fn nudge(centers: &mut [Point], groups: &[Group], strength: f64) {
    let total: f64 = groups.iter().map(|g| g.weight).sum();
    if centers.is_empty() || total <= 0.0 || strength == 0.0 {
        return;
    }
    let n = centers.len() as f64;
    let centroid = Point::new(
        centers.iter().map(|c| c.x).sum::<f64>() / n,
        centers.iter().map(|c| c.y).sum::<f64>() / n,
    );
    for (center, group) in centers.iter_mut().zip(groups) {
        if !group.peripheral {
            continue;
        }
        let fraction = (strength * group.weight / total).clamp(0.0, 1.0);
        center.x += (centroid.x - center.x) * fraction;
        center.y += (centroid.y - center.y) * fraction;
    }
}
