//! Energy-minimizing layout.
//!
//! The objective over node positions `p` is
//!
//! ```text
//! E(p) =   Σ_{i<j} 1 / max(d_ij, min_distance)
//!        - Σ_{(i,j) ∈ edges} a·w_ij / (d_ij + distance_epsilon)
//!        + centering · Σ_i s_i · |p_i - centroid|²
//! ```
//!
//! where `w_ij` is the edge weight divided by the heaviest edge weight, `a` the
//! attraction strength and `s_i` the total incident weight of node `i`. It is
//! minimized by gradient descent with a backtracking line search.

use super::{rescale, LayoutInput, Point};
use ndarray::Array2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Sufficient-decrease constant of the Armijo condition
const ARMIJO: f64 = 1e-4;
const MIN_STEP: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergyConfig {
    pub max_iterations: usize,

    /// Stop once the gradient norm per node falls below this
    pub tolerance: f64,

    /// Repulsion is capped at `1 / min_distance`
    pub min_distance: f64,

    /// Added to distances in the attraction term
    pub distance_epsilon: f64,

    /// Attraction of the heaviest edge
    pub attraction: f64,

    /// Weight of the pull toward the centroid
    pub centering: f64,

    pub seed: u64,

    /// Half-width of the square the result is scaled into
    pub scale: f64,

    /// Wall-clock budget in milliseconds (None = unbounded)
    pub max_duration_ms: Option<u64>,
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            max_iterations: 500,
            tolerance: 1e-4,
            min_distance: 0.05,
            distance_epsilon: 0.5,
            attraction: 4.0,
            centering: 0.01,
            seed: 42,
            scale: 1.0,
            max_duration_ms: None,
        }
    }
}

impl EnergyConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_iterations == 0 {
            return Err("energy.max_iterations must be > 0".to_string());
        }
        let positive = [
            ("tolerance", self.tolerance),
            ("min_distance", self.min_distance),
            ("distance_epsilon", self.distance_epsilon),
            ("scale", self.scale),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(format!("energy.{name} must be positive, got {value}"));
            }
        }
        let non_negative = [("attraction", self.attraction), ("centering", self.centering)];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(format!("energy.{name} must be >= 0, got {value}"));
            }
        }
        Ok(())
    }
}

pub(crate) struct EnergyRun {
    pub points: Vec<Point>,
    pub iterations: usize,
    pub converged: bool,
    pub energy: f64,
}

struct Objective<'a> {
    n: usize,
    edges: Vec<(usize, usize, f64)>,
    strength: Vec<f64>,
    config: &'a EnergyConfig,
}

impl<'a> Objective<'a> {
    fn new(input: &LayoutInput, config: &'a EnergyConfig) -> Self {
        let max_weight = input
            .edges
            .iter()
            .map(|&(_, _, w)| w)
            .fold(0.0_f64, f64::max);
        let edges = input
            .edges
            .iter()
            .map(|&(a, b, w)| {
                let w = if max_weight > 0.0 { w / max_weight } else { 0.0 };
                (a, b, config.attraction * w)
            })
            .collect();
        Self {
            n: input.n,
            edges,
            strength: input.incident_weights(),
            config,
        }
    }

    fn centroid(&self, pos: &Array2<f64>) -> (f64, f64) {
        let n = self.n as f64;
        let cx = pos.column(0).sum() / n;
        let cy = pos.column(1).sum() / n;
        (cx, cy)
    }

    fn energy(&self, pos: &Array2<f64>) -> f64 {
        let cfg = self.config;
        let mut energy = 0.0;

        for i in 0..self.n {
            for j in i + 1..self.n {
                let d = distance(pos, i, j);
                energy += 1.0 / d.max(cfg.min_distance);
            }
        }

        for &(a, b, w) in &self.edges {
            energy -= w / (distance(pos, a, b) + cfg.distance_epsilon);
        }

        let (cx, cy) = self.centroid(pos);
        for i in 0..self.n {
            let dx = pos[[i, 0]] - cx;
            let dy = pos[[i, 1]] - cy;
            energy += cfg.centering * self.strength[i] * (dx * dx + dy * dy);
        }

        energy
    }

    fn gradient(&self, pos: &Array2<f64>) -> Array2<f64> {
        let cfg = self.config;
        let mut grad = Array2::<f64>::zeros((self.n, 2));

        // repulsion: d/dp_i (1/d) = -(p_i - p_j) / d³, flat inside min_distance
        for i in 0..self.n {
            for j in i + 1..self.n {
                let d = distance(pos, i, j);
                if d <= cfg.min_distance {
                    continue;
                }
                let factor = -1.0 / (d * d * d);
                for axis in 0..2 {
                    let g = factor * (pos[[i, axis]] - pos[[j, axis]]);
                    grad[[i, axis]] += g;
                    grad[[j, axis]] -= g;
                }
            }
        }

        // attraction: d/dp_a (-w/(d+ε)) = w/(d+ε)² · (p_a - p_b)/d
        for &(a, b, w) in &self.edges {
            let d = distance(pos, a, b);
            if d == 0.0 {
                continue;
            }
            let shifted = d + cfg.distance_epsilon;
            let factor = w / (shifted * shifted * d);
            for axis in 0..2 {
                let g = factor * (pos[[a, axis]] - pos[[b, axis]]);
                grad[[a, axis]] += g;
                grad[[b, axis]] -= g;
            }
        }

        // centering: 2c·(s_k·(p_k - c̄) - mean_i(s_i·(p_i - c̄)))
        let (cx, cy) = self.centroid(pos);
        let n = self.n as f64;
        let mut mean = [0.0_f64; 2];
        for i in 0..self.n {
            mean[0] += self.strength[i] * (pos[[i, 0]] - cx) / n;
            mean[1] += self.strength[i] * (pos[[i, 1]] - cy) / n;
        }
        let center = [cx, cy];
        for i in 0..self.n {
            for axis in 0..2 {
                grad[[i, axis]] += 2.0
                    * cfg.centering
                    * (self.strength[i] * (pos[[i, axis]] - center[axis]) - mean[axis]);
            }
        }

        grad
    }
}

fn distance(pos: &Array2<f64>, i: usize, j: usize) -> f64 {
    (pos[[i, 0]] - pos[[j, 0]]).hypot(pos[[i, 1]] - pos[[j, 1]])
}

fn norm(values: &Array2<f64>) -> f64 {
    values.iter().map(|v| v * v).sum::<f64>().sqrt()
}

/// Minimize the energy from a seeded random start.
///
/// Stops when the gradient is small, the iteration or time budget runs out, or
/// the line search can no longer make progress; the lowest-energy positions seen
/// are returned in every case.
pub(crate) fn minimize(input: &LayoutInput, config: &EnergyConfig) -> EnergyRun {
    let n = input.n;
    if n <= 1 {
        return EnergyRun {
            points: vec![Point::ORIGIN; n],
            iterations: 0,
            converged: true,
            energy: 0.0,
        };
    }

    let objective = Objective::new(input, config);
    let deadline = config
        .max_duration_ms
        .map(|ms| Instant::now() + Duration::from_millis(ms));

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let spread = (n as f64).sqrt();
    let mut pos = Array2::from_shape_fn((n, 2), |_| rng.gen_range(-spread..spread));
    let mut energy = objective.energy(&pos);
    let mut best = (energy, pos.clone());

    let mut step = 1.0;
    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iterations {
        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            log::debug!("Energy layout hit its time budget after {iterations} iterations");
            break;
        }

        let grad = objective.gradient(&pos);
        let grad_norm = norm(&grad);
        if grad_norm / (n as f64) < config.tolerance {
            converged = true;
            break;
        }
        iterations += 1;

        let mut accepted = false;
        while step >= MIN_STEP {
            let candidate = &pos - &(&grad * step);
            let candidate_energy = objective.energy(&candidate);
            if candidate_energy.is_finite()
                && candidate_energy <= energy - ARMIJO * step * grad_norm * grad_norm
            {
                pos = candidate;
                energy = candidate_energy;
                step *= 1.5;
                accepted = true;
                break;
            }
            step *= 0.5;
        }

        if energy < best.0 {
            best = (energy, pos.clone());
        }
        if !accepted {
            log::debug!("Energy line search stalled after {iterations} iterations");
            break;
        }
    }

    let (energy, pos) = best;
    let mut points: Vec<Point> = pos
        .rows()
        .into_iter()
        .map(|row| Point::new(row[0], row[1]))
        .collect();
    rescale(&mut points, config.scale);

    EnergyRun {
        points,
        iterations,
        converged,
        energy,
    }
}
