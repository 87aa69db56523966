use super::{rescale, LayoutInput, Point};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Lower bound for distances in force computations
const MIN_DISTANCE: f64 = 0.01;

/// Angle between the push directions of successive coincident pairs
const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

/// Fruchterman–Reingold settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringConfig {
    pub iterations: usize,
    pub seed: u64,

    /// Half-width of the square the result is scaled into
    pub scale: f64,

    /// Stop early once the mean node displacement drops below this
    pub threshold: f64,

    /// Optimal edge length (None = `1 / sqrt(n)`)
    pub k: Option<f64>,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            iterations: 50,
            seed: 42,
            scale: 1.0,
            threshold: 1e-4,
            k: None,
        }
    }
}

impl SpringConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.iterations == 0 {
            return Err("spring.iterations must be > 0".to_string());
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(format!("spring.scale must be positive, got {}", self.scale));
        }
        if !(self.threshold.is_finite() && self.threshold >= 0.0) {
            return Err(format!(
                "spring.threshold must be >= 0, got {}",
                self.threshold
            ));
        }
        if let Some(k) = self.k {
            if !(k.is_finite() && k > 0.0) {
                return Err(format!("spring.k must be positive, got {k}"));
            }
        }
        Ok(())
    }
}

pub(crate) struct SpringRun {
    pub points: Vec<Point>,
    pub iterations: usize,
}

/// Run the simulation and return positions centered on the origin within `[-scale, scale]`
pub(crate) fn layout(input: &LayoutInput, config: &SpringConfig, scale: f64) -> SpringRun {
    layout_seeded(input, config, config.seed, scale)
}

pub(crate) fn layout_seeded(
    input: &LayoutInput,
    config: &SpringConfig,
    seed: u64,
    scale: f64,
) -> SpringRun {
    let n = input.n;
    if n <= 1 {
        return SpringRun {
            points: vec![Point::ORIGIN; n],
            iterations: 0,
        };
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut pos: Vec<Point> = (0..n)
        .map(|_| Point::new(rng.gen::<f64>(), rng.gen::<f64>()))
        .collect();

    let k = config.k.unwrap_or_else(|| (1.0 / n as f64).sqrt());
    let mut temperature = initial_temperature(&pos);
    let cooling = temperature / (config.iterations + 1) as f64;

    let mut iterations = 0;
    let mut disp = vec![(0.0_f64, 0.0_f64); n];

    for _ in 0..config.iterations {
        iterations += 1;
        disp.iter_mut().for_each(|d| *d = (0.0, 0.0));

        // repulsion between every pair
        for i in 0..n {
            for j in i + 1..n {
                let (dx, dy) = separation(&pos[i], &pos[j], i, j);
                let dist = dx.hypot(dy).max(MIN_DISTANCE);
                let force = k * k / (dist * dist);
                disp[i].0 += dx * force;
                disp[i].1 += dy * force;
                disp[j].0 -= dx * force;
                disp[j].1 -= dy * force;
            }
        }

        // weighted attraction along edges
        for &(a, b, weight) in &input.edges {
            let dx = pos[a].x - pos[b].x;
            let dy = pos[a].y - pos[b].y;
            let dist = dx.hypot(dy).max(MIN_DISTANCE);
            let force = weight * dist / k;
            disp[a].0 -= dx * force;
            disp[a].1 -= dy * force;
            disp[b].0 += dx * force;
            disp[b].1 += dy * force;
        }

        let mut moved = 0.0;
        for (p, &(dx, dy)) in pos.iter_mut().zip(&disp) {
            let length = dx.hypot(dy).max(MIN_DISTANCE);
            let step_x = dx * temperature / length;
            let step_y = dy * temperature / length;
            p.x += step_x;
            p.y += step_y;
            moved += step_x.hypot(step_y);
        }

        temperature -= cooling;
        if moved / (n as f64) < config.threshold {
            break;
        }
    }

    rescale(&mut pos, scale);
    SpringRun {
        points: pos,
        iterations,
    }
}

/// `a - b`, or a short fixed offset per pair when the two points coincide
fn separation(a: &Point, b: &Point, i: usize, j: usize) -> (f64, f64) {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    if dx != 0.0 || dy != 0.0 {
        return (dx, dy);
    }
    let angle = (i + j) as f64 * GOLDEN_ANGLE;
    (MIN_DISTANCE * angle.cos(), MIN_DISTANCE * angle.sin())
}

fn initial_temperature(pos: &[Point]) -> f64 {
    let span = |values: &mut dyn Iterator<Item = f64>| {
        let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        hi - lo
    };
    let width = span(&mut pos.iter().map(|p| p.x));
    let height = span(&mut pos.iter().map(|p| p.y));
    width.max(height) * 0.1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(n: usize) -> LayoutInput {
        LayoutInput {
            n,
            edges: (1..n).map(|i| (i - 1, i, 1.0)).collect(),
        }
    }

    #[test]
    fn test_points_within_scale() {
        let run = layout(&path(6), &SpringConfig::default(), 2.0);
        assert_eq!(run.points.len(), 6);
        for p in &run.points {
            assert!(p.x.abs() <= 2.0 + 1e-9 && p.y.abs() <= 2.0 + 1e-9, "{p:?}");
        }
        assert!(run.iterations <= 50);
    }

    #[test]
    fn test_connected_nodes_end_up_closer() {
        // 0-1 heavily connected, 2 only repelled
        let input = LayoutInput {
            n: 3,
            edges: vec![(0, 1, 5.0)],
        };
        let run = layout(&input, &SpringConfig::default(), 1.0);
        let close = run.points[0].distance(&run.points[1]);
        assert!(close < run.points[0].distance(&run.points[2]));
        assert!(close < run.points[1].distance(&run.points[2]));
    }

    #[test]
    fn test_single_node_sits_at_origin() {
        let run = layout(&LayoutInput { n: 1, edges: vec![] }, &SpringConfig::default(), 1.0);
        assert_eq!(run.points, vec![Point::ORIGIN]);
        assert_eq!(run.iterations, 0);
    }

    #[test]
    fn test_coincident_nodes_are_pushed_apart() {
        let (dx, dy) = separation(&Point::ORIGIN, &Point::ORIGIN, 0, 1);
        assert!((dx.hypot(dy) - MIN_DISTANCE).abs() < 1e-12);
        assert_eq!(separation(&Point::ORIGIN, &Point::ORIGIN, 0, 1), (dx, dy));
        assert_ne!(separation(&Point::ORIGIN, &Point::ORIGIN, 0, 2), (dx, dy));

        let apart = separation(&Point::new(1.0, 0.5), &Point::ORIGIN, 0, 1);
        assert_eq!(apart, (1.0, 0.5));
    }

    #[test]
    fn test_seed_changes_result() {
        let config = SpringConfig::default();
        let a = layout_seeded(&path(5), &config, 1, 1.0);
        let b = layout_seeded(&path(5), &config, 2, 1.0);
        assert_ne!(a.points, b.points);
    }
}
