//! Force-directed vertex placement for renderers.
//!
//! Vertices repel each other and edges pull their endpoints together
//! (Fruchterman–Reingold). Movement per iteration is capped by a temperature
//! that cools linearly to zero. Final positions are centred on the origin and
//! scaled so the largest coordinate magnitude is `1.0`.

use rand::Rng;
use tracing::instrument;

use crate::{graph::Graph, rng::seeded_rng};

/// Iteration count used when callers do not choose one.
pub const DEFAULT_LAYOUT_ITERATIONS: usize = 50;

const MIN_DISTANCE: f64 = 0.01;
const INITIAL_TEMPERATURE: f64 = 0.1;

/// A point in the plane.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    x: f64,
    y: f64,
}

impl Position {
    /// Creates a position from its coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the horizontal coordinate.
    #[must_use]
    #[rustfmt::skip]
    pub fn x(&self) -> f64 { self.x }

    /// Returns the vertical coordinate.
    #[must_use]
    #[rustfmt::skip]
    pub fn y(&self) -> f64 { self.y }

    fn norm(self) -> f64 {
        self.x.hypot(self.y)
    }
}

/// Positions indexed by vertex.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Layout {
    positions: Vec<Position>,
}

impl Layout {
    /// Returns every position, indexed by vertex.
    #[must_use]
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Returns the position of `vertex`, if it exists.
    #[must_use]
    pub fn position(&self, vertex: usize) -> Option<Position> {
        self.positions.get(vertex).copied()
    }

    /// Returns the number of placed vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns `true` when no vertices were placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Lays out `graph` with a seeded spring embedding.
///
/// # Examples
/// ```
/// use postman_core::{Graph, spring_layout};
///
/// let triangle = Graph::from_edges(3, [(0, 1), (1, 2), (2, 0)])?;
/// let layout = spring_layout(&triangle, Some(7), 50);
/// assert_eq!(layout.len(), 3);
/// assert!(layout.positions().iter().all(|p| p.x().abs() <= 1.0 && p.y().abs() <= 1.0));
/// # Ok::<(), postman_core::PostmanError>(())
/// ```
#[must_use]
pub fn spring_layout(graph: &Graph, seed: Option<u64>, iterations: usize) -> Layout {
    let mut rng = seeded_rng(seed);
    spring_layout_with_rng(graph, &mut rng, iterations)
}

/// Lays out `graph` drawing the initial placement from `rng`.
#[must_use]
#[instrument(
    name = "core.layout",
    skip(graph, rng),
    fields(vertices = graph.vertex_count(), edges = graph.edge_count()),
)]
pub fn spring_layout_with_rng<R: Rng + ?Sized>(
    graph: &Graph,
    rng: &mut R,
    iterations: usize,
) -> Layout {
    let count = graph.vertex_count();
    match count {
        0 => return Layout::default(),
        1 => {
            return Layout {
                positions: vec![Position::default()],
            };
        }
        _ => {}
    }

    let mut positions: Vec<Position> = (0..count)
        .map(|_| Position::new(rng.r#gen::<f64>(), rng.r#gen::<f64>()))
        .collect();
    // Optimal pairwise distance for a unit square.
    let k = (1.0 / count as f64).sqrt();
    let mut temperature = INITIAL_TEMPERATURE * extent(&positions);
    let cooling = temperature / (iterations as f64 + 1.0);

    let mut displacement = vec![Position::default(); count];
    for _ in 0..iterations {
        displacement.fill(Position::default());
        apply_repulsion(&positions, &mut displacement, k);
        apply_attraction(graph, &positions, &mut displacement, k);
        for (position, shift) in positions.iter_mut().zip(&displacement) {
            let length = shift.norm().max(MIN_DISTANCE);
            let step = length.min(temperature) / length;
            position.x += shift.x * step;
            position.y += shift.y * step;
        }
        temperature -= cooling;
    }

    rescale(&mut positions);
    Layout { positions }
}

fn extent(positions: &[Position]) -> f64 {
    let span = |coord: fn(&Position) -> f64| {
        let (low, high) = positions
            .iter()
            .map(coord)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        high - low
    };
    span(|p| p.x).max(span(|p| p.y))
}

fn apply_repulsion(positions: &[Position], displacement: &mut [Position], k: f64) {
    for left in 0..positions.len() {
        for right in (left + 1)..positions.len() {
            let dx = positions[left].x - positions[right].x;
            let dy = positions[left].y - positions[right].y;
            let distance = dx.hypot(dy).max(MIN_DISTANCE);
            let force = k * k / (distance * distance);
            displacement[left].x += dx * force;
            displacement[left].y += dy * force;
            displacement[right].x -= dx * force;
            displacement[right].y -= dy * force;
        }
    }
}

fn apply_attraction(graph: &Graph, positions: &[Position], displacement: &mut [Position], k: f64) {
    for edge in graph.edges().iter().filter(|edge| !edge.is_self_loop()) {
        let (source, target) = edge.endpoints();
        let dx = positions[source].x - positions[target].x;
        let dy = positions[source].y - positions[target].y;
        let distance = dx.hypot(dy).max(MIN_DISTANCE);
        let force = distance / k;
        displacement[source].x -= dx * force;
        displacement[source].y -= dy * force;
        displacement[target].x += dx * force;
        displacement[target].y += dy * force;
    }
}

fn rescale(positions: &mut [Position]) {
    let count = positions.len() as f64;
    let mean_x = positions.iter().map(|p| p.x).sum::<f64>() / count;
    let mean_y = positions.iter().map(|p| p.y).sum::<f64>() / count;
    for position in positions.iter_mut() {
        position.x -= mean_x;
        position.y -= mean_y;
    }
    let scale = positions
        .iter()
        .map(|p| p.x.abs().max(p.y.abs()))
        .fold(0.0_f64, f64::max);
    if scale > 0.0 {
        for position in positions.iter_mut() {
            position.x /= scale;
            position.y /= scale;
        }
    }
}
