//! Eulerian circuit and path extraction.
//!
//! [`find_eulerian`] classifies a graph and, when a walk covering every edge
//! exactly once exists, builds it with an iterative form of Hierholzer's
//! algorithm: follow unused edges until stuck, then back up along the current
//! trail, splicing in sub-trails from any vertex that still has unused edges.
//! Each vertex consumes its incident edges in insertion order, so repeated
//! calls on the same graph return the same walk.

use tracing::{debug, instrument};

use crate::graph::{EdgeId, Graph};

/// One traversal of an edge, oriented in the direction it was walked.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WalkStep {
    edge: EdgeId,
    from: usize,
    to: usize,
}

impl WalkStep {
    /// Returns the traversed edge.
    #[must_use]
    #[rustfmt::skip]
    pub fn edge(&self) -> EdgeId { self.edge }

    /// Returns the vertex the step leaves.
    #[must_use]
    #[rustfmt::skip]
    pub fn from(&self) -> usize { self.from }

    /// Returns the vertex the step enters.
    #[must_use]
    #[rustfmt::skip]
    pub fn to(&self) -> usize { self.to }
}

/// An ordered sequence of steps in which consecutive steps share a vertex.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Walk {
    steps: Vec<WalkStep>,
}

impl Walk {
    /// Returns the steps in traversal order.
    #[must_use]
    pub fn steps(&self) -> &[WalkStep] {
        &self.steps
    }

    /// Returns the number of traversed edges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` when the walk traverses no edges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Returns the first vertex of the walk.
    #[must_use]
    pub fn start(&self) -> Option<usize> {
        self.steps.first().map(WalkStep::from)
    }

    /// Returns the last vertex of the walk.
    #[must_use]
    pub fn end(&self) -> Option<usize> {
        self.steps.last().map(WalkStep::to)
    }

    /// Returns `true` when the walk ends where it started.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        !self.is_empty() && self.start() == self.end()
    }

    /// Returns the walk as oriented `(from, to)` vertex pairs, the form
    /// consumed by renderers.
    #[must_use]
    pub fn edge_pairs(&self) -> Vec<(usize, usize)> {
        self.steps.iter().map(|step| (step.from, step.to)).collect()
    }

    /// Returns the visited vertices, including the start vertex.
    #[must_use]
    pub fn vertices(&self) -> Vec<usize> {
        self.start()
            .into_iter()
            .chain(self.steps.iter().map(WalkStep::to))
            .collect()
    }
}

/// A walk that covers every edge of a graph exactly once.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EulerianWalk {
    /// A closed walk: the start and end vertices coincide.
    Circuit(Walk),
    /// An open walk between the graph's two odd-degree vertices.
    Path(Walk),
}

impl EulerianWalk {
    /// Returns the underlying walk.
    #[must_use]
    pub fn walk(&self) -> &Walk {
        match self {
            Self::Circuit(walk) | Self::Path(walk) => walk,
        }
    }

    /// Consumes the result and returns the underlying walk.
    #[must_use]
    pub fn into_walk(self) -> Walk {
        match self {
            Self::Circuit(walk) | Self::Path(walk) => walk,
        }
    }

    /// Returns `true` for [`EulerianWalk::Circuit`].
    #[must_use]
    pub fn is_circuit(&self) -> bool {
        matches!(self, Self::Circuit(_))
    }

    /// Returns a stable lowercase label (`circuit` or `path`).
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Circuit(_) => "circuit",
            Self::Path(_) => "path",
        }
    }
}

/// Finds an Eulerian circuit or path of `graph`.
///
/// Returns a circuit when the edges are connected and every degree is even,
/// a path between the two odd vertices when exactly two degrees are odd, and
/// `None` otherwise, including for graphs without edges. Isolated vertices do
/// not affect the outcome.
///
/// # Examples
/// ```
/// use postman_core::{EulerianWalk, Graph, find_eulerian};
///
/// let path = Graph::from_edges(3, [(0, 1), (1, 2)])?;
/// let Some(EulerianWalk::Path(walk)) = find_eulerian(&path) else {
///     panic!("a path graph has an Eulerian path");
/// };
/// assert_eq!(walk.edge_pairs(), vec![(0, 1), (1, 2)]);
/// # Ok::<(), postman_core::PostmanError>(())
/// ```
#[must_use]
#[instrument(
    name = "core.find_eulerian",
    skip(graph),
    fields(vertices = graph.vertex_count(), edges = graph.edge_count()),
)]
pub fn find_eulerian(graph: &Graph) -> Option<EulerianWalk> {
    if graph.edge_count() == 0 {
        debug!("graph has no edges to traverse");
        return None;
    }
    if !graph.edges_connected() {
        debug!("graph edges span several components");
        return None;
    }

    let odd = graph.odd_vertices();
    match odd.as_slice() {
        [] => {
            let start = (0..graph.vertex_count()).find(|&vertex| graph.degree(vertex) > 0)?;
            Some(EulerianWalk::Circuit(hierholzer(graph, start)))
        }
        [start, _] => Some(EulerianWalk::Path(hierholzer(graph, *start))),
        _ => {
            debug!(odd_vertices = odd.len(), "too many odd vertices for an Eulerian walk");
            None
        }
    }
}

fn hierholzer(graph: &Graph, start: usize) -> Walk {
    let mut used = vec![false; graph.edge_count()];
    let mut cursor = vec![0_usize; graph.vertex_count()];
    let mut trail: Vec<(usize, Option<WalkStep>)> = vec![(start, None)];
    let mut finished = Vec::with_capacity(graph.edge_count());

    while let Some(&(vertex, arrival)) = trail.last() {
        match next_unused(graph, vertex, &mut cursor[vertex], &used) {
            Some((edge, to)) => {
                used[edge.get()] = true;
                trail.push((
                    to,
                    Some(WalkStep {
                        edge,
                        from: vertex,
                        to,
                    }),
                ));
            }
            None => {
                trail.pop();
                if let Some(step) = arrival {
                    finished.push(step);
                }
            }
        }
    }

    finished.reverse();
    Walk { steps: finished }
}

/// Advances `cursor` past used edges and returns the next unused edge at
/// `vertex` together with its opposite endpoint.
fn next_unused(
    graph: &Graph,
    vertex: usize,
    cursor: &mut usize,
    used: &[bool],
) -> Option<(EdgeId, usize)> {
    let incident = graph.incident_edges(vertex);
    while let Some(&edge) = incident.get(*cursor) {
        *cursor += 1;
        if used[edge.get()] {
            continue;
        }
        if let Some(to) = graph.edge(edge).and_then(|found| found.opposite(vertex)) {
            return Some((edge, to));
        }
    }
    None
}
