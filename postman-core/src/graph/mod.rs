//! Undirected multigraph with index-based incidence lists.
//!
//! Vertices are dense `usize` indices. Edges live in an arena and are
//! addressed by [`EdgeId`], so parallel edges between the same pair of
//! vertices stay distinguishable. Each vertex keeps the ids of its incident
//! edges in insertion order; a self-loop appears twice in its vertex's list,
//! which makes the list length equal to the degree.

mod union_find;

use std::fmt;

use crate::{Result, error::PostmanError};

use self::union_find::DisjointSet;

/// Stable identifier of an edge within a [`Graph`].
///
/// # Examples
/// ```
/// use postman_core::EdgeId;
///
/// let id = EdgeId::new(3);
/// assert_eq!(id.get(), 3);
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct EdgeId(usize);

impl EdgeId {
    /// Wraps a raw edge index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the raw edge index.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// A single undirected edge in canonical form (`source <= target`).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Edge {
    id: EdgeId,
    source: usize,
    target: usize,
    duplicate_of: Option<EdgeId>,
}

impl Edge {
    /// Returns the edge identifier.
    #[must_use]
    #[rustfmt::skip]
    pub fn id(&self) -> EdgeId { self.id }

    /// Returns the smaller endpoint.
    #[must_use]
    #[rustfmt::skip]
    pub fn source(&self) -> usize { self.source }

    /// Returns the larger endpoint.
    #[must_use]
    #[rustfmt::skip]
    pub fn target(&self) -> usize { self.target }

    /// Returns both endpoints as `(source, target)`.
    #[must_use]
    #[rustfmt::skip]
    pub fn endpoints(&self) -> (usize, usize) { (self.source, self.target) }

    /// Returns the edge this one was copied from during eulerization.
    #[must_use]
    #[rustfmt::skip]
    pub fn duplicate_of(&self) -> Option<EdgeId> { self.duplicate_of }

    /// Returns `true` when both endpoints coincide.
    #[must_use]
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }

    /// Returns the endpoint opposite `vertex`, or `None` when `vertex` is not
    /// an endpoint. A self-loop is its own opposite.
    #[must_use]
    pub fn opposite(&self, vertex: usize) -> Option<usize> {
        if vertex == self.source {
            Some(self.target)
        } else if vertex == self.target {
            Some(self.source)
        } else {
            None
        }
    }
}

/// An undirected multigraph over vertices `0..vertex_count`.
///
/// Graphs are immutable once returned from a constructor or a pipeline stage.
///
/// # Examples
/// ```
/// use postman_core::Graph;
///
/// let graph = Graph::from_edges(3, [(0, 1), (1, 2)])?;
/// assert_eq!(graph.edge_count(), 2);
/// assert_eq!(graph.degree(1), 2);
/// assert_eq!(graph.odd_vertices(), vec![0, 2]);
/// # Ok::<(), postman_core::PostmanError>(())
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Graph {
    incidence: Vec<Vec<EdgeId>>,
    edges: Vec<Edge>,
}

impl Graph {
    /// Builds a graph from `(u, v)` endpoint pairs, assigning edge ids in
    /// iteration order.
    ///
    /// # Errors
    /// Returns [`PostmanError::VertexOutOfRange`] when an endpoint is not
    /// below `vertex_count`.
    pub fn from_edges(
        vertex_count: usize,
        edges: impl IntoIterator<Item = (usize, usize)>,
    ) -> Result<Self> {
        let mut graph = Self::with_vertices(vertex_count);
        for (left, right) in edges {
            for vertex in [left, right] {
                if vertex >= vertex_count {
                    return Err(PostmanError::VertexOutOfRange {
                        vertex,
                        vertex_count,
                    });
                }
            }
            graph.push_edge(left, right, None);
        }
        Ok(graph)
    }

    pub(crate) fn with_vertices(vertex_count: usize) -> Self {
        Self {
            incidence: vec![Vec::new(); vertex_count],
            edges: Vec::new(),
        }
    }

    /// Appends an edge. Callers guarantee both endpoints are in range.
    pub(crate) fn push_edge(
        &mut self,
        left: usize,
        right: usize,
        duplicate_of: Option<EdgeId>,
    ) -> EdgeId {
        let id = EdgeId::new(self.edges.len());
        let (source, target) = if left <= right {
            (left, right)
        } else {
            (right, left)
        };
        self.edges.push(Edge {
            id,
            source,
            target,
            duplicate_of,
        });
        self.incidence[source].push(id);
        self.incidence[target].push(id);
        id
    }

    /// Returns the number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.incidence.len()
    }

    /// Returns the number of edges, counting parallel copies separately.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns every edge in insertion order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Looks up an edge by id.
    #[must_use]
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.get())
    }

    /// Returns the incident edge ids of `vertex` in insertion order.
    ///
    /// Out-of-range vertices have no incident edges.
    #[must_use]
    pub fn incident_edges(&self, vertex: usize) -> &[EdgeId] {
        self.incidence.get(vertex).map_or(&[], Vec::as_slice)
    }

    /// Returns the degree of `vertex`; self-loops count twice.
    #[must_use]
    pub fn degree(&self, vertex: usize) -> usize {
        self.incident_edges(vertex).len()
    }

    /// Returns the realized degree of every vertex.
    #[must_use]
    pub fn degrees(&self) -> Vec<usize> {
        self.incidence.iter().map(Vec::len).collect()
    }

    /// Returns the vertices of odd degree in ascending order.
    #[must_use]
    pub fn odd_vertices(&self) -> Vec<usize> {
        (0..self.vertex_count())
            .filter(|&vertex| self.degree(vertex) % 2 == 1)
            .collect()
    }

    /// Iterates over `(edge, neighbour)` pairs incident to `vertex` in
    /// insertion order.
    pub fn neighbours(&self, vertex: usize) -> impl Iterator<Item = (EdgeId, usize)> + '_ {
        self.incident_edges(vertex).iter().filter_map(move |&id| {
            self.edge(id)
                .and_then(|edge| edge.opposite(vertex))
                .map(|other| (id, other))
        })
    }

    /// Returns `true` when the graph has no self-loops and no parallel edges.
    #[must_use]
    pub fn is_simple(&self) -> bool {
        let mut seen = std::collections::HashSet::with_capacity(self.edges.len());
        self.edges
            .iter()
            .all(|edge| !edge.is_self_loop() && seen.insert(edge.endpoints()))
    }

    /// Returns `true` when every vertex is reachable from every other one.
    ///
    /// A vertex without incident edges disconnects any graph with more than
    /// one vertex.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.disconnected_pair().is_none()
    }

    /// Returns `true` when every edge lies in one connected component.
    ///
    /// Vertices without incident edges are ignored, so a graph whose edges
    /// form one component plus some isolated vertices qualifies.
    #[must_use]
    pub fn edges_connected(&self) -> bool {
        self.split_between(|vertex| self.degree(vertex) > 0).is_none()
    }

    /// Finds two vertices in different components, or `None` when the graph
    /// is connected.
    pub(crate) fn disconnected_pair(&self) -> Option<(usize, usize)> {
        self.split_between(|_| true)
    }

    /// Returns the first `included` vertex and the first later `included`
    /// vertex outside its component.
    fn split_between(&self, included: impl Fn(usize) -> bool) -> Option<(usize, usize)> {
        let mut sets = DisjointSet::new(self.vertex_count());
        for edge in &self.edges {
            sets.union(edge.source, edge.target);
        }

        let mut members = (0..self.vertex_count()).filter(|&vertex| included(vertex));
        let anchor = members.next()?;
        let anchor_root = sets.find(anchor);
        members
            .find(|&vertex| sets.find(vertex) != anchor_root)
            .map(|vertex| (anchor, vertex))
    }

    /// Returns `true` when `self` contains every edge of `other` with the
    /// same id and endpoints, i.e. `other` is a prefix of this edge arena.
    #[must_use]
    pub fn extends(&self, other: &Self) -> bool {
        self.vertex_count() == other.vertex_count()
            && other
                .edges
                .iter()
                .all(|edge| self.edge(edge.id).is_some_and(|mine| mine.endpoints() == edge.endpoints()))
    }
}
