//! Eulerization: forcing every vertex to even degree.
//!
//! The odd-degree vertices of a connected graph are paired by a
//! minimum-weight perfect matching under unweighted shortest-path distance,
//! and every edge on one shortest path between each pair is duplicated.
//! Duplicating a path flips the parity of its two endpoints and leaves every
//! interior vertex's parity unchanged, so the result has no odd vertices.
//!
//! The input graph is never mutated. The returned graph starts with the
//! input's edges under their original ids, followed by the duplicates, each
//! pointing back at the edge it copies via [`crate::Edge::duplicate_of`].

mod blossom;
mod matching;
mod paths;

use tracing::{Span, debug, field, info, instrument};

use crate::{Result, error::PostmanError, graph::Graph};

pub use self::matching::EXACT_MATCHING_LIMIT;

use self::{
    matching::{matching_weight, minimum_weight_matching},
    paths::shortest_path_trees,
};

/// Returns a copy of `graph` augmented with duplicate edges so that every
/// vertex has even degree.
///
/// Every vertex must be reachable, including those without edges: a closed
/// walk cannot visit a vertex that no edge touches.
///
/// # Errors
/// Returns [`PostmanError::DegenerateInput`] when the graph has fewer than
/// two vertices or no edges, and [`PostmanError::Disconnected`] when some
/// vertex is unreachable from the others.
///
/// # Examples
/// ```
/// use postman_core::{Graph, eulerize};
///
/// let path = Graph::from_edges(3, [(0, 1), (1, 2)])?;
/// let even = eulerize(&path)?;
/// assert!(even.odd_vertices().is_empty());
/// assert_eq!(even.edge_count(), 4);
/// # Ok::<(), postman_core::PostmanError>(())
/// ```
#[instrument(
    name = "core.eulerize",
    err,
    skip(graph),
    fields(
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        odd_vertices = field::Empty,
        duplicated = field::Empty,
    ),
)]
pub fn eulerize(graph: &Graph) -> Result<Graph> {
    if graph.vertex_count() < 2 || graph.edge_count() == 0 {
        return Err(PostmanError::DegenerateInput {
            vertex_count: graph.vertex_count(),
            edge_count: graph.edge_count(),
        });
    }
    if let Some((left, right)) = graph.disconnected_pair() {
        return Err(PostmanError::Disconnected { left, right });
    }

    let span = Span::current();
    let odd = graph.odd_vertices();
    span.record("odd_vertices", odd.len());

    let mut augmented = graph.clone();
    if odd.is_empty() {
        span.record("duplicated", 0);
        info!("graph already has even degrees");
        return Ok(augmented);
    }

    let trees = shortest_path_trees(graph, &odd);
    let mut distances = Vec::with_capacity(odd.len());
    for (tree, &from) in trees.iter().zip(&odd) {
        let row = odd
            .iter()
            .map(|&to| {
                tree.distance_to(to)
                    .ok_or(PostmanError::Disconnected {
                        left: from,
                        right: to,
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        distances.push(row);
    }

    let pairs = minimum_weight_matching(&distances);
    debug!(
        pairs = pairs.len(),
        weight = matching_weight(&distances, &pairs),
        solver = if odd.len() <= EXACT_MATCHING_LIMIT { "subsets" } else { "blossom" },
        "matched odd vertices"
    );

    for &(left, right) in &pairs {
        for (edge, parent, child) in trees[left].path_to(odd[right]) {
            augmented.push_edge(parent, child, Some(edge));
        }
    }

    let duplicated = augmented.edge_count() - graph.edge_count();
    span.record("duplicated", duplicated);
    #[cfg(feature = "metrics")]
    metrics::counter!("postman_eulerize_duplicated_edges").increment(duplicated as u64);
    info!(duplicated, "eulerization completed");

    Ok(augmented)
}
