//! Configuration-model graph construction.
//!
//! Each vertex `i` contributes `degree[i]` stubs. Shuffling the full stub list
//! and pairing consecutive stubs yields a uniformly random perfect matching;
//! every pair becomes a candidate edge. The multigraph that results is then
//! collapsed to a simple graph by discarding self-loops and keeping only the
//! first copy of each parallel edge, so realized degrees never exceed the
//! requested ones but may fall short of them.

use std::collections::HashSet;

use rand::{Rng, seq::SliceRandom};
use tracing::{debug, instrument};

use crate::{
    Result, degree::DegreeSequence, error::PostmanError, graph::Graph, rng::seeded_rng,
};

/// Counts describing how far a realization strayed from its stub pairing.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Reduction {
    self_loops: usize,
    parallel_edges: usize,
}

impl Reduction {
    /// Returns the number of stub pairs discarded as self-loops.
    #[must_use]
    #[rustfmt::skip]
    pub fn self_loops(&self) -> usize { self.self_loops }

    /// Returns the number of stub pairs collapsed into an existing edge.
    #[must_use]
    #[rustfmt::skip]
    pub fn parallel_edges(&self) -> usize { self.parallel_edges }
}

/// Builds a simple graph approximating `sequence` via stub pairing.
///
/// A `Some(seed)` makes the pairing reproducible; `None` seeds from entropy.
///
/// # Errors
/// Returns [`PostmanError::OddDegreeSum`] when the degrees sum to an odd
/// number.
///
/// # Examples
/// ```
/// use postman_core::{DegreeSequence, build_graph};
///
/// let sequence = DegreeSequence::new(vec![2, 2, 2, 2]);
/// let graph = build_graph(&sequence, Some(6969))?;
/// assert!(graph.is_simple());
/// assert!(graph.degrees().iter().zip(sequence.iter()).all(|(got, want)| got <= want));
/// # Ok::<(), postman_core::PostmanError>(())
/// ```
pub fn build_graph(sequence: &DegreeSequence, seed: Option<u64>) -> Result<Graph> {
    let mut rng = seeded_rng(seed);
    build_graph_with_rng(sequence, &mut rng)
}

/// Builds a simple graph from a caller-owned random source.
///
/// # Errors
/// Returns [`PostmanError::OddDegreeSum`] when the degrees sum to an odd
/// number.
pub fn build_graph_with_rng<R: Rng + ?Sized>(
    sequence: &DegreeSequence,
    rng: &mut R,
) -> Result<Graph> {
    build_graph_with_reduction(sequence, rng).map(|(graph, _)| graph)
}

/// Builds a simple graph and reports what the reduction removed.
///
/// # Errors
/// Returns [`PostmanError::OddDegreeSum`] when the degrees sum to an odd
/// number.
#[instrument(
    name = "core.build_graph",
    err,
    skip(sequence, rng),
    fields(vertices = sequence.len(), stubs = sequence.sum()),
)]
pub fn build_graph_with_reduction<R: Rng + ?Sized>(
    sequence: &DegreeSequence,
    rng: &mut R,
) -> Result<(Graph, Reduction)> {
    let sum = sequence.sum();
    if sum % 2 == 1 {
        return Err(PostmanError::OddDegreeSum { sum });
    }

    let mut stubs: Vec<usize> = Vec::with_capacity(sum);
    for (vertex, &degree) in sequence.iter().enumerate() {
        stubs.extend(std::iter::repeat_n(vertex, degree));
    }
    stubs.shuffle(rng);

    let mut graph = Graph::with_vertices(sequence.len());
    let mut seen = HashSet::with_capacity(stubs.len() / 2);
    let mut reduction = Reduction::default();
    for pair in stubs.chunks_exact(2) {
        let (left, right) = (pair[0], pair[1]);
        if left == right {
            reduction.self_loops += 1;
            continue;
        }
        let key = (left.min(right), left.max(right));
        if !seen.insert(key) {
            reduction.parallel_edges += 1;
            continue;
        }
        graph.push_edge(left, right, None);
    }

    debug!(
        edges = graph.edge_count(),
        self_loops = reduction.self_loops,
        parallel_edges = reduction.parallel_edges,
        "configuration model reduced to simple graph"
    );
    #[cfg(feature = "metrics")]
    {
        metrics::counter!("postman_configuration_self_loops_discarded")
            .increment(reduction.self_loops as u64);
        metrics::counter!("postman_configuration_parallel_edges_collapsed")
            .increment(reduction.parallel_edges as u64);
    }

    Ok((graph, reduction))
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::{SeedableRng, rngs::SmallRng};
    use rstest::rstest;

    use crate::sample_degrees;

    #[test]
    fn rejects_odd_degree_sum() {
        let sequence = DegreeSequence::new(vec![1, 2, 2]);
        let err = build_graph(&sequence, Some(1)).expect_err("odd sums cannot be paired");
        assert_eq!(err, PostmanError::OddDegreeSum { sum: 5 });
    }

    #[rstest]
    #[case(4, 1)]
    #[case(16, 42)]
    #[case(64, 6969)]
    #[case(200, 7)]
    fn realizations_are_simple_and_bounded(#[case] vertex_count: usize, #[case] seed: u64) {
        let sequence = sample_degrees(vertex_count, Some(seed)).expect("vertex count is positive");
        let graph = build_graph(&sequence, Some(seed)).expect("sampled sums are even");
        assert_eq!(graph.vertex_count(), vertex_count);
        assert!(graph.is_simple());
        for (realized, requested) in graph.degrees().iter().zip(sequence.iter()) {
            assert!(realized <= requested);
        }
    }

    #[test]
    fn reduction_accounts_for_every_stub_pair() {
        let sequence = sample_degrees(50, Some(11)).expect("vertex count is positive");
        let mut rng = SmallRng::seed_from_u64(11);
        let (graph, reduction) =
            build_graph_with_reduction(&sequence, &mut rng).expect("sampled sums are even");
        assert_eq!(
            graph.edge_count() + reduction.self_loops() + reduction.parallel_edges(),
            sequence.sum() / 2
        );
    }

    #[test]
    fn same_seed_reproduces_graph() {
        let sequence = sample_degrees(30, Some(5)).expect("vertex count is positive");
        let first = build_graph(&sequence, Some(5)).expect("sampled sums are even");
        let second = build_graph(&sequence, Some(5)).expect("sampled sums are even");
        assert_eq!(first, second);
    }

    #[test]
    fn all_self_loop_pairings_leave_vertex_isolated() {
        let sequence = DegreeSequence::new(vec![2]);
        let graph = build_graph(&sequence, Some(0)).expect("sum is even");
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.degree(0), 0);
    }

    #[test]
    fn empty_sequence_builds_empty_graph() {
        let graph = build_graph(&DegreeSequence::default(), Some(0)).expect("sum is even");
        assert_eq!(graph.vertex_count(), 0);
        assert_eq!(graph.edge_count(), 0);
    }
}
