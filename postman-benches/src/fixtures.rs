//! Connected configuration-model graphs for benchmarking.
//!
//! Disconnected samples cannot be eulerized, so fixtures walk the derived
//! seed sequence until every vertex of a sample is reachable.

use postman_core::{Graph, build_graph, derive_attempt_seed, eulerize, sample_degrees};

use crate::error::BenchSetupError;

/// Seeds tried per fixture before setup fails.
pub const MAX_FIXTURE_SEEDS: usize = 256;

/// Samples a connected simple graph with `vertex_count` vertices.
///
/// # Errors
/// Returns [`BenchSetupError::Core`] when `vertex_count` is zero and
/// [`BenchSetupError::NoConnectedSample`] when every seed in the budget drew
/// a disconnected graph.
pub fn connected_graph(vertex_count: usize, seed: u64) -> Result<Graph, BenchSetupError> {
    for attempt in 0..MAX_FIXTURE_SEEDS {
        let derived = derive_attempt_seed(seed, attempt);
        let sequence = sample_degrees(vertex_count, Some(derived))?;
        let graph = build_graph(&sequence, Some(derived))?;
        if graph.edge_count() > 0 && graph.is_connected() {
            return Ok(graph);
        }
    }
    Err(BenchSetupError::NoConnectedSample {
        vertex_count,
        attempts: MAX_FIXTURE_SEEDS,
    })
}

/// Samples a connected graph and eulerizes it.
///
/// # Errors
/// Propagates [`connected_graph`] failures and eulerization errors.
pub fn eulerized_graph(vertex_count: usize, seed: u64) -> Result<Graph, BenchSetupError> {
    let graph = connected_graph(vertex_count, seed)?;
    Ok(eulerize(&graph)?)
}
