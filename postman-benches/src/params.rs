//! Benchmark parameter types.

use std::fmt;

/// Parameters for a graph benchmark run.
#[derive(Clone, Copy, Debug)]
pub struct GraphBenchParams {
    /// Number of vertices in the sampled graph.
    pub vertex_count: usize,
}

impl fmt::Display for GraphBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={}", self.vertex_count)
    }
}
