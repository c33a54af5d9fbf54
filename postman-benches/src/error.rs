//! Benchmark setup error type.
//!
//! Lets fixture builders propagate failures with `?` instead of panicking
//! inside setup code.

use postman_core::PostmanError;

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// A pipeline stage rejected the fixture.
    #[error("pipeline stage failed: {0}")]
    Core(#[from] PostmanError),
    /// No sampled graph was connected within the seed budget.
    #[error("no connected graph with {vertex_count} vertices within {attempts} seeds")]
    NoConnectedSample {
        /// Requested vertex count.
        vertex_count: usize,
        /// Seeds tried before giving up.
        attempts: usize,
    },
}
