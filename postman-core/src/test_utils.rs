//! Shared test utilities for `postman-core`.

use postman_test_support::ci::property_test_profile::ProptestRunProfile;
use proptest::test_runner::Config as ProptestConfig;

use crate::graph::Graph;

/// Builds a proptest configuration from the shared CI profile.
///
/// Keeps property suites aligned on the same `PROGTEST_CASES` and
/// `POSTMAN_PBT_FORK` interpretation.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// Builds a graph from fixture edges that are known to be in range.
pub(crate) fn graph(vertex_count: usize, edges: &[(usize, usize)]) -> Graph {
    Graph::from_edges(vertex_count, edges.iter().copied()).expect("fixture edges are in range")
}
