//! Graph fixtures shared by the integration tests.

use postman_core::Graph;

fn graph(vertex_count: usize, edges: &[(usize, usize)]) -> Graph {
    Graph::from_edges(vertex_count, edges.iter().copied()).expect("fixture edges are in range")
}

/// The 4-cycle `0-1-2-3-0`, the only connected realization of `[2, 2, 2, 2]`
/// that needs no eulerization.
pub fn four_cycle() -> Graph {
    graph(4, &[(0, 1), (1, 2), (2, 3), (3, 0)])
}

/// The path `0-1-2`.
pub fn short_path() -> Graph {
    graph(3, &[(0, 1), (1, 2)])
}

/// Edges `0-1` and `2-3` with nothing joining them.
pub fn two_disjoint_edges() -> Graph {
    graph(4, &[(0, 1), (2, 3)])
}
