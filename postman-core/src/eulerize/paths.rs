//! Unweighted shortest paths from odd-degree vertices.
//!
//! A breadth-first search from each source records both hop distances and
//! the edge used to first reach every vertex. Neighbours are explored in
//! incidence order, so the predecessor tree (and hence the path duplicated
//! for a matched pair) is a deterministic function of the graph.

use std::collections::VecDeque;

use crate::graph::{EdgeId, Graph};

/// One step of a shortest path: the edge taken and its two endpoints.
pub(super) type PathStep = (EdgeId, usize, usize);

/// Breadth-first search tree rooted at a single source vertex.
#[derive(Clone, Debug)]
pub(super) struct ShortestPathTree {
    distance: Vec<Option<usize>>,
    via: Vec<Option<(EdgeId, usize)>>,
}

impl ShortestPathTree {
    pub(super) fn from_source(graph: &Graph, source: usize) -> Self {
        let vertex_count = graph.vertex_count();
        let mut distance = vec![None; vertex_count];
        let mut via = vec![None; vertex_count];
        let mut queue = VecDeque::new();

        if source < vertex_count {
            distance[source] = Some(0);
            queue.push_back((source, 0_usize));
        }

        while let Some((vertex, hops)) = queue.pop_front() {
            for (edge, neighbour) in graph.neighbours(vertex) {
                if distance[neighbour].is_some() {
                    continue;
                }
                distance[neighbour] = Some(hops + 1);
                via[neighbour] = Some((edge, vertex));
                queue.push_back((neighbour, hops + 1));
            }
        }

        Self { distance, via }
    }

    pub(super) fn distance_to(&self, target: usize) -> Option<usize> {
        self.distance.get(target).copied().flatten()
    }

    /// Returns the edges from `target` back to the root, or an empty list when
    /// `target` is the root or unreachable.
    pub(super) fn path_to(&self, target: usize) -> Vec<PathStep> {
        let mut steps = Vec::new();
        let mut current = target;
        while let Some(Some((edge, parent))) = self.via.get(current) {
            steps.push((*edge, *parent, current));
            current = *parent;
        }
        steps
    }
}

/// Builds one tree per source, preserving the order of `sources`.
pub(super) fn shortest_path_trees(graph: &Graph, sources: &[usize]) -> Vec<ShortestPathTree> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        sources
            .par_iter()
            .map(|&source| ShortestPathTree::from_source(graph, source))
            .collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        sources
            .iter()
            .map(|&source| ShortestPathTree::from_source(graph, source))
            .collect()
    }
}
