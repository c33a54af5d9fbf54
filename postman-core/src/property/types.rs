//! Fixture seeds for graph property tests.

use rand::{Rng, SeedableRng, rngs::SmallRng};
use test_strategy::Arbitrary;

use crate::{DegreeSequence, Graph, Result, build_graph_with_rng, sample_degrees_with_rng};

/// Shape of the degree sequence fed to the configuration model.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Arbitrary)]
pub(super) enum DegreeProfile {
    /// Degrees drawn by the library sampler from `{2, 4, 6}`.
    #[weight(3)]
    Sampled,
    /// Every vertex has degree two, which favours disjoint cycles.
    #[weight(1)]
    Cycles,
    /// Degrees in `0..=5`, parity repaired on the last vertex.
    #[weight(2)]
    Mixed,
}

/// Seed from which a graph fixture is deterministically rebuilt.
#[derive(Clone, Debug, Arbitrary)]
pub(super) struct GraphSeed {
    pub(super) profile: DegreeProfile,
    #[strategy(2_usize..48)]
    pub(super) vertex_count: usize,
    pub(super) seed: u64,
}

impl GraphSeed {
    /// Builds the degree sequence and its simple realization.
    pub(super) fn realize(&self) -> Result<(DegreeSequence, Graph)> {
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let degrees = match self.profile {
            DegreeProfile::Sampled => sample_degrees_with_rng(self.vertex_count, &mut rng)?,
            DegreeProfile::Cycles => DegreeSequence::new(vec![2; self.vertex_count]),
            DegreeProfile::Mixed => mixed_degrees(self.vertex_count, &mut rng),
        };
        let graph = build_graph_with_rng(&degrees, &mut rng)?;
        Ok((degrees, graph))
    }

    /// Builds the realization and bridges its components with extra edges
    /// until every vertex is reachable.
    pub(super) fn realize_connected(&self) -> Result<Graph> {
        let (_, mut graph) = self.realize()?;
        while let Some((left, right)) = graph.disconnected_pair() {
            graph.push_edge(left, right, None);
        }
        Ok(graph)
    }
}

fn mixed_degrees(vertex_count: usize, rng: &mut SmallRng) -> DegreeSequence {
    let mut degrees: Vec<usize> = (0..vertex_count).map(|_| rng.gen_range(0..=5)).collect();
    if degrees.iter().sum::<usize>() % 2 == 1
        && let Some(last) = degrees.last_mut()
    {
        *last += 1;
    }
    DegreeSequence::new(degrees)
}
