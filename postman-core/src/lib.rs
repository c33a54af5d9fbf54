//! Postman core library.
//!
//! Builds random graphs from degree sequences, forces every vertex to even
//! degree, and extracts Eulerian circuits and paths. The stages compose as
//! [`sample_degrees`] → [`build_graph`] → [`eulerize`] → [`find_eulerian`];
//! [`Pipeline`] runs them end to end and adds a [`Layout`] for renderers.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod configuration;
mod degree;
mod error;
mod eulerize;
mod graph;
mod layout;
mod pipeline;
mod rng;
mod walk;

#[cfg(test)]
mod property;
#[cfg(test)]
pub(crate) mod test_utils;

pub use crate::{
    builder::{DEFAULT_VERTEX_COUNT, GraphSource, PipelineBuilder},
    configuration::{Reduction, build_graph, build_graph_with_reduction, build_graph_with_rng},
    degree::{DegreeSequence, parse_vertex_count, sample_degrees, sample_degrees_with_rng},
    error::{PostmanError, PostmanErrorCode, PostmanErrorKind, Result},
    eulerize::{EXACT_MATCHING_LIMIT, eulerize},
    graph::{Edge, EdgeId, Graph},
    layout::{DEFAULT_LAYOUT_ITERATIONS, Layout, Position, spring_layout, spring_layout_with_rng},
    pipeline::{Pipeline, PipelineOutcome},
    rng::{derive_attempt_seed, seeded_rng},
    walk::{EulerianWalk, Walk, WalkStep, find_eulerian},
};
