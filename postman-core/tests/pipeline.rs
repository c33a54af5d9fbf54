//! End-to-end behaviour of the postman stages and the pipeline driver.

mod common;

use postman_core::{
    DegreeSequence, EulerianWalk, PipelineBuilder, PostmanError, build_graph, eulerize,
    find_eulerian, sample_degrees,
};
use postman_test_support::tracing::RecordingLayer;
use rstest::rstest;
use tracing::Level;

use common::{four_cycle, short_path, two_disjoint_edges};

#[rstest]
#[case(1, 0)]
#[case(5, 6969)]
#[case(250, 42)]
fn sampler_draws_even_degrees(#[case] vertex_count: usize, #[case] seed: u64) {
    let sequence = sample_degrees(vertex_count, Some(seed)).expect("vertex count is positive");
    assert_eq!(sequence.len(), vertex_count);
    assert!(sequence.iter().all(|degree| [2, 4, 6].contains(degree)));
    assert_eq!(sequence, sample_degrees(vertex_count, Some(seed)).expect("same input"));
}

#[test]
fn sampler_rejects_zero_vertices() {
    assert_eq!(sample_degrees(0, Some(1)), Err(PostmanError::ZeroVertexCount));
}

#[test]
fn builder_rejects_odd_sums() {
    let err = build_graph(&DegreeSequence::new(vec![3, 2, 2]), Some(1))
        .expect_err("odd sums cannot be paired");
    assert_eq!(err, PostmanError::OddDegreeSum { sum: 7 });
}

#[test]
fn four_cycle_yields_four_edge_circuit() {
    let cycle = four_cycle();
    let even = eulerize(&cycle).expect("cycle is connected");
    assert_eq!(even, cycle);
    let Some(EulerianWalk::Circuit(walk)) = find_eulerian(&even) else {
        panic!("a cycle has an Eulerian circuit");
    };
    assert_eq!(walk.len(), 4);
    assert!(walk.is_closed());
}

#[test]
fn short_path_yields_two_edge_path() {
    let Some(EulerianWalk::Path(walk)) = find_eulerian(&short_path()) else {
        panic!("a path has an Eulerian path");
    };
    assert_eq!(walk.edge_pairs(), vec![(0, 1), (1, 2)]);
}

#[test]
fn disjoint_edges_are_disconnected() {
    let err = eulerize(&two_disjoint_edges()).expect_err("components cannot be joined");
    assert_eq!(err, PostmanError::Disconnected { left: 0, right: 2 });
    assert!(find_eulerian(&two_disjoint_edges()).is_none());
}

#[test]
fn builder_validates_configuration() {
    let err = PipelineBuilder::new()
        .with_max_attempts(0)
        .build()
        .expect_err("zero attempts are rejected");
    assert_eq!(err, PostmanError::InvalidAttemptCount);

    let err = PipelineBuilder::new()
        .with_degrees(DegreeSequence::new(vec![2, 1]))
        .build()
        .expect_err("odd sums are rejected before running");
    assert_eq!(err, PostmanError::OddDegreeSum { sum: 3 });

    let err = PipelineBuilder::new()
        .with_degrees(DegreeSequence::default())
        .build()
        .expect_err("empty sequences are rejected");
    assert_eq!(err, PostmanError::ZeroVertexCount);
}

#[test]
fn run_records_pipeline_span() {
    let pipeline = PipelineBuilder::new()
        .with_vertex_count(30)
        .with_seed(6969)
        .with_max_attempts(32)
        .build()
        .expect("configuration is valid");
    let (outcome, layer) = RecordingLayer::capture(|| pipeline.run());
    let outcome = outcome.expect("some sample is connected");

    let span = layer.span("core.pipeline.run").expect("pipeline span closes");
    assert_eq!(span.field("vertices"), Some("30"));
    assert_eq!(span.field("max_attempts"), Some("32"));
    assert_eq!(span.field("attempts"), Some(outcome.attempts().to_string().as_str()));
    assert_eq!(span.field("seed"), Some(outcome.seed().to_string().as_str()));
    assert!(layer.span("core.eulerize").is_some());
    assert!(layer.span("core.find_eulerian").is_some());
    assert_eq!(layer.events_at(Level::WARN).len(), outcome.attempts() - 1);
}

#[test]
fn exhausted_attempts_report_disconnection() {
    // Two disjoint double edges collapse to two separate edges, a pairing
    // reachable from [2, 2, 2, 2]; search seeds until one run is disconnected.
    let failing_seed = (0..512)
        .find(|&seed| {
            matches!(
                PipelineBuilder::new()
                    .with_degrees(DegreeSequence::new(vec![2, 2, 2, 2]))
                    .with_seed(seed)
                    .build()
                    .expect("configuration is valid")
                    .run(),
                Err(PostmanError::Disconnected { .. })
            )
        })
        .expect("some seed draws two disjoint edges");

    let (result, layer) = RecordingLayer::capture(|| {
        PipelineBuilder::new()
            .with_degrees(DegreeSequence::new(vec![2, 2, 2, 2]))
            .with_seed(failing_seed)
            .with_max_attempts(64)
            .build()
            .expect("configuration is valid")
            .run()
    });
    let outcome = result.expect("a later attempt draws a connected graph");
    assert!(outcome.attempts() > 1);
    assert_eq!(layer.events_at(Level::WARN).len(), outcome.attempts() - 1);
    assert!(outcome.walk().is_some_and(EulerianWalk::is_circuit));
}
