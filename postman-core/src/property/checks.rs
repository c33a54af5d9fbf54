//! Invariant checks shared by the property suites.

use proptest::test_runner::{TestCaseError, TestCaseResult};

use crate::{Graph, Walk};

/// Fails unless `walk` uses every edge of `graph` exactly once, each step
/// follows a real edge, and consecutive steps share their hinge vertex.
pub(super) fn check_walk_covers(graph: &Graph, walk: &Walk) -> TestCaseResult {
    if walk.len() != graph.edge_count() {
        return Err(TestCaseError::fail(format!(
            "walk has {} steps for {} edges",
            walk.len(),
            graph.edge_count()
        )));
    }
    let mut used = vec![false; graph.edge_count()];
    for step in walk.steps() {
        let id = step.edge();
        let edge = graph
            .edge(id)
            .ok_or_else(|| TestCaseError::fail(format!("walk references missing edge {id}")))?;
        if edge.opposite(step.from()) != Some(step.to()) {
            return Err(TestCaseError::fail(format!(
                "step {}->{} does not follow edge {id}",
                step.from(),
                step.to()
            )));
        }
        if std::mem::replace(&mut used[id.get()], true) {
            return Err(TestCaseError::fail(format!("edge {id} walked twice")));
        }
    }
    for pair in walk.steps().windows(2) {
        if pair[0].to() != pair[1].from() {
            return Err(TestCaseError::fail(format!(
                "steps {} and {} do not share a vertex",
                pair[0].edge(),
                pair[1].edge()
            )));
        }
    }
    Ok(())
}
