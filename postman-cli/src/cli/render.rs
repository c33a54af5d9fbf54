//! Text and JSON rendering of pipeline outcomes.
//!
//! Both formats carry the renderer contract: the walk as ordered vertex
//! pairs plus one position per vertex.

use std::io::Write;

use postman_core::{EulerianWalk, Graph, PipelineOutcome};
use serde::Serialize;

use super::commands::{CliError, ExecutionSummary, OutputFormat};

#[derive(Debug, Serialize)]
struct SummaryDocument<'a> {
    seed: u64,
    attempts: usize,
    degrees: &'a [usize],
    vertex_count: usize,
    edges: Vec<EdgeDocument>,
    walk: Option<WalkDocument>,
    positions: Vec<[f64; 2]>,
}

#[derive(Debug, Serialize)]
struct EdgeDocument {
    id: usize,
    source: usize,
    target: usize,
    duplicate_of: Option<usize>,
}

#[derive(Debug, Serialize)]
struct WalkDocument {
    kind: &'static str,
    steps: Vec<(usize, usize)>,
}

impl<'a> SummaryDocument<'a> {
    fn new(outcome: &'a PipelineOutcome) -> Self {
        let graph = outcome.final_graph();
        Self {
            seed: outcome.seed(),
            attempts: outcome.attempts(),
            degrees: outcome.degrees().as_slice(),
            vertex_count: graph.vertex_count(),
            edges: graph
                .edges()
                .iter()
                .map(|edge| EdgeDocument {
                    id: edge.id().get(),
                    source: edge.source(),
                    target: edge.target(),
                    duplicate_of: edge.duplicate_of().map(|id| id.get()),
                })
                .collect(),
            walk: outcome.walk().map(|walk| WalkDocument {
                kind: walk.label(),
                steps: walk.walk().edge_pairs(),
            }),
            positions: outcome
                .layout()
                .positions()
                .iter()
                .map(|position| [position.x(), position.y()])
                .collect(),
        }
    }
}

/// Renders `summary` to `writer` in the format it requests.
///
/// # Errors
/// Returns [`CliError::Io`] if writing fails and [`CliError::Render`] if JSON
/// serialisation fails.
///
/// # Examples
/// ```
/// use postman_cli::cli::{ExecutionSummary, OutputFormat, render_summary};
/// use postman_core::{DegreeSequence, PipelineBuilder};
///
/// let outcome = PipelineBuilder::new()
///     .with_degrees(DegreeSequence::new(vec![2, 2, 2, 2]))
///     .with_seed(6969)
///     .with_max_attempts(16)
///     .build()?
///     .run()?;
/// let summary = ExecutionSummary { outcome, format: OutputFormat::Json };
/// let mut buffer = Vec::new();
/// render_summary(&summary, &mut buffer)?;
/// assert!(String::from_utf8(buffer)?.contains("\"walk\""));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> Result<(), CliError> {
    match summary.format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, &SummaryDocument::new(&summary.outcome))?;
            writeln!(writer)?;
        }
        OutputFormat::Text => render_text(&summary.outcome, &mut writer)?,
    }
    Ok(())
}

fn render_text(outcome: &PipelineOutcome, writer: &mut impl Write) -> Result<(), CliError> {
    let graph = outcome.final_graph();
    let degrees: Vec<String> = outcome.degrees().iter().map(ToString::to_string).collect();
    writeln!(writer, "seed: {}", outcome.seed())?;
    writeln!(writer, "attempts: {}", outcome.attempts())?;
    writeln!(writer, "degrees: {}", degrees.join(", "))?;
    writeln!(writer, "vertices: {}", graph.vertex_count())?;
    writeln!(
        writer,
        "edges: {} ({} duplicated)",
        graph.edge_count(),
        duplicated_edges(graph)
    )?;
    render_walk(outcome.walk(), writer)?;
    writeln!(writer, "positions:")?;
    for (vertex, position) in outcome.layout().positions().iter().enumerate() {
        writeln!(writer, "{vertex}\t{:.4}\t{:.4}", position.x(), position.y())?;
    }
    Ok(())
}

fn render_walk(walk: Option<&EulerianWalk>, writer: &mut impl Write) -> Result<(), CliError> {
    let Some(found) = walk else {
        writeln!(writer, "walk: none")?;
        return Ok(());
    };
    writeln!(writer, "walk: {} ({} steps)", found.label(), found.walk().len())?;
    for (from, to) in found.walk().edge_pairs() {
        writeln!(writer, "{from} -> {to}")?;
    }
    Ok(())
}

fn duplicated_edges(graph: &Graph) -> usize {
    graph
        .edges()
        .iter()
        .filter(|edge| edge.duplicate_of().is_some())
        .count()
}
