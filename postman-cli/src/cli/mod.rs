//! Command-line interface orchestration for the postman pipeline.
//!
//! The `run` command builds a graph from a sampled or explicit degree
//! sequence, eulerizes it, and renders the Eulerian walk with vertex
//! positions as text or JSON.

mod commands;
mod render;

pub use commands::{
    Cli, CliError, Command, ExecutionSummary, OutputFormat, RunCommand, prompt_vertex_count,
    run_cli, run_cli_with_prompt,
};
pub use render::render_summary;

#[cfg(test)]
mod test_helpers;
