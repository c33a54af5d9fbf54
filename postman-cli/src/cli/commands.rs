//! Command implementations and argument parsing for the postman CLI.

use std::io::{self, BufRead, Write};

use clap::{Args, Parser, Subcommand, ValueEnum};
use postman_core::{
    DEFAULT_LAYOUT_ITERATIONS, DegreeSequence, PipelineBuilder, PipelineOutcome, PostmanError,
    parse_vertex_count,
};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

const VERTEX_PROMPT: &str = "Enter the number of vertices: ";

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "postman",
    about = "Generate a random graph, eulerize it, and print its Eulerian walk."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the sample, eulerize, and walk pipeline.
    Run(RunCommand),
}

/// Options accepted by the `run` command.
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Number of vertices to sample degrees for; prompted on stdin when
    /// neither this nor `--degrees` is given.
    #[arg(long, conflicts_with = "degrees")]
    pub vertices: Option<usize>,

    /// Explicit comma-separated degree sequence, e.g. `2,2,4,2`.
    #[arg(long)]
    pub degrees: Option<DegreeSequence>,

    /// Seed for reproducible runs; drawn from entropy when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Samples to draw before giving up on a disconnected graph.
    #[arg(long, default_value_t = 1)]
    pub attempts: usize,

    /// Search the simple graph for a walk without eulerizing it first.
    #[arg(long)]
    pub no_eulerize: bool,

    /// Spring layout iterations used to place vertices.
    #[arg(long, default_value_t = DEFAULT_LAYOUT_ITERATIONS)]
    pub layout_iterations: usize,

    /// Output format written to stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Output formats supported by [`crate::cli::render_summary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Line-oriented human-readable text.
    Text,
    /// A single JSON document.
    Json,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Reading the prompt answer or writing output failed.
    #[error("i/o failure: {0}")]
    Io(#[from] io::Error),
    /// A pipeline stage failed.
    #[error(transparent)]
    Core(#[from] PostmanError),
    /// The summary could not be serialised as JSON.
    #[error("failed to render JSON summary: {0}")]
    Render(#[from] serde_json::Error),
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone)]
pub struct ExecutionSummary {
    /// Everything the pipeline produced.
    pub outcome: PipelineOutcome,
    /// Format requested for rendering.
    pub format: OutputFormat,
}

/// Executes the CLI command represented by `cli`, prompting on stdin for a
/// vertex count when the command names no graph source.
///
/// # Errors
/// Returns [`CliError`] when the prompt cannot be answered or a pipeline
/// stage fails.
///
/// # Examples
/// ```
/// use postman_cli::cli::{Cli, Command, OutputFormat, RunCommand, run_cli};
///
/// let cli = Cli {
///     command: Command::Run(RunCommand {
///         vertices: None,
///         degrees: Some("2,2,2".parse()?),
///         seed: Some(1),
///         attempts: 16,
///         no_eulerize: false,
///         layout_iterations: 10,
///         format: OutputFormat::Text,
///     }),
/// };
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.outcome.degrees().len(), 3);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    let stdin = io::stdin();
    run_cli_with_prompt(cli, stdin.lock(), io::stderr())
}

/// Executes `cli`, reading any prompted answer from `input` and writing the
/// prompt text to `prompt`.
///
/// # Errors
/// Returns [`CliError`] when the prompt cannot be answered or a pipeline
/// stage fails.
#[instrument(
    name = "cli.run",
    err,
    skip(cli, input, prompt),
    fields(command = field::Empty, source = field::Empty, format = field::Empty),
)]
pub fn run_cli_with_prompt(
    cli: Cli,
    input: impl BufRead,
    prompt: impl Write,
) -> Result<ExecutionSummary, CliError> {
    match cli.command {
        Command::Run(run) => {
            Span::current().record("command", field::display("run"));
            run_command(run, input, prompt)
        }
    }
}

pub(super) fn run_command(
    command: RunCommand,
    input: impl BufRead,
    prompt: impl Write,
) -> Result<ExecutionSummary, CliError> {
    let span = Span::current();
    span.record("format", field::debug(command.format));

    let builder = match (command.degrees, command.vertices) {
        (Some(sequence), _) => {
            span.record("source", field::display("degrees"));
            PipelineBuilder::new().with_degrees(sequence)
        }
        (None, Some(vertices)) => {
            span.record("source", field::display("vertices"));
            PipelineBuilder::new().with_vertex_count(vertices)
        }
        (None, None) => {
            span.record("source", field::display("prompt"));
            let vertices = prompt_vertex_count(input, prompt)?;
            PipelineBuilder::new().with_vertex_count(vertices)
        }
    };
    let builder = match command.seed {
        Some(seed) => builder.with_seed(seed),
        None => builder,
    };
    let pipeline = builder
        .with_max_attempts(command.attempts)
        .with_eulerize(!command.no_eulerize)
        .with_layout_iterations(command.layout_iterations)
        .build()?;

    let outcome = pipeline.run()?;
    info!(
        seed = outcome.seed(),
        attempts = outcome.attempts(),
        edges = outcome.final_graph().edge_count(),
        "command completed"
    );
    Ok(ExecutionSummary {
        outcome,
        format: command.format,
    })
}

/// Asks for a vertex count on `prompt` and parses one line from `input`.
///
/// # Errors
/// Returns [`CliError::Io`] when the streams fail and [`CliError::Core`]
/// wrapping [`PostmanError::InvalidVertexCount`] when the answer is not a
/// positive integer, including when `input` is already exhausted.
///
/// # Examples
/// ```
/// use postman_cli::cli::prompt_vertex_count;
///
/// let mut shown = Vec::new();
/// let count = prompt_vertex_count("12\n".as_bytes(), &mut shown)?;
/// assert_eq!(count, 12);
/// assert!(String::from_utf8(shown)?.contains("number of vertices"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn prompt_vertex_count(
    mut input: impl BufRead,
    mut prompt: impl Write,
) -> Result<usize, CliError> {
    prompt.write_all(VERTEX_PROMPT.as_bytes())?;
    prompt.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(parse_vertex_count(&line)?.get())
}
