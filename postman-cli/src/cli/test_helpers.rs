//! Small helpers shared across CLI tests.

use std::io;

use super::{Cli, CliError, Command, ExecutionSummary, OutputFormat, RunCommand, run_cli_with_prompt};

/// A `run` command over explicit degrees with a fixed seed and a generous
/// attempt budget.
pub(super) fn degrees_command(degrees: &str, seed: u64) -> RunCommand {
    RunCommand {
        vertices: None,
        degrees: Some(degrees.parse().expect("fixture degrees parse")),
        seed: Some(seed),
        attempts: 32,
        no_eulerize: false,
        layout_iterations: 10,
        format: OutputFormat::Text,
    }
}

/// Runs `command` with `answer` available on the prompt input.
pub(super) fn run_with_answer(
    command: RunCommand,
    answer: &str,
) -> Result<ExecutionSummary, CliError> {
    let cli = Cli {
        command: Command::Run(command),
    };
    run_cli_with_prompt(cli, answer.as_bytes(), io::sink())
}

pub(super) fn run_expecting_error(command: RunCommand, answer: &str, panic_msg: &str) -> CliError {
    match run_with_answer(command, answer) {
        Ok(_) => panic!("{panic_msg}"),
        Err(err) => err,
    }
}
