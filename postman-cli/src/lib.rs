//! Support library for the postman CLI binary.
//!
//! Exposes the command and logging modules so doctests and integration tests
//! can exercise the pipeline without spawning a subprocess.

pub mod cli;
pub mod logging;
