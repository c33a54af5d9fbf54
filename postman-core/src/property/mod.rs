//! Property-based suites over configuration-model graphs.

mod checks;
mod types;
