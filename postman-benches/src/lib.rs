//! Benchmark support crate for postman.
//!
//! Provides reproducible connected graph fixtures and parameter types used by
//! the Criterion benchmarks for eulerization and walk extraction.

pub mod error;
pub mod fixtures;
pub mod params;
