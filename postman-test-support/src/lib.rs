//! Shared test utilities used across postman crates.

pub mod ci;
pub mod tracing;
