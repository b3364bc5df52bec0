//! HTTP request handlers for the mock server.

pub mod status_checks;

pub use status_checks::*;
