//! Command-line interface.
//!
//! - `serve` - start the HTTP server
//! - `migrate` - apply, roll back or inspect database migrations

pub mod args;

pub use args::{Cli, Commands};
