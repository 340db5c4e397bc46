//! CLI module
//!
//! Command-line interface for pulling collections.
//!
//! # Commands
//!
//! - `read` - Stream every record of a collection
//! - `check` - Make one request and report the outcome
//! - `snapshot` - Post a query payload once and print the returned data
//! - `list` - List built-in sources

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat, TargetArgs};
pub use runner::Runner;
