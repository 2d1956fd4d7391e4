//! CLI module
//!
//! Command-line interface for the tap.
//!
//! # Commands
//!
//! - `check` - Test connection to the API
//! - `discover` - Print the stream catalog with schemas
//! - `streams` - List stream names (lightweight)
//! - `read` - Extract data from streams

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::{build_stream_runner, catalog_json, streams_json, Runner};
