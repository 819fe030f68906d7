//! Sift CLI library.
//!
//! This library provides the core functionality for the `sift` command-line
//! interface: configuration loading, input ingestion, command execution and
//! output formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod ingest;
pub mod output;

pub use cli::{Cli, CliFormat, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
