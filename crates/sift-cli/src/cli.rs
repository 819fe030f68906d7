//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Sift - Extract structured records from resumes and job descriptions.
#[derive(Debug, Parser)]
#[command(name = "sift")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "SIFT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract a record from a text file
    Extract(ExtractArgs),

    /// Print the format instructions for a record type
    Schema(SchemaArgs),

    /// Show or initialize the configuration file
    Config(ConfigArgs),
}

/// Record types that can be extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExtractKind {
    /// Resume or CV
    Resume,
    /// Job description
    Job,
}

/// Record types with a printable schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SchemaKind {
    /// Resume or CV
    Resume,
    /// Job description
    Job,
    /// Reviewer critique
    Reflection,
}

/// Named extraction limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Preset {
    /// Fewer attempts, shorter timeouts
    Aggressive,
    /// More attempts, room for slow local models
    Lenient,
}

/// How the extracted record is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Indented JSON (default)
    Pretty,
    /// Single-line JSON
    Json,
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// Input file (.txt, .md or .text)
    pub file: PathBuf,

    /// Record type to extract
    #[arg(short, long, value_enum)]
    pub kind: ExtractKind,

    /// Use preset limits instead of the configured [extractor] section
    #[arg(long, value_enum)]
    pub preset: Option<Preset>,

    /// Override the attempt cap
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Print the conversation to stderr when done
    #[arg(long)]
    pub show_log: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty")]
    pub format: CliFormat,
}

/// Arguments for the schema command.
#[derive(Debug, Parser)]
pub struct SchemaArgs {
    /// Record type
    #[arg(short, long, value_enum)]
    pub kind: SchemaKind,

    /// Print the bare JSON schema instead of the full instructions
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the config command.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    /// Write a default configuration file if none exists
    #[arg(long)]
    pub init: bool,
}
