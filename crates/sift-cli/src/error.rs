//! Error types for the CLI application.

use sift_extractor::ExtractorError;
use sift_llm::LlmError;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Backend could not be set up
    #[error("Backend error: {0}")]
    Llm(#[from] LlmError),

    /// Run could not start
    #[error("Extraction error: {0}")]
    Extractor(#[from] ExtractorError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Input file type is not handled
    #[error("Unsupported file type: {0} (expected .txt, .md or .text)")]
    UnsupportedFile(String),

    /// Input file needs converting to text first
    #[error("{format} documents are not read directly; convert {path} to text first")]
    NeedsConversion {
        /// Offending file
        path: String,
        /// Detected format
        format: String,
    },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
