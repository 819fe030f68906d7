//! Load input documents as plain text.

use crate::error::{CliError, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Read `path` as UTF-8 text.
///
/// Plain text and Markdown are read as-is. PDF and Word documents are
/// recognised but must be converted to text before extraction.
pub fn load_text(path: &Path) -> Result<String> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("txt") | Some("md") | Some("text") => {
            let text = fs::read_to_string(path)?;
            if text.trim().is_empty() {
                return Err(CliError::InvalidInput(format!("{} is empty", path.display())));
            }
            debug!(path = %path.display(), chars = text.chars().count(), "Loaded input");
            Ok(text)
        }
        Some(format @ ("pdf" | "docx")) => Err(CliError::NeedsConversion {
            path: path.display().to_string(),
            format: format.to_uppercase(),
        }),
        _ => Err(CliError::UnsupportedFile(path.display().to_string())),
    }
}
