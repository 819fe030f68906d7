//! Output formatting for the CLI.

use crate::cli::CliFormat;
use crate::error::Result;
use colored::*;
use serde::Serialize;
use sift_domain::MessageLog;
use sift_extractor::{ExtractionOutcome, RunReport};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Characters of each message shown in the log table.
const PREVIEW_CHARS: usize = 80;

/// Output formatter.
pub struct Formatter {
    format: CliFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: CliFormat, color_enabled: bool) -> Self {
        Self { format, color_enabled }
    }

    /// Render an extracted record for stdout.
    pub fn record<T: Serialize>(&self, record: &T) -> Result<String> {
        Ok(match self.format {
            CliFormat::Pretty => serde_json::to_string_pretty(record)?,
            CliFormat::Json => serde_json::to_string(record)?,
        })
    }

    /// One-line summary of a finished run.
    pub fn run_status<T>(&self, report: &RunReport<T>) -> String {
        let message = format!(
            "{} ({}) after {}/{} attempt(s), {} review(s), {:.1}s [run {}]",
            report.outcome.label(),
            report.termination,
            report.attempts,
            report.max_attempts,
            report.reflections,
            report.elapsed.as_secs_f64(),
            report.run_id
        );
        match report.outcome {
            ExtractionOutcome::Accepted(_) => self.success(&message),
            ExtractionOutcome::Unreviewed(_) => self.warning(&message),
            ExtractionOutcome::NoResult => self.error(&message),
        }
    }

    /// Format the conversation as a table.
    pub fn message_log(&self, log: &MessageLog) -> String {
        if log.is_empty() {
            return self.colorize("No messages.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["#", "Role", "Content"]);
        for (index, message) in log.iter().enumerate() {
            builder.push_record([
                index.to_string(),
                message.role().to_string(),
                preview(message.content()),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

/// First line of `content`, shortened for the log table.
fn preview(content: &str) -> String {
    let flat = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= PREVIEW_CHARS {
        return flat;
    }
    let cut: String = flat.chars().take(PREVIEW_CHARS - 1).collect();
    format!("{}…", cut)
}
