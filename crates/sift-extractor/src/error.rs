//! Error types for the extraction workflow
//!
//! Only `ExtractorError` ever leaves `Workflow::run`. The other types describe
//! a single failed step; the workflow turns them into corrective messages and
//! carries on.

use sift_domain::{ExternalServiceError, FieldIssue, SchemaError};
use thiserror::Error;

/// Fatal errors that abort a run before it starts
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Text exceeds maximum length
    #[error("Text too long: {0} chars (max: {1})")]
    TextTooLong(usize, usize),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The target descriptor is malformed
    #[error("Invalid target schema: {0}")]
    Schema(#[from] SchemaError),
}

/// No candidate payload could be located in generated text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no JSON payload found in the response")]
pub struct ExtractionFailed;

/// A candidate payload did not yield a valid record
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Payload is not parseable as JSON
    #[error("payload is not valid JSON: {0}")]
    NotStructured(String),

    /// Payload parsed but disagrees with the descriptor
    #[error("{}", join_issues(.0))]
    Schema(Vec<FieldIssue>),

    /// Payload passed the descriptor check but the record could not be built
    #[error("could not build record: {0}")]
    Construct(String),
}

impl ValidationError {
    /// Field-level problems, empty unless this is a schema mismatch
    pub fn issues(&self) -> &[FieldIssue] {
        match self {
            ValidationError::Schema(issues) => issues,
            _ => &[],
        }
    }
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Why a generated message did not produce a record
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CandidateError {
    /// Nothing to parse
    #[error(transparent)]
    Extraction(#[from] ExtractionFailed),

    /// Something to parse, but not a valid record
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// The critique pass could not produce a verdict
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReflectionError {
    /// Critique backend failed or timed out
    #[error("reflection call failed: {0}")]
    Service(#[from] ExternalServiceError),

    /// Critique reply did not contain a usable review
    #[error("reflection reply unusable: {0}")]
    Malformed(#[from] CandidateError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_lists_every_issue() {
        let err = ValidationError::Schema(vec![
            FieldIssue {
                path: "name".to_string(),
                problem: "is missing".to_string(),
            },
            FieldIssue {
                path: "age".to_string(),
                problem: "has wrong type: expected integer, found string".to_string(),
            },
        ]);
        assert_eq!(
            err.to_string(),
            "field 'name' is missing; field 'age' has wrong type: expected integer, found string"
        );
        assert_eq!(err.issues().len(), 2);
    }

    #[test]
    fn test_candidate_error_is_transparent() {
        let err: CandidateError = ExtractionFailed.into();
        assert_eq!(err.to_string(), "no JSON payload found in the response");
    }

    #[test]
    fn test_text_too_long_message() {
        let err = ExtractorError::TextTooLong(60_000, 50_000);
        assert_eq!(err.to_string(), "Text too long: 60000 chars (max: 50000)");
    }
}
