//! Result types for extraction runs

use serde::{Deserialize, Serialize};
use sift_domain::MessageLog;
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// Identifier for one run, used to correlate log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunId(Uuid);

impl RunId {
    /// Generate a new time-ordered id
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a run produced
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionOutcome<T> {
    /// Validated, and the reviewer found nothing to change
    Accepted(T),
    /// Validated, but the reviewer never signed off
    Unreviewed(T),
    /// No reply ever validated, or the run was cancelled
    NoResult,
}

impl<T> ExtractionOutcome<T> {
    /// The record, if any
    pub fn object(&self) -> Option<&T> {
        match self {
            ExtractionOutcome::Accepted(obj) | ExtractionOutcome::Unreviewed(obj) => Some(obj),
            ExtractionOutcome::NoResult => None,
        }
    }

    /// Consume into the record, if any
    pub fn into_object(self) -> Option<T> {
        match self {
            ExtractionOutcome::Accepted(obj) | ExtractionOutcome::Unreviewed(obj) => Some(obj),
            ExtractionOutcome::NoResult => None,
        }
    }

    /// Short label for status lines
    pub fn label(&self) -> &'static str {
        match self {
            ExtractionOutcome::Accepted(_) => "accepted",
            ExtractionOutcome::Unreviewed(_) => "unreviewed",
            ExtractionOutcome::NoResult => "no result",
        }
    }
}

/// Why a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The reviewer accepted a validated record
    Completed,
    /// The attempt cap was reached first
    AttemptsExhausted,
    /// The caller cancelled the run
    Cancelled,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Termination::Completed => "completed",
            Termination::AttemptsExhausted => "attempts exhausted",
            Termination::Cancelled => "cancelled",
        };
        f.write_str(label)
    }
}

/// Everything known about a finished run
#[derive(Debug, Clone)]
pub struct RunReport<T> {
    /// Run identifier
    pub run_id: RunId,
    /// Record produced, if any
    pub outcome: ExtractionOutcome<T>,
    /// Why the run stopped
    pub termination: Termination,
    /// Generation attempts used
    pub attempts: u32,
    /// Attempt cap in force
    pub max_attempts: u32,
    /// Reflection passes performed
    pub reflections: u32,
    /// Full conversation
    pub log: MessageLog,
    /// Wall-clock duration
    pub elapsed: Duration,
}

impl<T> RunReport<T> {
    /// The record, if any
    pub fn object(&self) -> Option<&T> {
        self.outcome.object()
    }

    /// Consume into the record, if any
    pub fn into_object(self) -> Option<T> {
        self.outcome.into_object()
    }

    /// Whether the reviewer signed off on the record
    pub fn is_accepted(&self) -> bool {
        matches!(self.outcome, ExtractionOutcome::Accepted(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_ids_are_unique_v7() {
        let first = RunId::new();
        let second = RunId::new();
        assert_ne!(first, second);
        assert_eq!(first.as_uuid().get_version_num(), 7);
    }

    #[test]
    fn test_outcome_object_access() {
        assert_eq!(ExtractionOutcome::Accepted(1).object(), Some(&1));
        assert_eq!(ExtractionOutcome::Unreviewed(2).into_object(), Some(2));
        assert_eq!(ExtractionOutcome::<i32>::NoResult.object(), None);
        assert_eq!(ExtractionOutcome::<i32>::NoResult.label(), "no result");
    }

    #[test]
    fn test_termination_serializes_snake_case() {
        let json = serde_json::to_string(&Termination::AttemptsExhausted).unwrap();
        assert_eq!(json, "\"attempts_exhausted\"");
    }
}
