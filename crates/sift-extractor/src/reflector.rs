//! Critique pass over a validated record
//!
//! The reviewer sees the original instructions (the first two log messages)
//! and the parsed record, and answers with a `ReflectionRecord`. The verdict
//! is `perfect` or anything else; anything else sends the workflow back to
//! GENERATE with the review appended to the log.

use crate::error::ReflectionError;
use crate::prompt::reflection_request;
use crate::records::ReflectionRecord;
use crate::validator::parse_candidate;
use serde::Serialize;
use sift_domain::{ExternalServiceError, Extractable, GeneratorClient, MessageLog};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Messages from the start of the log the reviewer gets to see
const CONTEXT_MESSAGES: usize = 2;

/// Reviewer's decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// No changes needed
    Perfect,
    /// Changes requested
    NeedsWork,
}

/// A review, ready to append to the log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflectionVerdict {
    /// Free-form review
    pub review: String,
    /// Requested changes
    pub recommendations: String,
    /// Decision
    pub verdict: Verdict,
}

impl ReflectionVerdict {
    /// Verdict used when the critique pass itself failed
    pub fn unavailable(reason: &ReflectionError) -> Self {
        Self {
            review: format!("The review could not be completed: {}", reason),
            recommendations: String::new(),
            verdict: Verdict::NeedsWork,
        }
    }

    /// Whether the reviewer accepted the record
    pub fn is_perfect(&self) -> bool {
        self.verdict == Verdict::Perfect
    }
}

impl From<ReflectionRecord> for ReflectionVerdict {
    fn from(record: ReflectionRecord) -> Self {
        let verdict = if record.is_perfect() {
            Verdict::Perfect
        } else {
            Verdict::NeedsWork
        };
        Self {
            review: record.review,
            recommendations: record.recommendations,
            verdict,
        }
    }
}

/// Runs the critique pass against a generator
#[derive(Clone)]
pub struct Reflector {
    generator: Arc<dyn GeneratorClient>,
    timeout: Duration,
}

impl Reflector {
    /// Create a reflector calling `generator` with a per-call `timeout`
    pub fn new(generator: Arc<dyn GeneratorClient>, timeout: Duration) -> Self {
        Self { generator, timeout }
    }

    /// Name of the reviewing backend
    pub fn backend(&self) -> &str {
        self.generator.name()
    }

    /// Review `parsed` in the context of the run's opening messages
    pub async fn reflect<T: Serialize>(
        &self,
        log: &MessageLog,
        parsed: &T,
    ) -> Result<ReflectionVerdict, ReflectionError> {
        let parsed_json = serde_json::to_string_pretty(parsed).map_err(|e| {
            ReflectionError::Service(ExternalServiceError::MalformedResponse(format!(
                "could not render record: {}",
                e
            )))
        })?;

        let mut request = log.prefix(CONTEXT_MESSAGES);
        request.push(reflection_request(&parsed_json, &ReflectionRecord::format_instructions()));

        debug!(backend = self.generator.name(), messages = request.len(), "Requesting review");

        let reply = self.generator.generate_within(&request, self.timeout).await?;

        let record: ReflectionRecord = parse_candidate(reply.content(), &ReflectionRecord::schema())?;
        Ok(record.into())
    }
}
