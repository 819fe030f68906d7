//! The extraction workflow controller

use crate::cancel::CancellationToken;
use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::prompt::{self, PromptBuilder};
use crate::reflector::{ReflectionVerdict, Reflector};
use crate::state::{next_step, ReflectionStatus, RunState, Step};
use crate::types::{ExtractionOutcome, RunReport, Termination};
use crate::validator::parse_candidate;
use sift_domain::{Extractable, GeneratorClient, Role, SchemaDescriptor};
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// A step stopped because the run was cancelled
struct Interrupted;

/// Extracts one record type from text by generate, validate and review rounds
///
/// A workflow holds no per-run state, so one instance can serve any number of
/// concurrent runs.
pub struct Workflow<T> {
    generator: Arc<dyn GeneratorClient>,
    reflector: Reflector,
    config: ExtractorConfig,
    schema: SchemaDescriptor,
    _record: PhantomData<fn() -> T>,
}

impl<T: Extractable> Workflow<T> {
    /// Create a workflow for `T` using `generator` for every call
    ///
    /// # Errors
    ///
    /// Fails if `config` is invalid or `T`'s descriptor is malformed.
    pub fn new(generator: Arc<dyn GeneratorClient>, config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;
        let schema = T::schema();
        schema.ensure_well_formed()?;

        let reflector = Reflector::new(Arc::clone(&generator), config.call_timeout());
        Ok(Self {
            generator,
            reflector,
            config,
            schema,
            _record: PhantomData,
        })
    }

    /// Use a different generator for the review pass
    pub fn with_reflector(mut self, generator: Arc<dyn GeneratorClient>) -> Self {
        self.reflector = Reflector::new(generator, self.config.call_timeout());
        self
    }

    /// Configuration in force
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Descriptor of the target record
    pub fn schema(&self) -> &SchemaDescriptor {
        &self.schema
    }

    /// Extract a record, returning only the record
    ///
    /// `Ok(None)` means the run completed without any reply validating.
    pub async fn extract(&self, text: &str) -> Result<Option<T>, ExtractorError> {
        Ok(self.run(text).await?.into_object())
    }

    /// Extract a record and report how the run went
    pub async fn run(&self, text: &str) -> Result<RunReport<T>, ExtractorError> {
        self.run_with_cancel(text, &CancellationToken::new()).await
    }

    /// Like [`Workflow::run`], stopping early once `cancel` fires
    pub async fn run_with_cancel(
        &self,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<RunReport<T>, ExtractorError> {
        let length = text.chars().count();
        if length > self.config.max_text_length {
            return Err(ExtractorError::TextTooLong(length, self.config.max_text_length));
        }

        let started = Instant::now();
        let mut state = RunState::new(text, self.schema.clone(), self.config.max_attempts);
        let run_id = state.run_id();

        info!(
            run_id = %run_id,
            target = self.schema.name(),
            backend = self.generator.name(),
            reviewer = self.reflector.backend(),
            text_length = length,
            max_attempts = self.config.max_attempts,
            "Starting extraction"
        );

        let mut step = Step::Init;
        let mut cancelled = false;
        while step != Step::End {
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            debug!(run_id = %run_id, step = ?step, attempt = state.attempt_count(), "Entering step");

            let flow = match step {
                Step::Init => {
                    self.init(&mut state);
                    Ok(())
                }
                Step::Generate => self.generate(&mut state, cancel).await,
                Step::Validate => {
                    self.validate(&mut state);
                    Ok(())
                }
                Step::Reflect => self.reflect(&mut state, cancel).await,
                Step::End => Ok(()),
            };
            if flow.is_err() {
                cancelled = true;
                break;
            }

            step = next_step(step, &state);
        }

        let termination = if cancelled {
            Termination::Cancelled
        } else if state.reflection_status() == ReflectionStatus::Completed {
            Termination::Completed
        } else {
            Termination::AttemptsExhausted
        };
        let accepted = state.reflection_status() == ReflectionStatus::Completed;
        let attempts = state.attempt_count();
        let reflections = state.reflections();
        let (log, parsed) = state.into_parts();

        // A cancelled run reports no result even if a reply had validated
        let outcome = match parsed {
            _ if cancelled => ExtractionOutcome::NoResult,
            Some(object) if accepted => ExtractionOutcome::Accepted(object),
            Some(object) => ExtractionOutcome::Unreviewed(object),
            None => ExtractionOutcome::NoResult,
        };

        let elapsed = started.elapsed();
        if cancelled {
            warn!(run_id = %run_id, attempts, "Extraction cancelled");
        }
        info!(
            run_id = %run_id,
            outcome = outcome.label(),
            termination = %termination,
            attempts,
            reflections,
            messages = log.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Extraction finished"
        );

        Ok(RunReport {
            run_id,
            outcome,
            termination,
            attempts,
            max_attempts: self.config.max_attempts,
            reflections,
            log,
            elapsed,
        })
    }

    fn init(&self, state: &mut RunState<T>) {
        let opening = PromptBuilder::new(state.source_text(), T::format_instructions()).initial_messages();
        state.init(opening);
    }

    async fn generate(&self, state: &mut RunState<T>, cancel: &CancellationToken) -> Result<(), Interrupted> {
        let attempt = state.begin_attempt();
        let run_id = state.run_id();
        let timeout = self.config.call_timeout();

        info!(
            run_id = %run_id,
            attempt,
            max_attempts = state.max_attempts(),
            messages = state.log().len(),
            "Requesting generation"
        );

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Interrupted),
            result = self.generator.generate_within(state.log(), timeout) => result,
        };

        match result {
            Ok(reply) => {
                debug!(run_id = %run_id, attempt, reply_length = reply.content().len(), "Received reply");
                state.append(reply);
            }
            Err(error) => {
                warn!(run_id = %run_id, attempt, error = %error, "Generation failed");
                state.record_failure();
                state.append(prompt::service_failure(&error));
            }
        }
        Ok(())
    }

    fn validate(&self, state: &mut RunState<T>) {
        let run_id = state.run_id();
        let attempt = state.attempt_count();

        let candidate = match state.log().last() {
            Some(reply) if reply.role() == Role::Assistant => parse_candidate::<T>(reply.content(), state.schema()),
            _ => {
                debug!(run_id = %run_id, attempt, "No reply to validate");
                state.record_failure();
                return;
            }
        };

        match candidate {
            Ok(object) => {
                info!(run_id = %run_id, attempt, "Reply validated");
                state.record_success(object);
            }
            Err(error) => {
                warn!(run_id = %run_id, attempt, error = %error, "Reply failed validation");
                state.record_failure();
                state.append(prompt::correction(&error));
            }
        }
    }

    async fn reflect(&self, state: &mut RunState<T>, cancel: &CancellationToken) -> Result<(), Interrupted> {
        let run_id = state.run_id();

        let Some(parsed) = state.parsed_object() else {
            state.record_reflection(false);
            return Ok(());
        };

        let review = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Interrupted),
            review = self.reflector.reflect(state.log(), parsed) => review,
        };

        let verdict = match review {
            Ok(verdict) => verdict,
            Err(error) => {
                warn!(run_id = %run_id, error = %error, "Review failed, treating as needs work");
                ReflectionVerdict::unavailable(&error)
            }
        };

        info!(run_id = %run_id, verdict = ?verdict.verdict, "Review complete");
        state.record_reflection(verdict.is_perfect());
        state.append(prompt::reflection_feedback(&verdict.review, &verdict.recommendations));
        Ok(())
    }
}

/// Extract a `T` from `text` with default settings and `max_attempts`
pub async fn extract<T: Extractable>(
    generator: Arc<dyn GeneratorClient>,
    text: &str,
    max_attempts: u32,
) -> Result<Option<T>, ExtractorError> {
    let config = ExtractorConfig::default().with_max_attempts(max_attempts);
    Workflow::<T>::new(generator, config)?.extract(text).await
}
