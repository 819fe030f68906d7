//! Run state and transition policy
//!
//! A run moves through five steps:
//!
//! ```text
//! INIT -> GENERATE -> VALIDATE -+-> REFLECT -+-> GENERATE ...
//!            ^                  |            |
//!            +------ fail ------+            +-> END
//!                               +-> END
//! ```
//!
//! Transitions are pure functions of the state so the policy can be tested
//! without a generator.

use crate::types::RunId;
use sift_domain::{Message, MessageLog, SchemaDescriptor};

/// Outcome of the latest validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationStatus {
    /// Nothing validated yet
    Pending,
    /// Latest reply did not validate
    Fail,
    /// Latest reply validated
    Pass,
}

/// Outcome of the latest review
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReflectionStatus {
    /// No review yet
    NotStarted,
    /// Reviewer asked for changes
    NeedsWork,
    /// Reviewer accepted the record
    Completed,
}

/// Workflow step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Build the opening messages
    Init,
    /// Ask the generator for a reply
    Generate,
    /// Check the latest reply
    Validate,
    /// Ask the reviewer about the latest record
    Reflect,
    /// Stop
    End,
}

/// Mutable state of one run
///
/// The message log only ever grows and `attempt_count` never exceeds
/// `max_attempts`.
#[derive(Debug, Clone)]
pub struct RunState<T> {
    run_id: RunId,
    source_text: String,
    schema: SchemaDescriptor,
    log: MessageLog,
    attempt_count: u32,
    max_attempts: u32,
    validation_status: ValidationStatus,
    reflection_status: ReflectionStatus,
    parsed_object: Option<T>,
    reflections: u32,
}

impl<T> RunState<T> {
    /// Fresh state for extracting `schema` from `source_text`
    pub fn new(source_text: impl Into<String>, schema: SchemaDescriptor, max_attempts: u32) -> Self {
        Self {
            run_id: RunId::new(),
            source_text: source_text.into(),
            schema,
            log: MessageLog::new(),
            attempt_count: 0,
            max_attempts,
            validation_status: ValidationStatus::Pending,
            reflection_status: ReflectionStatus::NotStarted,
            parsed_object: None,
            reflections: 0,
        }
    }

    /// Run identifier
    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Text being extracted from
    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    /// Target descriptor
    pub fn schema(&self) -> &SchemaDescriptor {
        &self.schema
    }

    /// Conversation so far
    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    /// Generation attempts used
    pub fn attempt_count(&self) -> u32 {
        self.attempt_count
    }

    /// Attempt cap
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Whether another attempt is allowed
    pub fn attempts_exhausted(&self) -> bool {
        self.attempt_count >= self.max_attempts
    }

    /// Latest validation outcome
    pub fn validation_status(&self) -> ValidationStatus {
        self.validation_status
    }

    /// Latest review outcome
    pub fn reflection_status(&self) -> ReflectionStatus {
        self.reflection_status
    }

    /// Last record that validated
    pub fn parsed_object(&self) -> Option<&T> {
        self.parsed_object.as_ref()
    }

    /// Review passes performed
    pub fn reflections(&self) -> u32 {
        self.reflections
    }

    /// Seed the log with the opening messages and reset the counters
    pub(crate) fn init(&mut self, opening: [Message; 2]) {
        for message in opening {
            self.log.push(message);
        }
        self.attempt_count = 0;
        self.validation_status = ValidationStatus::Fail;
        self.reflection_status = ReflectionStatus::NotStarted;
    }

    /// Count a generation attempt, returning its number
    pub(crate) fn begin_attempt(&mut self) -> u32 {
        debug_assert!(self.attempt_count < self.max_attempts);
        self.attempt_count += 1;
        self.attempt_count
    }

    /// Append a message
    pub(crate) fn append(&mut self, message: Message) {
        self.log.push(message);
    }

    /// Mark the latest reply as invalid
    pub(crate) fn record_failure(&mut self) {
        self.validation_status = ValidationStatus::Fail;
    }

    /// Keep a freshly validated record
    pub(crate) fn record_success(&mut self, object: T) {
        self.validation_status = ValidationStatus::Pass;
        self.parsed_object = Some(object);
    }

    /// Record a review outcome
    pub(crate) fn record_reflection(&mut self, accepted: bool) {
        self.reflections += 1;
        self.reflection_status = if accepted {
            ReflectionStatus::Completed
        } else {
            ReflectionStatus::NeedsWork
        };
    }

    /// Hand over the log and the last record
    pub(crate) fn into_parts(self) -> (MessageLog, Option<T>) {
        (self.log, self.parsed_object)
    }
}

/// Step that follows `current`
pub fn next_step<T>(current: Step, state: &RunState<T>) -> Step {
    match current {
        Step::Init => Step::Generate,
        Step::Generate => Step::Validate,
        Step::Validate => after_validate(state),
        Step::Reflect => after_reflect(state),
        Step::End => Step::End,
    }
}

/// Routing after VALIDATE, first matching rule wins
pub fn after_validate<T>(state: &RunState<T>) -> Step {
    if state.attempts_exhausted() {
        return Step::End;
    }
    match (state.validation_status, state.reflection_status) {
        (ValidationStatus::Pass, ReflectionStatus::Completed) => Step::End,
        (ValidationStatus::Pass, _) => Step::Reflect,
        _ => Step::Generate,
    }
}

/// Routing after REFLECT
pub fn after_reflect<T>(state: &RunState<T>) -> Step {
    match state.reflection_status {
        ReflectionStatus::NeedsWork => Step::Generate,
        _ => Step::End,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(max_attempts: u32) -> RunState<String> {
        let mut state = RunState::new("text", SchemaDescriptor::new("S", "s"), max_attempts);
        state.init([Message::system("sys"), Message::user("text")]);
        state
    }

    #[test]
    fn test_init_sets_fail_and_not_started() {
        let state = state(3);
        assert_eq!(state.log().len(), 2);
        assert_eq!(state.attempt_count(), 0);
        assert_eq!(state.validation_status(), ValidationStatus::Fail);
        assert_eq!(state.reflection_status(), ReflectionStatus::NotStarted);
        assert_eq!(next_step(Step::Init, &state), Step::Generate);
    }

    #[test]
    fn test_failed_validation_retries() {
        let mut state = state(3);
        state.begin_attempt();
        state.record_failure();
        assert_eq!(next_step(Step::Validate, &state), Step::Generate);
    }

    #[test]
    fn test_pass_goes_to_reflect() {
        let mut state = state(3);
        state.begin_attempt();
        state.record_success("obj".to_string());
        assert_eq!(next_step(Step::Validate, &state), Step::Reflect);
    }

    #[test]
    fn test_cap_wins_over_pass() {
        let mut state = state(1);
        state.begin_attempt();
        state.record_success("obj".to_string());
        assert_eq!(next_step(Step::Validate, &state), Step::End);
    }

    #[test]
    fn test_pass_after_completed_review_ends() {
        let mut state = state(5);
        state.begin_attempt();
        state.record_success("obj".to_string());
        state.record_reflection(true);
        assert_eq!(after_validate(&state), Step::End);
    }

    #[test]
    fn test_reflect_routing() {
        let mut state = state(5);
        state.record_reflection(false);
        assert_eq!(next_step(Step::Reflect, &state), Step::Generate);
        state.record_reflection(true);
        assert_eq!(next_step(Step::Reflect, &state), Step::End);
        assert_eq!(state.reflections(), 2);
    }

    #[test]
    fn test_failure_keeps_previous_object() {
        let mut state = state(5);
        state.begin_attempt();
        state.record_success("first".to_string());
        state.begin_attempt();
        state.record_failure();
        assert_eq!(state.parsed_object().map(String::as_str), Some("first"));
        assert_eq!(state.validation_status(), ValidationStatus::Fail);
    }

    #[test]
    fn test_end_is_terminal() {
        assert_eq!(next_step(Step::End, &state(1)), Step::End);
    }
}
