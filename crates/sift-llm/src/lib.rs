//! Sift Generator Backends
//!
//! Implementations of the `GeneratorClient` trait from `sift-domain`.
//!
//! # Architecture
//!
//! Every backend takes the full message log, makes exactly one request and
//! returns exactly one message. Nothing in this crate retries: a transport
//! failure, timeout or rejection surfaces as an `ExternalServiceError` and the
//! workflow controller decides what it costs.
//!
//! # Providers
//!
//! - `MockGenerator`: Deterministic scripted backend for testing
//! - `OllamaClient`: Local Ollama `/api/chat` integration
//! - `OpenAiClient`: OpenAI-compatible `/v1/chat/completions` integration
//! - `GatedGenerator`: Wraps any backend behind a shared `ConcurrencyGate`
//!
//! # Examples
//!
//! ```
//! use sift_domain::{GeneratorClient, Message, MessageLog};
//! use sift_llm::MockGenerator;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let generator = MockGenerator::new("Hello from LLM!");
//! let mut log = MessageLog::new();
//! log.push(Message::user("test prompt"));
//!
//! let reply = generator.generate(&log).await.unwrap();
//! assert_eq!(reply.content(), "Hello from LLM!");
//! # }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod gate;
mod http;
pub mod ollama;
pub mod openai;

use async_trait::async_trait;
use sift_domain::{ExternalServiceError, GeneratorClient, Message, MessageLog};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

pub use config::{build_generator, Backend, GeneratorConfig};
pub use gate::{ConcurrencyGate, GatedGenerator};
pub use ollama::OllamaClient;
pub use openai::OpenAiClient;

/// Errors that can occur while setting up a backend
#[derive(Error, Debug)]
pub enum LlmError {
    /// Invalid backend configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The environment variable holding the API key is not set
    #[error("API key not found in environment variable '{0}'")]
    MissingApiKey(String),

    /// The HTTP client could not be built
    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

type Scripted = Result<String, ExternalServiceError>;

/// Mock generator for deterministic testing
///
/// Replies are taken from a script in order; once the script is exhausted the
/// default response is returned. Every request log is recorded so tests can
/// inspect exactly what the backend was shown.
///
/// # Examples
///
/// ```
/// use sift_domain::ExternalServiceError;
/// use sift_llm::MockGenerator;
///
/// let generator = MockGenerator::new("fallback")
///     .with_response("first")
///     .with_error(ExternalServiceError::RateLimited)
///     .with_response("third");
/// assert_eq!(generator.remaining(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct MockGenerator {
    name: String,
    default_response: String,
    script: Arc<Mutex<VecDeque<Scripted>>>,
    requests: Arc<Mutex<Vec<MessageLog>>>,
    call_count: Arc<Mutex<usize>>,
    delay: Option<Duration>,
}

impl MockGenerator {
    /// Create a mock that always answers with `response`
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            name: "mock".to_string(),
            default_response: response.into(),
            script: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
            delay: None,
        }
    }

    /// Create a mock that answers with `responses` in order
    pub fn scripted<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mock = Self::default();
        for response in responses {
            mock.push_response(response);
        }
        mock
    }

    /// Set the backend name reported in logs
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sleep this long before every reply
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue a reply (builder style)
    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.push_response(response);
        self
    }

    /// Queue a failure (builder style)
    pub fn with_error(self, error: ExternalServiceError) -> Self {
        self.push_error(error);
        self
    }

    /// Queue a reply
    pub fn push_response(&self, response: impl Into<String>) {
        self.script.lock().unwrap().push_back(Ok(response.into()));
    }

    /// Queue a failure
    pub fn push_error(&self, error: ExternalServiceError) {
        self.script.lock().unwrap().push_back(Err(error));
    }

    /// Number of scripted entries not yet consumed
    pub fn remaining(&self) -> usize {
        self.script.lock().unwrap().len()
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        *self.call_count.lock().unwrap() = 0;
    }

    /// Logs received so far, in call order
    pub fn requests(&self) -> Vec<MessageLog> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

#[async_trait]
impl GeneratorClient for MockGenerator {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, log: &MessageLog) -> Result<Message, ExternalServiceError> {
        *self.call_count.lock().unwrap() += 1;
        self.requests.lock().unwrap().push(log.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Ok(response)) => Ok(Message::assistant(response)),
            Some(Err(error)) => Err(error),
            None => Ok(Message::assistant(self.default_response.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt(text: &str) -> MessageLog {
        let mut log = MessageLog::new();
        log.push(Message::user(text));
        log
    }

    #[tokio::test]
    async fn test_mock_generator_default() {
        let generator = MockGenerator::new("Test response");
        let reply = generator.generate(&prompt("any prompt")).await.unwrap();
        assert_eq!(reply.content(), "Test response");
        assert_eq!(reply.role(), sift_domain::Role::Assistant);
    }

    #[tokio::test]
    async fn test_mock_generator_script_order() {
        let generator = MockGenerator::scripted(["one", "two"]);

        assert_eq!(generator.generate(&prompt("a")).await.unwrap().content(), "one");
        assert_eq!(generator.generate(&prompt("b")).await.unwrap().content(), "two");
        assert_eq!(
            generator.generate(&prompt("c")).await.unwrap().content(),
            "Default mock response"
        );
    }

    #[tokio::test]
    async fn test_mock_generator_call_count() {
        let generator = MockGenerator::new("test");
        assert_eq!(generator.call_count(), 0);

        generator.generate(&prompt("1")).await.unwrap();
        assert_eq!(generator.call_count(), 1);

        generator.generate(&prompt("2")).await.unwrap();
        assert_eq!(generator.call_count(), 2);

        generator.reset_call_count();
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_mock_generator_error() {
        let generator = MockGenerator::default().with_error(ExternalServiceError::RateLimited);

        let result = generator.generate(&prompt("bad prompt")).await;
        assert_eq!(result, Err(ExternalServiceError::RateLimited));
        assert_eq!(generator.remaining(), 0);
    }

    #[tokio::test]
    async fn test_mock_generator_records_requests() {
        let generator = MockGenerator::new("ok");
        generator.generate(&prompt("first")).await.unwrap();

        let requests = generator.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].last().unwrap().content(), "first");
    }

    #[tokio::test]
    async fn test_mock_generator_clone_shares_state() {
        let generator1 = MockGenerator::scripted(["only"]);
        let generator2 = generator1.clone();

        generator1.generate(&prompt("x")).await.unwrap();

        // Both should share the same call count and script due to Arc
        assert_eq!(generator2.call_count(), 1);
        assert_eq!(generator2.remaining(), 0);
    }
}
