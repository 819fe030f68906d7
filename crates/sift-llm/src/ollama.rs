//! Ollama Provider Implementation
//!
//! Provides integration with Ollama's local chat API.
//!
//! # Features
//!
//! - Async HTTP communication with the `/api/chat` endpoint
//! - Configurable endpoint, model and temperature
//! - Per-call timeout handling
//!
//! There is no retry loop here; a failed call is reported once and the
//! workflow controller decides whether another attempt is worth it.
//!
//! # Examples
//!
//! ```no_run
//! use sift_llm::OllamaClient;
//!
//! let client = OllamaClient::new("http://localhost:11434", "llama3").unwrap();
//! ```

use crate::http::{post_json, wire_messages, WireMessage};
use crate::LlmError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sift_domain::{ExternalServiceError, GeneratorClient, Message, MessageLog};
use std::time::Duration;
use tracing::debug;

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default timeout for generation requests (60 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Ollama API client for local LLM inference
pub struct OllamaClient {
    endpoint: String,
    model: String,
    temperature: f32,
    timeout: Duration,
    client: reqwest::Client,
}

/// Request body for Ollama chat API
#[derive(Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
}

/// Response from Ollama chat API
#[derive(Deserialize)]
struct OllamaChatResponse {
    message: Option<OllamaMessage>,
    #[allow(dead_code)]
    #[serde(default)]
    done: bool,
}

#[derive(Deserialize)]
struct OllamaMessage {
    content: String,
}

impl OllamaClient {
    /// Create a new Ollama client
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama API endpoint (e.g., "http://localhost:11434")
    /// - `model`: Model to use (e.g., "llama3", "mistral")
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        Self::with_timeout(endpoint, model, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client with an explicit per-call timeout
    pub fn with_timeout(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Client(e.to_string()))?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            temperature: 0.0,
            timeout,
            client,
        })
    }

    /// Create a new Ollama client on the default local endpoint
    pub fn default_endpoint(model: impl Into<String>) -> Result<Self, LlmError> {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    /// Set the sampling temperature (0.0 by default)
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Model this client talks to
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl GeneratorClient for OllamaClient {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn generate(&self, log: &MessageLog) -> Result<Message, ExternalServiceError> {
        let url = format!("{}/api/chat", self.endpoint);

        let request_body = OllamaChatRequest {
            model: &self.model,
            messages: wire_messages(log),
            stream: false,
            options: OllamaOptions {
                temperature: self.temperature,
            },
        };

        debug!(model = self.model.as_str(), messages = log.len(), "Sending request to Ollama");

        let response: OllamaChatResponse =
            post_json(self.client.post(&url), &request_body, self.timeout, &self.model).await?;

        let content = response
            .message
            .ok_or_else(|| ExternalServiceError::MalformedResponse("missing message".to_string()))?
            .content;

        Ok(Message::assistant(content))
    }
}
