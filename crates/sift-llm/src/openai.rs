//! OpenAI-compatible chat completions client
//!
//! Works against any server exposing `/v1/chat/completions` (OpenAI, Groq,
//! vLLM, llama.cpp server, Ollama's compatibility layer).

use crate::http::{post_json, wire_messages, WireMessage};
use crate::LlmError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sift_domain::{ExternalServiceError, GeneratorClient, Message, MessageLog};
use std::time::Duration;
use tracing::debug;

/// Default OpenAI API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com";

/// Default timeout for generation requests (60 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Chat completions client
pub struct OpenAiClient {
    endpoint: String,
    model: String,
    api_key: Option<String>,
    temperature: f32,
    timeout: Duration,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiClient {
    /// Create a client for `model` at `endpoint`
    pub fn new(
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
            api_key: None,
            temperature: 0.0,
            timeout,
            client,
        })
    }

    /// Send `Authorization: Bearer <key>` with every request
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
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
impl GeneratorClient for OpenAiClient {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate(&self, log: &MessageLog) -> Result<Message, ExternalServiceError> {
        let url = format!("{}/v1/chat/completions", self.endpoint);
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: wire_messages(log),
            temperature: self.temperature,
        };

        let mut request = self.client.post(&url);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        debug!(model = self.model.as_str(), messages = log.len(), "Sending chat completion request");

        let response: ChatCompletionResponse = post_json(request, &body, self.timeout, &self.model).await?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ExternalServiceError::MalformedResponse("no choices in response".to_string()))?;

        Ok(Message::assistant(content))
    }
}
