//! Backend configuration and construction

use crate::gate::{ConcurrencyGate, GatedGenerator};
use crate::{LlmError, OllamaClient, OpenAiClient};
use serde::{Deserialize, Serialize};
use sift_domain::GeneratorClient;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Which wire protocol a backend speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Ollama `/api/chat`
    #[default]
    Ollama,
    /// OpenAI-compatible `/v1/chat/completions`
    #[serde(rename = "openai")]
    OpenAi,
}

/// Configuration for one generator backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Wire protocol
    #[serde(default)]
    pub backend: Backend,

    /// Model name passed through to the backend
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL; the backend default is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Name of the environment variable holding the API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,

    /// Sampling temperature
    #[serde(default)]
    pub temperature: f32,

    /// Per-call timeout (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Concurrent requests the backend accepts
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

fn default_model() -> String {
    "llama3".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_concurrency() -> usize {
    4
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Ollama,
            model: default_model(),
            endpoint: None,
            api_key_env: None,
            temperature: 0.0,
            timeout_secs: default_timeout_secs(),
            max_concurrency: default_max_concurrency(),
        }
    }
}

impl GeneratorConfig {
    /// Get the per-call timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Endpoint to use, falling back to the backend default
    pub fn resolved_endpoint(&self) -> &str {
        match (&self.endpoint, self.backend) {
            (Some(endpoint), _) => endpoint.as_str(),
            (None, Backend::Ollama) => crate::ollama::DEFAULT_ENDPOINT,
            (None, Backend::OpenAi) => crate::openai::DEFAULT_ENDPOINT,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }
        if self.max_concurrency == 0 {
            return Err("max_concurrency must be greater than 0".to_string());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!("temperature {} out of range [0.0, 2.0]", self.temperature));
        }
        Ok(())
    }
}

/// Build a gated generator from configuration
///
/// Pass a shared `gate` to make several generators (e.g. extraction and
/// reflection against the same server) draw from one capacity pool; otherwise
/// a gate sized to `max_concurrency` is created.
pub fn build_generator(
    config: &GeneratorConfig,
    gate: Option<ConcurrencyGate>,
) -> Result<Arc<dyn GeneratorClient>, LlmError> {
    config.validate().map_err(LlmError::Config)?;

    let gate = gate.unwrap_or_else(|| ConcurrencyGate::new(config.max_concurrency));
    let endpoint = config.resolved_endpoint().to_string();

    info!(
        backend = ?config.backend,
        model = config.model.as_str(),
        endpoint = endpoint.as_str(),
        capacity = gate.capacity(),
        "Building generator"
    );

    let generator: Arc<dyn GeneratorClient> = match config.backend {
        Backend::Ollama => {
            let client = OllamaClient::with_timeout(endpoint, config.model.clone(), config.timeout())?
                .with_temperature(config.temperature);
            Arc::new(GatedGenerator::new(client, gate))
        }
        Backend::OpenAi => {
            let mut client = OpenAiClient::new(endpoint, config.model.clone(), config.timeout())?
                .with_temperature(config.temperature);
            if let Some(var) = &config.api_key_env {
                let key = std::env::var(var).map_err(|_| LlmError::MissingApiKey(var.clone()))?;
                client = client.with_api_key(key);
            }
            Arc::new(GatedGenerator::new(client, gate))
        }
    };

    Ok(generator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GeneratorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.temperature, 0.0);
        assert_eq!(config.resolved_endpoint(), crate::ollama::DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_invalid_timeout() {
        let config = GeneratorConfig {
            timeout_secs: 0,
            ..GeneratorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_concurrency() {
        let config = GeneratorConfig {
            max_concurrency: 0,
            ..GeneratorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_section_with_defaults() {
        let config: GeneratorConfig = toml::from_str(
            r#"
            backend = "openai"
            model = "gpt-4o-mini"
            api_key_env = "OPENAI_API_KEY"
            "#,
        )
        .unwrap();

        assert_eq!(config.backend, Backend::OpenAi);
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.max_concurrency, 4);
        assert_eq!(config.resolved_endpoint(), crate::openai::DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = GeneratorConfig {
            endpoint: Some("http://gpu-box:11434".to_string()),
            ..GeneratorConfig::default()
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: GeneratorConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_build_generator_ollama() {
        let generator = build_generator(&GeneratorConfig::default(), None).unwrap();
        assert_eq!(generator.name(), "ollama");
    }

    #[test]
    fn test_build_generator_missing_api_key() {
        let config = GeneratorConfig {
            backend: Backend::OpenAi,
            api_key_env: Some("SIFT_TEST_KEY_THAT_IS_NOT_SET".to_string()),
            ..GeneratorConfig::default()
        };
        let result = build_generator(&config, None);
        assert!(matches!(result, Err(LlmError::MissingApiKey(_))));
    }

    #[test]
    fn test_build_generator_rejects_invalid_config() {
        let config = GeneratorConfig {
            model: String::new(),
            ..GeneratorConfig::default()
        };
        assert!(matches!(build_generator(&config, None), Err(LlmError::Config(_))));
    }
}
