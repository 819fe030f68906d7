//! Configuration for the extraction workflow

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a `Workflow`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Generation attempts allowed per run
    pub max_attempts: u32,

    /// Maximum time for a single generator call (seconds)
    pub call_timeout_secs: u64,

    /// Maximum input text length (characters)
    pub max_text_length: usize,
}

impl ExtractorConfig {
    /// Get the per-call timeout as a Duration
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 {
            return Err("max_attempts must be greater than 0".to_string());
        }
        if self.call_timeout_secs == 0 {
            return Err("call_timeout_secs must be greater than 0".to_string());
        }
        if self.max_text_length == 0 {
            return Err("max_text_length must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Same configuration with a different attempt cap
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }
}

impl Default for ExtractorConfig {
    /// Default configuration with balanced settings
    fn default() -> Self {
        Self {
            max_attempts: 5,
            call_timeout_secs: 60,
            max_text_length: 50_000,
        }
    }
}

impl ExtractorConfig {
    /// Aggressive preset: fewer attempts and shorter timeouts
    pub fn aggressive() -> Self {
        Self {
            max_attempts: 3,
            call_timeout_secs: 30,
            max_text_length: 20_000,
        }
    }

    /// Lenient preset: more attempts and room for slow local models
    pub fn lenient() -> Self {
        Self {
            max_attempts: 8,
            call_timeout_secs: 180,
            max_text_length: 100_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExtractorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.call_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(ExtractorConfig::aggressive().validate().is_ok());
        assert!(ExtractorConfig::lenient().validate().is_ok());
        assert!(ExtractorConfig::aggressive().max_attempts < ExtractorConfig::lenient().max_attempts);
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let config = ExtractorConfig::default().with_max_attempts(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = ExtractorConfig {
            call_timeout_secs: 0,
            ..ExtractorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_section_uses_defaults() {
        let config: ExtractorConfig = serde_json::from_str(r#"{"max_attempts": 2}"#).unwrap();
        assert_eq!(config.max_attempts, 2);
        assert_eq!(config.max_text_length, 50_000);
    }
}
