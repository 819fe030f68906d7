//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the control loop and infrastructure.
//! Generator backends live in `sift-llm`; record types live in `sift-extractor`.

use crate::message::{Message, MessageLog};
use crate::schema::SchemaDescriptor;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Failure talking to a generative text backend
///
/// Backends never retry on their own; the workflow controller decides what a
/// failure costs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExternalServiceError {
    /// Backend unreachable or transport failed mid-request
    #[error("Connection error: {0}")]
    Connection(String),

    /// No response within the per-call budget
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Backend refused the request because of rate limiting
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Backend does not serve the requested model
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Non-success status
    #[error("Request rejected with HTTP {status}: {body}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Response body, possibly truncated
        body: String,
    },

    /// Response body could not be understood
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Trait for generative text backends
///
/// Implemented by the infrastructure layer (sift-llm). A client is stateless
/// between calls: everything the backend should see is in `log`.
#[async_trait]
pub trait GeneratorClient: Send + Sync {
    /// Backend identifier, used in logs
    fn name(&self) -> &str;

    /// Produce one new message continuing `log`
    ///
    /// The caller is responsible for appending the returned message.
    async fn generate(&self, log: &MessageLog) -> Result<Message, ExternalServiceError>;

    /// Like [`GeneratorClient::generate`], failing with
    /// [`ExternalServiceError::Timeout`] if the call takes longer than `limit`
    ///
    /// Wrappers that queue before calling through override this so the limit
    /// covers only the backend call itself.
    async fn generate_within(&self, log: &MessageLog, limit: Duration) -> Result<Message, ExternalServiceError> {
        tokio::time::timeout(limit, self.generate(log))
            .await
            .unwrap_or(Err(ExternalServiceError::Timeout(limit)))
    }
}

#[async_trait]
impl<G> GeneratorClient for Arc<G>
where
    G: GeneratorClient + ?Sized,
{
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn generate(&self, log: &MessageLog) -> Result<Message, ExternalServiceError> {
        (**self).generate(log).await
    }

    async fn generate_within(&self, log: &MessageLog, limit: Duration) -> Result<Message, ExternalServiceError> {
        (**self).generate_within(log, limit).await
    }
}

/// A record type that can be extracted from text
///
/// Implemented once per record shape by the application layer (sift-extractor).
pub trait Extractable: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Descriptor for this record type
    fn schema() -> SchemaDescriptor;

    /// Generator-facing instructions for producing this record
    fn format_instructions() -> String {
        Self::schema().format_instructions()
    }

    /// Build an instance from a payload that already passed the descriptor check
    fn construct(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldKind, FieldSpec};
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Named {
        name: String,
    }

    impl Extractable for Named {
        fn schema() -> SchemaDescriptor {
            SchemaDescriptor::new("Named", "Something with a name")
                .field(FieldSpec::required("name", FieldKind::String, "The name"))
        }
    }

    struct Echo;

    #[async_trait]
    impl GeneratorClient for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        async fn generate(&self, log: &MessageLog) -> Result<Message, ExternalServiceError> {
            let last = log
                .last()
                .ok_or_else(|| ExternalServiceError::MalformedResponse("empty log".to_string()))?;
            Ok(Message::assistant(last.content()))
        }
    }

    struct Stalled;

    #[async_trait]
    impl GeneratorClient for Stalled {
        fn name(&self) -> &str {
            "stalled"
        }

        async fn generate(&self, _log: &MessageLog) -> Result<Message, ExternalServiceError> {
            tokio::time::sleep(Duration::from_secs(600)).await;
            Ok(Message::assistant("too late"))
        }
    }

    #[test]
    fn test_default_construct() {
        let named = Named::construct(serde_json::json!({"name": "John Smith"})).unwrap();
        assert_eq!(named.name, "John Smith");
    }

    #[test]
    fn test_default_format_instructions() {
        assert!(Named::format_instructions().contains("\"Named\""));
    }

    #[tokio::test]
    async fn test_arc_generator_delegates() {
        let generator: Arc<dyn GeneratorClient> = Arc::new(Echo);
        let mut log = MessageLog::new();
        log.push(Message::user("ping"));

        let reply = generator.generate(&log).await.unwrap();
        assert_eq!(reply.content(), "ping");
        assert_eq!(generator.name(), "echo");
    }

    #[tokio::test(start_paused = true)]
    async fn test_generate_within_times_out() {
        let limit = Duration::from_secs(5);
        let result = Stalled.generate_within(&MessageLog::new(), limit).await;
        assert_eq!(result, Err(ExternalServiceError::Timeout(limit)));
    }

    #[tokio::test]
    async fn test_generate_within_passes_reply_through() {
        let generator: Arc<dyn GeneratorClient> = Arc::new(Echo);
        let mut log = MessageLog::new();
        log.push(Message::user("ping"));

        let reply = generator.generate_within(&log, Duration::from_secs(5)).await.unwrap();
        assert_eq!(reply.content(), "ping");
    }

    #[test]
    fn test_error_display() {
        let err = ExternalServiceError::Rejected {
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "Request rejected with HTTP 500: boom");
    }
}
