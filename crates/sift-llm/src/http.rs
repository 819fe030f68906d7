//! Shared request plumbing for HTTP backends

use serde::de::DeserializeOwned;
use serde::Serialize;
use sift_domain::{ExternalServiceError, MessageLog};
use std::time::Duration;

/// Longest response body kept in a rejection error
const MAX_ERROR_BODY: usize = 512;

/// Chat message in the shape both Ollama and OpenAI accept
#[derive(Serialize)]
pub(crate) struct WireMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

/// Convert a log into wire messages, preserving order
pub(crate) fn wire_messages(log: &MessageLog) -> Vec<WireMessage<'_>> {
    log.iter()
        .map(|m| WireMessage {
            role: m.role().as_str(),
            content: m.content(),
        })
        .collect()
}

/// POST a JSON body and decode a JSON response, mapping every failure onto
/// the external-service taxonomy
pub(crate) async fn post_json<B, R>(
    request: reqwest::RequestBuilder,
    body: &B,
    timeout: Duration,
    model: &str,
) -> Result<R, ExternalServiceError>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let response = request
        .json(body)
        .send()
        .await
        .map_err(|e| transport_error(e, timeout))?;

    let status = response.status();
    if !status.is_success() {
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(classify_status(status, text, model));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| transport_error(e, timeout))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| ExternalServiceError::MalformedResponse(format!("Failed to parse response: {}", e)))
}

fn transport_error(error: reqwest::Error, timeout: Duration) -> ExternalServiceError {
    if error.is_timeout() {
        ExternalServiceError::Timeout(timeout)
    } else {
        ExternalServiceError::Connection(format!("Request failed: {}", error))
    }
}

pub(crate) fn classify_status(status: reqwest::StatusCode, body: String, model: &str) -> ExternalServiceError {
    match status {
        reqwest::StatusCode::TOO_MANY_REQUESTS => ExternalServiceError::RateLimited,
        reqwest::StatusCode::NOT_FOUND => ExternalServiceError::ModelNotAvailable(model.to_string()),
        _ => {
            let mut body = body;
            if body.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
            }
            ExternalServiceError::Rejected {
                status: status.as_u16(),
                body,
            }
        }
    }
}
