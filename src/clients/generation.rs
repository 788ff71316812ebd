use async_trait::async_trait;
use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::models::retry::Retryable;

/// Status codes that signal rate limiting or an upstream fault.
pub const TRANSIENT_STATUS_CODES: [u16; 4] = [429, 500, 503, 504];

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub system_instruction: String,
    pub user_message: String,
    pub response_schema: JsonValue,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum GenerationError {
    #[error("generation service returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("generation call timed out: {0}")]
    Timeout(String),

    #[error("generation service unreachable: {0}")]
    Transport(String),

    #[error("malformed generation response: {0}")]
    MalformedResponse(String),

    /// Failure without a structured status code.
    #[error("{0}")]
    Other(String),
}

impl Retryable for GenerationError {
    fn is_transient(&self) -> bool {
        match self {
            GenerationError::Status { status, .. } => TRANSIENT_STATUS_CODES.contains(status),
            GenerationError::Timeout(_) => true,
            GenerationError::Transport(_) | GenerationError::MalformedResponse(_) => false,
            GenerationError::Other(message) => mentions_transient_status(message),
        }
    }
}

/// Fallback classification for errors that only carry text: looks for one of
/// the transient status codes as a standalone number in the message.
pub fn mentions_transient_status(message: &str) -> bool {
    message
        .split(|c: char| !c.is_ascii_digit())
        .filter_map(|token| token.parse::<u16>().ok())
        .any(|code| TRANSIENT_STATUS_CODES.contains(&code))
}

/// Text-generation collaborator used to write notification copy.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Returns the raw response text, expected to be JSON matching
    /// `request.response_schema`.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;

    async fn health_check(&self) -> Result<(), GenerationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_status_drives_classification() {
        let rate_limited = GenerationError::Status {
            status: 429,
            message: "quota".to_string(),
        };
        let bad_request = GenerationError::Status {
            status: 400,
            message: "503 mentioned in text".to_string(),
        };

        assert!(rate_limited.is_transient());
        assert!(!bad_request.is_transient());
    }

    #[test]
    fn unstructured_errors_fall_back_to_message_scan() {
        assert!(GenerationError::Other("503 UNAVAILABLE".to_string()).is_transient());
        assert!(GenerationError::Other("got status=504".to_string()).is_transient());
        assert!(!GenerationError::Other("API key not valid".to_string()).is_transient());
        assert!(!GenerationError::Other("limit 15000 tokens".to_string()).is_transient());
    }

    #[test]
    fn timeouts_are_transient_and_transport_failures_are_not() {
        assert!(GenerationError::Timeout("no response within 30s".to_string()).is_transient());
        assert!(!GenerationError::Transport("dns failure".to_string()).is_transient());
    }
}
