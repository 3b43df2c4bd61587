//! Remote organizer error types.
//!
//! None of these reach the user: every variant ends in the local pipeline.

use thiserror::Error;

/// Errors that can occur while asking the remote organizer.
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP request failed.
    #[error("LLM request failed: {0}")]
    RequestFailed(String),

    /// Provider response body was not the expected JSON.
    #[error("Failed to parse LLM response as JSON: {0}")]
    ParseError(String),

    /// A fenced JSON envelope was found but could not be decoded.
    #[error("Malformed response envelope: {0}")]
    Envelope(String),

    /// Request timed out.
    #[error("LLM request timed out after {0}ms")]
    Timeout(u64),

    /// Provider is unavailable or not configured.
    #[error("LLM provider unavailable: {0}")]
    Unavailable(String),

    /// All retry attempts exhausted.
    #[error("All LLM retry attempts exhausted after {attempts} tries: {last_error}")]
    RetriesExhausted {
        /// Attempts made, first try included.
        attempts: u32,
        /// Error from the final attempt.
        last_error: Box<LlmError>,
    },

    /// Configuration error.
    #[error("LLM configuration error: {0}")]
    ConfigError(String),
}

impl LlmError {
    /// Classify a transport failure for a request sent with `timeout_ms`.
    pub(crate) fn transport(err: &reqwest::Error, timeout_ms: u64) -> Self {
        if err.is_timeout() {
            LlmError::Timeout(timeout_ms)
        } else if err.is_connect() {
            LlmError::Unavailable(err.to_string())
        } else {
            LlmError::RequestFailed(err.to_string())
        }
    }
}
