//! Parsing of the organizer's reply text.
//!
//! The model is asked to wrap its answer in a ```` ```json ```` fence. What
//! actually comes back is sorted into a [`RemoteReply`] so the caller can
//! apply its fallback policy without parsing anything itself.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::error::LlmError;
use crate::types::Envelope;

// NOTE: expect() on a literal pattern can only trip on a typo in this file.
static JSON_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```json[ \t]*\r?\n(.*?)\r?\n[ \t]*```").expect("Invalid regex: json fence")
});

/// What the organizer sent back, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteReply {
    /// Blank reply text.
    Empty,
    /// A decoded envelope.
    Structured(Envelope),
    /// A fence was present but its JSON did not decode.
    Malformed(String),
    /// No fence at all; the trimmed reply text.
    Raw(String),
}

/// Find and decode the fenced envelope in `text`.
///
/// Returns `Ok(None)` when there is no fence.
///
/// # Errors
///
/// Returns [`LlmError::Envelope`] when the fenced block is not a valid
/// envelope object.
pub fn extract_envelope(text: &str) -> Result<Option<Envelope>, LlmError> {
    let Some(body) = JSON_FENCE.captures(text).and_then(|caps| caps.get(1)) else {
        return Ok(None);
    };
    serde_json::from_str(body.as_str())
        .map(Some)
        .map_err(|e| LlmError::Envelope(e.to_string()))
}

/// Classify raw reply text.
#[must_use]
pub fn parse_reply(text: &str) -> RemoteReply {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return RemoteReply::Empty;
    }
    match extract_envelope(trimmed) {
        Ok(Some(envelope)) => {
            debug!(mode = %envelope.mode, format = %envelope.format, "Decoded reply envelope");
            RemoteReply::Structured(envelope)
        }
        Ok(None) => {
            warn!("No JSON fence in reply, using raw text");
            RemoteReply::Raw(trimmed.to_string())
        }
        Err(e) => {
            warn!(error = %e, "Reply envelope did not decode");
            RemoteReply::Malformed(e.to_string())
        }
    }
}
