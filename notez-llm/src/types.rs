//! Core types for remote organizer requests and responses.

use serde::{Deserialize, Serialize};

/// A request to the remote organizer.
#[derive(Debug, Clone, Serialize)]
pub struct LlmRequest {
    /// System prompt (role, output contract, rules).
    pub system: String,
    /// User turn: the raw note plus the requested mode.
    pub user: String,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Temperature (0.0 = deterministic).
    pub temperature: f32,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl LlmRequest {
    /// Create a request with the organizer defaults (temperature 0.3,
    /// 2048 output tokens, 15 s timeout).
    #[must_use]
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            max_tokens: 2048,
            temperature: 0.3,
            timeout_ms: 15_000,
        }
    }

    /// Set the maximum output tokens.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// System and user turns as one prompt, for single-prompt providers.
    #[must_use]
    pub fn combined_prompt(&self) -> String {
        format!("{}\n\n{}", self.system, self.user)
    }
}

/// A response from the remote organizer.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmResponse {
    /// The generated text.
    pub text: String,
    /// How many tokens were generated.
    pub tokens_generated: u32,
    /// Latency in milliseconds.
    pub latency_ms: u64,
    /// Which model was used.
    pub model: String,
}

/// Structured reply carried inside the ```` ```json ```` fence.
///
/// Missing fields take the organizer defaults: `organize` / `markdown` /
/// empty content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// `organize` or `visualize`.
    #[serde(default = "default_mode")]
    pub mode: String,
    /// Markdown or diagram text.
    #[serde(default)]
    pub content: String,
    /// `markdown` or `mermaid`.
    #[serde(default = "default_format")]
    pub format: String,
}

impl Envelope {
    /// Whether the content is diagram text.
    #[must_use]
    pub fn is_mermaid(&self) -> bool {
        self.format.trim().eq_ignore_ascii_case("mermaid")
    }
}

fn default_mode() -> String {
    "organize".to_string()
}

fn default_format() -> String {
    "markdown".to_string()
}
