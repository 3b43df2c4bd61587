//! LLM Client: unified interface for Gemini, OpenAI-compatible, and Ollama
//! backends.

use std::time::{Duration, Instant};

use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::error::LlmError;
use crate::types::{LlmRequest, LlmResponse};

/// Provider backend for the remote organizer.
#[derive(Clone)]
pub enum LlmProvider {
    /// Google Gemini `generateContent` API.
    Gemini {
        /// API root, e.g. `https://generativelanguage.googleapis.com`.
        base_url: String,
        /// API key sent as `x-goog-api-key`.
        api_key: String,
    },
    /// OpenAI-compatible chat completions API.
    OpenAiCompatible {
        /// API root (without `/v1`).
        base_url: String,
        /// Bearer token.
        api_key: String,
    },
    /// Ollama running locally.
    Ollama {
        /// Ollama root, e.g. `http://localhost:11434`.
        base_url: String,
    },
    /// No provider: every call fails, triggering the local fallback.
    None,
}

impl LlmProvider {
    /// Build a provider from its config name.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::ConfigError`] for an unknown name, or when a
    /// keyed provider is selected without a key.
    pub fn from_name(name: &str, base_url: &str, api_key: Option<&str>) -> Result<Self, LlmError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let require_key = || {
            api_key
                .map(str::to_string)
                .ok_or_else(|| LlmError::ConfigError(format!("provider '{name}' needs an API key")))
        };
        match name.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini {
                base_url,
                api_key: require_key()?,
            }),
            "openai" => Ok(Self::OpenAiCompatible {
                base_url,
                api_key: require_key()?,
            }),
            "ollama" => Ok(Self::Ollama { base_url }),
            "none" | "" => Ok(Self::None),
            other => Err(LlmError::ConfigError(format!("unknown provider: '{other}'"))),
        }
    }

    /// Short provider name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Gemini { .. } => "gemini",
            Self::OpenAiCompatible { .. } => "openai",
            Self::Ollama { .. } => "ollama",
            Self::None => "none",
        }
    }
}

impl std::fmt::Debug for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gemini { base_url, .. } | Self::OpenAiCompatible { base_url, .. } => f
                .debug_struct(self.name())
                .field("base_url", base_url)
                .finish_non_exhaustive(),
            Self::Ollama { base_url } => f.debug_struct("ollama").field("base_url", base_url).finish(),
            Self::None => f.write_str("none"),
        }
    }
}

/// The client that routes organizer requests to the configured backend.
#[derive(Debug)]
pub struct LlmClient {
    provider: LlmProvider,
    http: Client,
    model: String,
    max_retries: u32,
}

impl LlmClient {
    /// Create a new client.
    #[must_use]
    pub fn new(provider: LlmProvider, model: impl Into<String>, max_retries: u32) -> Self {
        Self {
            provider,
            http: Client::new(),
            model: model.into(),
            max_retries,
        }
    }

    /// Create a client with no backend (all calls fail → local fallback).
    #[must_use]
    pub fn none() -> Self {
        Self::new(LlmProvider::None, String::new(), 0)
    }

    /// Check if the client has a backend configured.
    #[must_use]
    pub fn is_available(&self) -> bool {
        !matches!(self.provider, LlmProvider::None)
    }

    /// The configured provider.
    #[must_use]
    pub fn provider(&self) -> &LlmProvider {
        &self.provider
    }

    /// Generate a reply.
    ///
    /// # Errors
    ///
    /// Returns `Err` if no provider is configured, the response body cannot
    /// be decoded, or every attempt fails. The caller falls back to local
    /// rules on any error.
    pub async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        match &self.provider {
            LlmProvider::None => Err(LlmError::Unavailable("No LLM provider configured".into())),
            LlmProvider::Gemini { base_url, api_key } => {
                self.generate_gemini(base_url, api_key, request).await
            }
            LlmProvider::OpenAiCompatible { base_url, api_key } => {
                self.generate_openai(base_url, api_key, request).await
            }
            LlmProvider::Ollama { base_url } => self.generate_ollama(base_url, request).await,
        }
    }

    /// Generate using Gemini's `generateContent`.
    async fn generate_gemini(
        &self,
        base_url: &str,
        api_key: &str,
        request: &LlmRequest,
    ) -> Result<LlmResponse, LlmError> {
        let url = format!("{base_url}/v1beta/models/{}:generateContent", self.model);
        let body = json!({
            "contents": [{
                "parts": [{ "text": request.combined_prompt() }]
            }],
            "generationConfig": {
                "temperature": request.temperature,
                "maxOutputTokens": request.max_tokens,
            }
        });

        let (json, latency_ms) = self
            .post_with_retries("Gemini", request.timeout_ms, || {
                self.http.post(&url).header("x-goog-api-key", api_key).json(&body)
            })
            .await?;

        let text = json["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .unwrap_or("")
            .to_string();
        Ok(self.response(text, &json["usageMetadata"]["candidatesTokenCount"], latency_ms))
    }

    /// Generate using an OpenAI-compatible API.
    async fn generate_openai(
        &self,
        base_url: &str,
        api_key: &str,
        request: &LlmRequest,
    ) -> Result<LlmResponse, LlmError> {
        let url = format!("{base_url}/v1/chat/completions");
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": request.system },
                { "role": "user", "content": request.user },
            ],
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
        });

        let (json, latency_ms) = self
            .post_with_retries("OpenAI", request.timeout_ms, || {
                self.http.post(&url).bearer_auth(api_key).json(&body)
            })
            .await?;

        let text = json["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or("")
            .to_string();
        Ok(self.response(text, &json["usage"]["completion_tokens"], latency_ms))
    }

    /// Generate using Ollama's API.
    async fn generate_ollama(&self, base_url: &str, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        let url = format!("{base_url}/api/generate");
        let body = json!({
            "model": self.model,
            "prompt": request.combined_prompt(),
            "stream": false,
            "options": {
                "temperature": request.temperature,
                "num_predict": request.max_tokens,
            }
        });

        let (json, latency_ms) = self
            .post_with_retries("Ollama", request.timeout_ms, || self.http.post(&url).json(&body))
            .await?;

        let text = json["response"].as_str().unwrap_or("").to_string();
        Ok(self.response(text, &json["eval_count"], latency_ms))
    }

    /// POST until a 2xx arrives or the retry budget runs out.
    ///
    /// Returns the decoded body and the latency of the successful attempt.
    async fn post_with_retries(
        &self,
        backend: &'static str,
        timeout_ms: u64,
        build: impl Fn() -> RequestBuilder,
    ) -> Result<(Value, u64), LlmError> {
        let mut last_error = LlmError::Unavailable(format!("{backend} was never reached"));
        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                debug!(
                    backend,
                    attempt = attempt + 1,
                    max = self.max_retries + 1,
                    "Retrying LLM call"
                );
            }

            let start = Instant::now();
            let result = build().timeout(Duration::from_millis(timeout_ms)).send().await;
            let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

            match result {
                Ok(resp) if resp.status().is_success() => {
                    let json: Value = resp
                        .json()
                        .await
                        .map_err(|e| LlmError::ParseError(e.to_string()))?;
                    return Ok((json, latency_ms));
                }
                Ok(resp) => {
                    let status = resp.status();
                    last_error =
                        LlmError::RequestFailed(format!("HTTP {status}: {}", resp.text().await.unwrap_or_default()));
                    warn!(backend, %status, "LLM backend returned error");
                }
                Err(e) => {
                    last_error = LlmError::transport(&e, timeout_ms);
                    warn!(backend, error = %last_error, "LLM request failed");
                }
            }
        }

        Err(LlmError::RetriesExhausted {
            attempts: self.max_retries + 1,
            last_error: Box::new(last_error),
        })
    }

    fn response(&self, text: String, tokens: &Value, latency_ms: u64) -> LlmResponse {
        LlmResponse {
            text,
            tokens_generated: tokens.as_u64().and_then(|t| u32::try_from(t).ok()).unwrap_or(0),
            latency_ms,
            model: self.model.clone(),
        }
    }
}
