//! # notez-llm: Remote Organizer for NOTEZ
//!
//! Optional delegate that asks a hosted or local model to organize a note.
//! Backends:
//!   - **Gemini** (`generateContent`, default)
//!   - **OpenAI-compatible API** (chat completions)
//!   - **Ollama** (local)
//!
//! Nothing here is load-bearing. Every failure is an [`LlmError`], and the
//! caller answers every error with the local rule-based pipeline.
//!
//! # Flow
//!
//! ```text
//! note + mode ──► PromptTemplate::render ──► LlmClient::generate
//!                                                  │
//!                     envelope::parse_reply ◄──────┘
//!                       │
//!                       ├─ Structured(Envelope)  → markdown or mermaid
//!                       ├─ Raw(text)             → markdown
//!                       └─ Empty / Malformed     → local pipeline
//! ```

pub mod client;
pub mod envelope;
pub mod error;
pub mod prompt;
pub mod types;

pub use client::{LlmClient, LlmProvider};
pub use envelope::{parse_reply, RemoteReply};
pub use error::LlmError;
pub use prompt::PromptTemplate;
pub use types::{Envelope, LlmRequest, LlmResponse};
