//! Organizer: remote delegate first, local rules always behind it.
//!
//! | Remote outcome | Result |
//! |----------------|--------|
//! | no client (no credential / provider `none`) | local |
//! | request error after retries | local, logged at `warn` |
//! | empty reply, malformed envelope, empty content | local |
//! | unfenced text | remote text as markdown |
//! | `markdown` envelope | remote markdown |
//! | `mermaid` envelope passing the syntax check | remote diagram |
//! | `mermaid` envelope failing it | [`InvalidDiagramPolicy`] |
//!
//! Every path ends in a [`ProcessedNote`]; nothing here is surfaced as an
//! error once the organizer is built.

use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};

use notez_core::pipeline::{degrade_to_bullets, meets_min_length, render_local};
use notez_core::validate::{is_valid_diagram, strip_fence};
use notez_core::{classifier, Credential, InvalidDiagramPolicy, Mode, NotezConfig, ProcessedNote};
use notez_llm::{parse_reply, LlmClient, LlmProvider, LlmRequest, PromptTemplate, RemoteReply};

use crate::error::Result;

/// Where a processed note came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteSource {
    /// The remote organizer's reply, used as-is.
    Remote,
    /// The local rule-based pipeline.
    Local,
    /// A remote diagram that failed the syntax check, shown as bullets.
    Degraded,
}

/// One processed note plus how it was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// The note.
    pub note: ProcessedNote,
    /// Which path produced it.
    pub source: NoteSource,
    /// Mode the pass ran in (after smart-mode resolution).
    pub mode: Mode,
}

/// Processes notes with the optional remote delegate and the local fallback.
#[derive(Debug)]
pub struct Organizer {
    config: NotezConfig,
    client: Option<LlmClient>,
    prompt: PromptTemplate,
}

impl Organizer {
    /// Build an organizer.
    ///
    /// Keyed providers (`gemini`, `openai`) are used only when `credential`
    /// is present; `ollama` needs none; `none` disables the delegate.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown provider name or an unreadable
    /// `llm.prompt_file`.
    pub fn new(config: NotezConfig, credential: Option<&Credential>) -> Result<Self> {
        let provider_name = config.llm.provider.trim().to_ascii_lowercase();
        let keyed = matches!(provider_name.as_str(), "gemini" | "openai");

        let client = match (keyed, credential) {
            (true, None) => {
                debug!(provider = %provider_name, "No credential, remote organizer disabled");
                None
            }
            (_, credential) => {
                if let Some(c) = credential.filter(|c| !c.looks_valid()) {
                    warn!(chars = c.expose().chars().count(), "Credential looks too short to be valid");
                }
                let key = if keyed { credential.map(Credential::expose) } else { None };
                let provider = LlmProvider::from_name(&provider_name, &config.llm.base_url, key)?;
                let client = LlmClient::new(provider, config.llm.model.clone(), config.llm.max_retries);
                client.is_available().then_some(client)
            }
        };

        let prompt = match &config.llm.prompt_file {
            Some(path) => PromptTemplate::from_file(path)?,
            None => PromptTemplate::builtin(),
        };

        if let Some(client) = &client {
            info!(provider = client.provider().name(), model = %config.llm.model, "Remote organizer enabled");
        }
        Ok(Self { config, client, prompt })
    }

    /// Organizer that never calls out.
    #[must_use]
    pub fn offline(config: NotezConfig) -> Self {
        Self {
            config,
            client: None,
            prompt: PromptTemplate::builtin(),
        }
    }

    /// Whether a remote delegate is configured.
    #[must_use]
    pub fn has_remote(&self) -> bool {
        self.client.is_some()
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &NotezConfig {
        &self.config
    }

    /// Process `text` as of today. See [`Self::process_on`].
    pub async fn process(&self, text: &str, requested: Mode) -> Option<Outcome> {
        self.process_on(text, requested, Local::now().date_naive()).await
    }

    /// Process `text`; `None` when it is below the minimum length.
    ///
    /// Nothing is classified and no request is sent for short input.
    pub async fn process_on(&self, text: &str, requested: Mode, today: NaiveDate) -> Option<Outcome> {
        if !meets_min_length(text, self.config.processing.min_length) {
            debug!(min_length = self.config.processing.min_length, "Note below minimum length, skipping");
            return None;
        }
        let mode = classifier::resolve_mode(text, requested, self.config.processing.smart_mode);

        let Some(client) = &self.client else {
            return Some(self.local(text, mode, today));
        };

        let (system, user) = self.prompt.render(text, mode.as_str());
        let request = LlmRequest::new(system, user)
            .with_max_tokens(self.config.llm.max_output_tokens)
            .with_temperature(self.config.llm.temperature)
            .with_timeout(self.config.llm.request_timeout_ms);

        match client.generate(&request).await {
            Ok(response) => {
                debug!(
                    latency_ms = response.latency_ms,
                    tokens = response.tokens_generated,
                    "Remote organizer replied"
                );
                Some(self.resolve_reply(parse_reply(&response.text), text, mode, today))
            }
            Err(e) => {
                warn!(error = %e, "Remote organizer failed, using local rules");
                Some(self.local(text, mode, today))
            }
        }
    }

    /// Turn a classified remote reply into an outcome.
    #[must_use]
    pub fn resolve_reply(&self, reply: RemoteReply, text: &str, mode: Mode, today: NaiveDate) -> Outcome {
        match reply {
            RemoteReply::Empty | RemoteReply::Malformed(_) => self.local(text, mode, today),
            RemoteReply::Raw(raw) => remote(ProcessedNote::organized(raw), mode),
            RemoteReply::Structured(envelope) if envelope.content.trim().is_empty() => {
                debug!("Remote envelope has no content");
                self.local(text, mode, today)
            }
            RemoteReply::Structured(envelope) if envelope.is_mermaid() => {
                let dsl = strip_fence(&envelope.content);
                if is_valid_diagram(dsl) {
                    return remote(ProcessedNote::diagram(dsl), Mode::Visualize);
                }
                warn!(policy = ?self.config.llm.invalid_diagram, "Remote diagram failed syntax check");
                match self.config.llm.invalid_diagram {
                    InvalidDiagramPolicy::Local => self.local(text, Mode::Visualize, today),
                    InvalidDiagramPolicy::Bullets => Outcome {
                        note: degrade_to_bullets(dsl),
                        source: NoteSource::Degraded,
                        mode: Mode::Organize,
                    },
                }
            }
            RemoteReply::Structured(envelope) => remote(ProcessedNote::organized(envelope.content), Mode::Organize),
        }
    }

    fn local(&self, text: &str, mode: Mode, today: NaiveDate) -> Outcome {
        Outcome {
            note: render_local(text, mode, &self.config, today),
            source: NoteSource::Local,
            mode,
        }
    }
}

/// Environment variable that overrides the stored credential.
pub const CREDENTIAL_ENV: &str = "GEMINI_API_KEY";

/// Pick the credential for this run: the stored key wins, and a non-blank
/// environment value is used only when nothing is stored.
#[must_use]
pub fn pick_credential(env_value: Option<&str>, stored: Option<Credential>) -> Option<Credential> {
    stored.or_else(|| env_value.and_then(Credential::new))
}

/// [`pick_credential`] against the process environment.
#[must_use]
pub fn resolve_credential(stored: Option<Credential>) -> Option<Credential> {
    let env_value = std::env::var(CREDENTIAL_ENV).ok();
    pick_credential(env_value.as_deref(), stored)
}

fn remote(note: ProcessedNote, mode: Mode) -> Outcome {
    Outcome {
        note,
        source: NoteSource::Remote,
        mode,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notez_llm::Envelope;

    const NOTE: &str = "first user enters email\nthen creates password\nfinally account activated";

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 14).expect("valid date")
    }

    fn envelope(format: &str, content: &str) -> RemoteReply {
        RemoteReply::Structured(Envelope {
            mode: "visualize".into(),
            content: content.into(),
            format: format.into(),
        })
    }

    #[test]
    fn keyed_provider_without_credential_stays_offline() {
        let organizer = Organizer::new(NotezConfig::default(), None).expect("build");
        assert!(!organizer.has_remote());
    }

    #[test]
    fn credential_enables_remote() {
        let key = Credential::new(&"x".repeat(40)).expect("key");
        let organizer = Organizer::new(NotezConfig::default(), Some(&key)).expect("build");
        assert!(organizer.has_remote());
    }

    #[test]
    fn provider_none_disables_remote_even_with_key() {
        let mut config = NotezConfig::default();
        config.llm.provider = "none".into();
        let key = Credential::new(&"x".repeat(40)).expect("key");
        assert!(!Organizer::new(config, Some(&key)).expect("build").has_remote());
    }

    #[test]
    fn unknown_provider_is_an_error() {
        let mut config = NotezConfig::default();
        config.llm.provider = "palm".into();
        let key = Credential::new(&"x".repeat(40)).expect("key");
        assert!(Organizer::new(config, Some(&key)).is_err());
    }

    #[test]
    fn stored_credential_wins_over_environment() {
        let stored = Credential::new("stored-key");
        let picked = pick_credential(Some("env-key"), stored.clone()).expect("key");
        assert_eq!(picked.expose(), "stored-key");
        let picked = pick_credential(None, stored).expect("key");
        assert_eq!(picked.expose(), "stored-key");
    }

    #[test]
    fn environment_credential_fills_in_unless_blank() {
        let picked = pick_credential(Some("env-key"), None).expect("key");
        assert_eq!(picked.expose(), "env-key");
        assert!(pick_credential(Some("   "), None).is_none());
        assert!(pick_credential(None, None).is_none());
    }

    #[test]
    fn valid_remote_diagram_is_kept_verbatim() {
        let organizer = Organizer::offline(NotezConfig::default());
        let dsl = "flowchart LR\n  A[Sign up] --> B[Verify]";
        let outcome = organizer.resolve_reply(envelope("mermaid", dsl), NOTE, Mode::Visualize, today());
        assert_eq!(outcome.source, NoteSource::Remote);
        assert_eq!(outcome.note, ProcessedNote::diagram(dsl));
    }

    #[test]
    fn invalid_remote_diagram_uses_local_by_default() {
        let organizer = Organizer::offline(NotezConfig::default());
        let outcome = organizer.resolve_reply(envelope("mermaid", "not a diagram"), NOTE, Mode::Visualize, today());
        assert_eq!(outcome.source, NoteSource::Local);
        assert!(outcome.note.source().starts_with("graph TD"));
    }

    #[test]
    fn invalid_remote_diagram_can_degrade_to_bullets() {
        let mut config = NotezConfig::default();
        config.llm.invalid_diagram = InvalidDiagramPolicy::Bullets;
        let organizer = Organizer::offline(config);
        let outcome = organizer.resolve_reply(envelope("mermaid", "step one\nstep two"), NOTE, Mode::Visualize, today());
        assert_eq!(outcome.source, NoteSource::Degraded);
        assert_eq!(outcome.note.source(), "- step one\n- step two\n");
    }

    #[test]
    fn markdown_envelope_is_rendered() {
        let organizer = Organizer::offline(NotezConfig::default());
        let outcome = organizer.resolve_reply(envelope("markdown", "# Plan\n- a"), NOTE, Mode::Organize, today());
        assert_eq!(outcome.source, NoteSource::Remote);
        assert!(outcome.note.content().contains("<h1>Plan</h1>"));
    }

    #[test]
    fn unusable_replies_fall_back_locally() {
        let organizer = Organizer::offline(NotezConfig::default());
        for reply in [
            RemoteReply::Empty,
            RemoteReply::Malformed("eof".into()),
            envelope("markdown", "   "),
        ] {
            let outcome = organizer.resolve_reply(reply, NOTE, Mode::Organize, today());
            assert_eq!(outcome.source, NoteSource::Local);
            assert!(!outcome.note.is_empty());
        }
    }

    #[test]
    fn raw_reply_becomes_markdown() {
        let organizer = Organizer::offline(NotezConfig::default());
        let outcome = organizer.resolve_reply(RemoteReply::Raw("## Notes".into()), NOTE, Mode::Visualize, today());
        assert_eq!(outcome.source, NoteSource::Remote);
        assert_eq!(outcome.note.source(), "## Notes");
    }

    #[tokio::test]
    async fn offline_processing_is_local() {
        let organizer = Organizer::offline(NotezConfig::default());
        let outcome = organizer.process_on(NOTE, Mode::Visualize, today()).await.expect("processed");
        assert_eq!(outcome.source, NoteSource::Local);
        assert_eq!(outcome.note.source().matches("-->").count(), 2);
        assert!(organizer.process_on("too short", Mode::Organize, today()).await.is_none());
    }
}
