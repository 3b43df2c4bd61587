//! Configuration for NOTEZ.
//!
//! Maps directly to `notez.toml`. Every field has a default, so an empty
//! file (or no file at all) yields a working configuration.

use serde::{Deserialize, Serialize};

use crate::error::{NotezError, Result};

/// Top-level NOTEZ configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotezConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// When and how notes are processed.
    #[serde(default)]
    pub processing: ProcessingConfig,
    /// Diagram rendering limits.
    #[serde(default)]
    pub diagram: DiagramConfig,
    /// Remote organizer settings.
    #[serde(default)]
    pub llm: LlmConfig,
    /// Local key-value store settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

impl NotezConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `NotezError::Config` if the TOML is invalid or a value is out
    /// of range.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str).map_err(|e| NotezError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Reject values that would make rendering degenerate.
    ///
    /// # Errors
    /// Returns `NotezError::Config` naming the offending field.
    pub fn validate(&self) -> Result<()> {
        if self.diagram.max_nodes == 0 {
            return Err(NotezError::Config("diagram.max_nodes must be at least 1".into()));
        }
        if self.diagram.label_max_chars < 4 {
            return Err(NotezError::Config(
                "diagram.label_max_chars must be at least 4".into(),
            ));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(NotezError::Config(format!(
                "llm.temperature must be within 0.0..=2.0, got {}",
                self.llm.temperature
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General system settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Log format: "pretty" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

/// Processing triggers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Trimmed inputs shorter than this are never processed.
    #[serde(default = "default_min_length")]
    pub min_length: usize,
    /// Inactivity delay before an edit triggers processing.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Inactivity delay before the draft is persisted.
    #[serde(default = "default_autosave_ms")]
    pub autosave_ms: u64,
    /// Pick organize/visualize automatically instead of using the toggle.
    #[serde(default)]
    pub smart_mode: bool,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            min_length: default_min_length(),
            debounce_ms: default_debounce_ms(),
            autosave_ms: default_autosave_ms(),
            smart_mode: false,
        }
    }
}

/// Diagram rendering limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagramConfig {
    /// Maximum number of nodes (or bars) in any rendered diagram.
    #[serde(default = "default_max_nodes")]
    pub max_nodes: usize,
    /// Node labels longer than this are cut and suffixed with `...`.
    #[serde(default = "default_label_max_chars")]
    pub label_max_chars: usize,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            max_nodes: default_max_nodes(),
            label_max_chars: default_label_max_chars(),
        }
    }
}

/// What to do when the remote organizer returns diagram text that fails the
/// syntax check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidDiagramPolicy {
    /// Re-run the request through the local visualize pipeline.
    #[default]
    Local,
    /// Keep the remote text but show it as a markdown bullet list.
    Bullets,
}

/// Remote organizer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider: "gemini", "openai", "ollama", "none".
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Base URL for the provider API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model name.
    #[serde(default = "default_model")]
    pub model: String,
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum generated tokens.
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    /// Hard timeout for one call in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Retries after the first attempt before falling back to local rules.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Handling of remote diagrams that fail the syntax check.
    #[serde(default)]
    pub invalid_diagram: InvalidDiagramPolicy,
    /// Optional TOML file overriding the built-in system prompt.
    #[serde(default)]
    pub prompt_file: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            request_timeout_ms: default_request_timeout_ms(),
            max_retries: default_max_retries(),
            invalid_diagram: InvalidDiagramPolicy::default(),
            prompt_file: None,
        }
    }
}

/// Local key-value store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path of the SQLite file holding the draft, credential, and preferences.
    #[serde(default = "default_storage_path")]
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "pretty".to_string()
}
fn default_min_length() -> usize {
    10
}
fn default_debounce_ms() -> u64 {
    2000
}
fn default_autosave_ms() -> u64 {
    3000
}
fn default_max_nodes() -> usize {
    10
}
fn default_label_max_chars() -> usize {
    20
}
fn default_provider() -> String {
    "gemini".to_string()
}
fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}
fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}
fn default_temperature() -> f32 {
    0.3
}
fn default_max_output_tokens() -> u32 {
    2048
}
fn default_request_timeout_ms() -> u64 {
    15_000
}
fn default_max_retries() -> u32 {
    1
}
fn default_storage_path() -> String {
    "notez.db".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = NotezConfig::from_toml("").expect("empty config should parse");
        assert_eq!(config.processing.min_length, 10);
        assert_eq!(config.processing.debounce_ms, 2000);
        assert_eq!(config.processing.autosave_ms, 3000);
        assert_eq!(config.diagram.max_nodes, 10);
        assert_eq!(config.llm.max_output_tokens, 2048);
        assert_eq!(config.llm.invalid_diagram, InvalidDiagramPolicy::Local);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = NotezConfig::from_toml(
            r#"
            [diagram]
            max_nodes = 8

            [llm]
            provider = "ollama"
            invalid_diagram = "bullets"
            "#,
        )
        .expect("should parse");
        assert_eq!(config.diagram.max_nodes, 8);
        assert_eq!(config.diagram.label_max_chars, 20);
        assert_eq!(config.llm.provider, "ollama");
        assert_eq!(config.llm.invalid_diagram, InvalidDiagramPolicy::Bullets);
        assert!((config.llm.temperature - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn zero_node_cap_is_rejected() {
        let err = NotezConfig::from_toml("[diagram]\nmax_nodes = 0").expect_err("zero cap");
        assert!(matches!(err, NotezError::Config(_)));
    }

    #[test]
    fn malformed_toml_is_config_error() {
        let err = NotezConfig::from_toml("[processing\nmin_length = ").expect_err("bad toml");
        assert!(matches!(err, NotezError::Config(_)));
    }

    #[test]
    fn from_file_reads_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("notez.toml");
        std::fs::write(&path, "[processing]\nsmart_mode = true\n").expect("write");
        let config = NotezConfig::from_file(&path).expect("load");
        assert!(config.processing.smart_mode);
    }
}
