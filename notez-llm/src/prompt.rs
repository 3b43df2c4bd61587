//! Prompt templates for the remote organizer.
//!
//! The built-in template is compiled in. A TOML file with the same shape can
//! replace it at runtime (see `prompts/organizer.toml`):
//!
//! ```toml
//! [prompt]
//! version = "1.0"
//! system = "..."
//! user = "User Input:\n{text}\n\nMode: {mode}"
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::LlmError;

/// System prompt: role, output contract, and formatting rules.
pub const ORGANIZER_SYSTEM: &str = r#"You are NoteOrganizer, an assistant that turns messy notes into well-structured content.

IMPORTANT: You must ALWAYS respond with a JSON object wrapped in ```json code blocks.

Your response format:
```json
{
  "mode": "organize" or "visualize",
  "content": "your formatted content here",
  "format": "markdown" or "mermaid"
}
```

RULES:

1. For ORGANIZE mode (default):
   - Transform messy notes into clean, structured markdown
   - Use proper headings (##), bullet points, bold (**text**)
   - Group related items together
   - Extract key information (dates, names, numbers)
   - Keep it concise and scannable

2. For VISUALIZE mode:
   - ONLY create diagrams when content naturally suits visualization
   - Use Mermaid.js syntax
   - Choose an appropriate diagram type:
     * flowchart LR for processes
     * mindmap for brainstorming/ideas
     * timeline for chronological events
     * graph TD for hierarchies

3. Visualize automatically for:
   - Process descriptions (first, then, finally)
   - Hierarchical relationships
   - Timeline/chronological content
   - Workflow descriptions
   - An explicit request for visualization mode

4. Formatting guidelines:
   - Organize mode: clean markdown with headers, lists, emphasis
   - Visualize mode: valid Mermaid.js syntax only
   - No extra explanations outside the JSON"#;

/// User turn: the raw note and the requested mode.
pub const ORGANIZER_USER: &str = "User Input:\n{text}\n\nMode: {mode}";

/// Simple template interpolation for prompts.
///
/// Replaces `{key}` with the corresponding value. Unknown placeholders are
/// left as they are.
#[must_use]
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{key}}}"), value);
    }
    result
}

/// `[prompt]` section of a TOML prompt file.
#[derive(Debug, Clone, Deserialize)]
struct TomlPromptFile {
    prompt: PromptTemplate,
}

/// A loaded, ready-to-render prompt template.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PromptTemplate {
    /// Template version string (e.g., "1.0").
    #[serde(default = "default_version")]
    pub version: String,
    /// System prompt template.
    pub system: String,
    /// User prompt template (`{text}` and `{mode}` placeholders).
    #[serde(default = "default_user")]
    pub user: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PromptTemplate {
    /// The compiled-in organizer prompt.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            version: "builtin".into(),
            system: ORGANIZER_SYSTEM.into(),
            user: ORGANIZER_USER.into(),
        }
    }

    /// Parse a template from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::ConfigError`] if the TOML is invalid or lacks a
    /// `[prompt]` section with a `system` key.
    pub fn from_toml(toml_str: &str) -> Result<Self, LlmError> {
        let parsed: TomlPromptFile =
            toml::from_str(toml_str).map_err(|e| LlmError::ConfigError(format!("invalid prompt file: {e}")))?;
        Ok(parsed.prompt)
    }

    /// Load a template from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::ConfigError`] if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LlmError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| LlmError::ConfigError(format!("failed to read {}: {e}", path.display())))?;
        let template = Self::from_toml(&content)?;
        info!(path = %path.display(), version = %template.version, "Loaded prompt override");
        Ok(template)
    }

    /// Render `(system, user)` for a note and mode name.
    ///
    /// The note is substituted last, so placeholders typed into the note
    /// itself come through untouched.
    #[must_use]
    pub fn render(&self, text: &str, mode: &str) -> (String, String) {
        let vars = [("mode", mode), ("text", text)];
        (
            render_template(&self.system, &vars),
            render_template(&self.user, &vars),
        )
    }
}

fn default_version() -> String {
    "custom".into()
}

fn default_user() -> String {
    ORGANIZER_USER.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_replaces_placeholders() {
        let out = render_template("a {x} b {y} {z}", &[("x", "1"), ("y", "2")]);
        assert_eq!(out, "a 1 b 2 {z}");
    }

    #[test]
    fn builtin_user_turn_layout() {
        let (system, user) = PromptTemplate::builtin().render("buy milk", "organize");
        assert!(system.starts_with("You are NoteOrganizer"));
        assert_eq!(user, "User Input:\nbuy milk\n\nMode: organize");
    }

    #[test]
    fn toml_override_with_default_user() {
        let tpl = PromptTemplate::from_toml("[prompt]\nsystem = \"Be brief.\"\n").expect("parse");
        assert_eq!(tpl.version, "custom");
        assert_eq!(tpl.system, "Be brief.");
        assert_eq!(tpl.user, ORGANIZER_USER);
    }

    #[test]
    fn toml_without_system_is_rejected() {
        let err = PromptTemplate::from_toml("[prompt]\nversion = \"2\"\n").expect_err("missing system");
        assert!(matches!(err, LlmError::ConfigError(_)));
    }

    #[test]
    fn shipped_prompt_file_parses() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/prompts/organizer.toml");
        let tpl = PromptTemplate::from_file(path).expect("shipped prompt");
        assert_eq!(tpl.version, "1.0");
        assert!(tpl.user.contains("{text}"));
        assert!(tpl.user.contains("{mode}"));
    }

    #[test]
    fn file_override_replaces_system_prompt() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("prompt.toml");
        std::fs::write(&path, "[prompt]\nversion = \"2\"\nsystem = \"Reply in {mode} form.\"\n").expect("write");
        let tpl = PromptTemplate::from_file(&path).expect("load");
        let (system, user) = tpl.render("buy milk", "organize");
        assert_eq!(system, "Reply in organize form.");
        assert_eq!(user, "User Input:\nbuy milk\n\nMode: organize");
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = PromptTemplate::from_file("/nonexistent/prompt.toml").expect_err("missing");
        assert!(matches!(err, LlmError::ConfigError(_)));
    }
}
