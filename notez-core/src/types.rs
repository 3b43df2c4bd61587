//! Core type definitions for NOTEZ.
//!
//! Classification results are derived per processing pass and never stored.
//! A [`ProcessedNote`] is the single output of one pass.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Modes & Formats
// ---------------------------------------------------------------------------

/// Output style requested for a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Structured prose (markdown).
    #[default]
    Organize,
    /// Diagram description.
    Visualize,
}

impl Mode {
    /// Wire name of the mode, as used in prompts and remote envelopes.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Organize => "organize",
            Self::Visualize => "visualize",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "organize" | "organise" | "text" => Ok(Self::Organize),
            "visualize" | "visualise" | "visual" | "diagram" => Ok(Self::Visualize),
            _ => Err(format!("unknown mode: '{s}'")),
        }
    }
}

/// Serialization format of a processed note's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown (rendered to HTML for display).
    Markdown,
    /// Mermaid-like diagram DSL.
    Mermaid,
}

impl OutputFormat {
    /// Extension used when the content is exported to a file.
    #[must_use]
    pub fn file_extension(self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Mermaid => "mmd",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Markdown => f.write_str("markdown"),
            Self::Mermaid => f.write_str("mermaid"),
        }
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Processing strategy picked for organize mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteKind {
    /// Meeting notes: details, attendees, action items.
    Meeting,
    /// Project notes: team, timeline, budget.
    Project,
    /// Anything else: groups of related lines.
    General,
}

impl fmt::Display for NoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Meeting => f.write_str("meeting"),
            Self::Project => f.write_str("project"),
            Self::General => f.write_str("general"),
        }
    }
}

/// Diagram strategy picked for visualize mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramKind {
    /// Sequential process steps.
    Flowchart,
    /// Hierarchical breakdown.
    Mindmap,
    /// Dated events (gantt bars).
    Timeline,
    /// Plain chain of lines, used when nothing else matched.
    Simple,
}

impl fmt::Display for DiagramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flowchart => f.write_str("flowchart"),
            Self::Mindmap => f.write_str("mindmap"),
            Self::Timeline => f.write_str("timeline"),
            Self::Simple => f.write_str("simple"),
        }
    }
}

/// Both classification axes for one note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Organize-mode strategy.
    pub note: NoteKind,
    /// Visualize-mode strategy.
    pub diagram: DiagramKind,
}

// ---------------------------------------------------------------------------
// Processed output
// ---------------------------------------------------------------------------

/// The result of one processing pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProcessedNote {
    /// Structured prose.
    Organized {
        /// Markdown source.
        markdown: String,
        /// HTML rendering of `markdown`.
        html: String,
    },
    /// Diagram description text.
    Diagram {
        /// Mermaid-like DSL.
        dsl: String,
    },
}

impl ProcessedNote {
    /// Build an organized note, rendering the markdown to HTML.
    #[must_use]
    pub fn organized(markdown: impl Into<String>) -> Self {
        let markdown = markdown.into();
        let html = crate::markdown::to_html(&markdown);
        Self::Organized { markdown, html }
    }

    /// Build a diagram note.
    #[must_use]
    pub fn diagram(dsl: impl Into<String>) -> Self {
        Self::Diagram { dsl: dsl.into() }
    }

    /// Which mode produced this note.
    #[must_use]
    pub fn mode(&self) -> Mode {
        match self {
            Self::Organized { .. } => Mode::Organize,
            Self::Diagram { .. } => Mode::Visualize,
        }
    }

    /// Format of [`Self::source`].
    #[must_use]
    pub fn format(&self) -> OutputFormat {
        match self {
            Self::Organized { .. } => OutputFormat::Markdown,
            Self::Diagram { .. } => OutputFormat::Mermaid,
        }
    }

    /// Display content: HTML for organized notes, DSL for diagrams.
    #[must_use]
    pub fn content(&self) -> &str {
        match self {
            Self::Organized { html, .. } => html,
            Self::Diagram { dsl } => dsl,
        }
    }

    /// Source text: markdown for organized notes, DSL for diagrams.
    #[must_use]
    pub fn source(&self) -> &str {
        match self {
            Self::Organized { markdown, .. } => markdown,
            Self::Diagram { dsl } => dsl,
        }
    }

    /// Export file extension.
    #[must_use]
    pub fn file_extension(&self) -> &'static str {
        self.format().file_extension()
    }

    /// Whether the note holds no content at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.source().trim().is_empty()
    }
}

/// Split raw text into its non-blank lines, trimmed.
#[must_use]
pub fn note_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}
