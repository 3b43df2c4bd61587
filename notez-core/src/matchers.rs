//! Keyword matchers: fixed trigger-word sets per category.
//!
//! Each [`KeywordSet`] compiles its words into one case-insensitive regex
//! anchored at word starts: `discuss` matches "discussed", while `on` does
//! not match "discussion". Multi-word keywords tolerate any run of
//! whitespace between words.

use regex::Regex;
use std::sync::LazyLock;

/// A named, ordered list of trigger words compiled into a single matcher.
#[derive(Debug)]
pub struct KeywordSet {
    name: &'static str,
    keywords: &'static [&'static str],
    any: Regex,
    each: Vec<Regex>,
}

impl KeywordSet {
    /// Compile a keyword set.
    ///
    /// # Panics
    /// Panics if a compiled pattern exceeds the regex size limit, which
    /// cannot happen for the short escaped word lists in this module.
    #[must_use]
    pub fn new(name: &'static str, keywords: &'static [&'static str]) -> Self {
        let each: Vec<Regex> = keywords
            .iter()
            .map(|kw| Regex::new(&format!("(?i){}", word_start_pattern(kw))).expect("keyword regex"))
            .collect();
        let alternation = keywords
            .iter()
            .map(|kw| word_start_pattern(kw))
            .collect::<Vec<_>>()
            .join("|");
        let any = Regex::new(&format!("(?i){alternation}")).expect("keyword set regex");
        Self {
            name,
            keywords,
            any,
            each,
        }
    }

    /// Name of the category this set detects.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The raw trigger words, in priority order.
    #[must_use]
    pub fn keywords(&self) -> &'static [&'static str] {
        self.keywords
    }

    /// Whether any keyword occurs in `text`.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        !self.keywords.is_empty() && self.any.is_match(text)
    }

    /// Distinct keywords that occur in `text`, in list order.
    #[must_use]
    pub fn matched(&self, text: &str) -> Vec<&'static str> {
        self.keywords
            .iter()
            .zip(&self.each)
            .filter(|(_, re)| re.is_match(text))
            .map(|(kw, _)| *kw)
            .collect()
    }
}

fn word_start_pattern(keyword: &str) -> String {
    let words: Vec<String> = keyword.split_whitespace().map(regex::escape).collect();
    format!(r"\b{}", words.join(r"\s+"))
}

// ---------------------------------------------------------------------------
// Category sets
// ---------------------------------------------------------------------------

/// Project-note triggers. Checked before [`MEETING`].
pub static PROJECT: LazyLock<KeywordSet> = LazyLock::new(|| {
    KeywordSet::new(
        "project",
        &["project", "timeline", "milestone", "deadline", "deliverable", "roadmap", "sprint"],
    )
});

/// Meeting-note triggers.
pub static MEETING: LazyLock<KeywordSet> = LazyLock::new(|| {
    KeywordSet::new(
        "meeting",
        &[
            "meeting",
            "discuss",
            "call",
            "conference",
            "attendees",
            "participants",
            "standup",
            "agenda",
        ],
    )
});

/// Sequential process triggers (flowchart). Checked first for diagrams.
pub static PROCESS: LazyLock<KeywordSet> = LazyLock::new(|| {
    KeywordSet::new(
        "process",
        &["process", "step", "flow", "first", "then", "next", "finally", "afterwards"],
    )
});

/// Hierarchy triggers (mindmap).
pub static HIERARCHY: LazyLock<KeywordSet> = LazyLock::new(|| {
    KeywordSet::new(
        "hierarchy",
        &["hierarchy", "structure", "contains", "consists", "includes", "part of", "composed of"],
    )
});

/// Chronology triggers (gantt timeline).
pub static TIMELINE: LazyLock<KeywordSet> = LazyLock::new(|| {
    KeywordSet::new(
        "timeline",
        &["timeline", "schedule", "before", "after", "earlier", "later", "date", "deadline"],
    )
});

/// Smart-mode triggers: any hit picks visualize over organize.
pub static VISUALIZE: LazyLock<KeywordSet> = LazyLock::new(|| {
    KeywordSet::new(
        "visualize",
        &[
            "process",
            "steps",
            "flow",
            "first",
            "then",
            "finally",
            "hierarchy",
            "structure",
            "relationship",
            "timeline",
        ],
    )
});
