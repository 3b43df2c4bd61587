//! Lightweight mermaid syntax check for diagrams that did not come from the
//! local renderer.
//!
//! This is a shape check, not a parser: the first line must open with a
//! known diagram keyword and the body must hold at least one node.

/// Diagram keywords accepted on the first line.
pub const DIAGRAM_KEYWORDS: &[&str] = &[
    "graph",
    "flowchart",
    "mindmap",
    "gantt",
    "timeline",
    "sequenceDiagram",
    "classDiagram",
    "stateDiagram",
    "erDiagram",
    "journey",
    "pie",
];

/// Kinds whose entries are `label : value` lines rather than bracketed nodes.
const COLON_ENTRY_KINDS: &[&str] = &["gantt", "timeline", "pie"];

/// Strip a surrounding ```` ``` ```` / ```` ```mermaid ```` fence, if any.
#[must_use]
pub fn strip_fence(dsl: &str) -> &str {
    let trimmed = dsl.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// The keyword opening the first non-empty line, if it is a known one.
#[must_use]
pub fn diagram_keyword(dsl: &str) -> Option<&'static str> {
    let first = dsl.lines().map(str::trim).find(|line| !line.is_empty())?;
    let token = first.split_whitespace().next()?;
    let token = token.trim_end_matches(';');
    DIAGRAM_KEYWORDS.iter().copied().find(|kw| {
        token == *kw || token.strip_prefix(kw).is_some_and(|suffix| suffix.starts_with('-'))
    })
}

/// Whether `dsl` looks like a renderable mermaid diagram.
#[must_use]
pub fn is_valid_diagram(dsl: &str) -> bool {
    let dsl = strip_fence(dsl);
    let Some(keyword) = diagram_keyword(dsl) else {
        return false;
    };

    // Everything after the keyword token, first-line remainder included.
    let body = dsl
        .trim_start()
        .split_once(char::is_whitespace)
        .map_or("", |(_, body)| body);

    let has_bracketed = body.contains(['[', '(', '{']);
    let has_entry = COLON_ENTRY_KINDS.contains(&keyword) && body.lines().any(|l| l.contains(':'));
    has_bracketed || has_entry
}
