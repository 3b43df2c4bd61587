//! Diagram renderer: note lines to mermaid DSL.
//!
//! Four shapes are produced:
//!
//! | Kind | Header | Shape |
//! |------|--------|-------|
//! | Flowchart | `graph TD` | start node, then one node per line, chained |
//! | Simple | `graph TD` | one node per line, chained |
//! | Mindmap | `mindmap` | first line as root, lines grouped under a keyword |
//! | Timeline | `gantt` | one single-day bar per line |
//!
//! Every shape stops after [`DiagramConfig::max_nodes`] lines. Dropping the
//! tail is logged at `debug` and is never an error.

use chrono::{Datelike, Days, NaiveDate};
use tracing::debug;

use crate::config::DiagramConfig;
use crate::extract::{find_month, find_numeric_date};
use crate::types::{note_lines, DiagramKind};

/// Mindmap child categories, checked in order.
const MINDMAP_CATEGORIES: [&str; 5] = ["team", "budget", "timeline", "tasks", "goals"];

/// Render `text` as a diagram of the given kind.
///
/// `today` seeds the dates of timeline bars that carry no date of their own.
#[must_use]
pub fn render(kind: DiagramKind, text: &str, config: &DiagramConfig, today: NaiveDate) -> String {
    let lines = capped_lines(text, config.max_nodes);
    match kind {
        DiagramKind::Flowchart => flowchart(&lines, config),
        DiagramKind::Mindmap => mindmap(&lines, config),
        DiagramKind::Timeline => timeline(&lines, config, today),
        DiagramKind::Simple => simple(&lines, config),
    }
}

fn capped_lines(text: &str, max_nodes: usize) -> Vec<&str> {
    let mut lines = note_lines(text);
    if lines.len() > max_nodes {
        debug!(
            lines = lines.len(),
            max_nodes,
            "Diagram input truncated to node cap"
        );
        lines.truncate(max_nodes);
    }
    lines
}

/// Node identifier for the `index`-th node: `A`..`Z`, `AA`, `AB`, ...
#[must_use]
pub fn node_id(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        #[allow(clippy::cast_possible_truncation)]
        letters.push(char::from(b'A' + (n % 26) as u8));
        n /= 26;
    }
    letters.iter().rev().collect()
}

/// Truncate to `max_chars` characters (with `...`) and escape double quotes.
#[must_use]
pub fn label(text: &str, max_chars: usize) -> String {
    let truncated = if text.chars().count() > max_chars {
        let head: String = text.chars().take(max_chars).collect();
        format!("{head}...")
    } else {
        text.to_string()
    };
    truncated.replace('"', "#quot;")
}

// ---------------------------------------------------------------------------
// Chains
// ---------------------------------------------------------------------------

/// Process flow: the first line is a rounded start node, the rest follow it.
#[must_use]
pub fn flowchart(lines: &[&str], config: &DiagramConfig) -> String {
    chain(lines, config, |i, text| {
        if i == 0 {
            format!("([\"{text}\"])")
        } else {
            format!("[\"{text}\"]")
        }
    })
}

/// Fallback diagram: plain boxes, chained in order.
#[must_use]
pub fn simple(lines: &[&str], config: &DiagramConfig) -> String {
    chain(lines, config, |_, text| format!("[\"{text}\"]"))
}

fn chain(lines: &[&str], config: &DiagramConfig, shape: impl Fn(usize, &str) -> String) -> String {
    let mut dsl = String::from("graph TD\n");
    for (i, line) in lines.iter().enumerate() {
        let id = node_id(i);
        let node = shape(i, &label(line, config.label_max_chars));
        dsl.push_str(&format!("  {id}{node}\n"));
        if i > 0 {
            dsl.push_str(&format!("  {} --> {id}\n", node_id(i - 1)));
        }
    }
    dsl
}

// ---------------------------------------------------------------------------
// Mindmap
// ---------------------------------------------------------------------------

/// Hierarchy: root from the first line, children grouped by category word.
#[must_use]
pub fn mindmap(lines: &[&str], config: &DiagramConfig) -> String {
    let root = lines
        .first()
        .map(|line| mindmap_text(line, config))
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| "Notes".to_string());
    let mut dsl = format!("mindmap\n  root(({root}))\n");

    let mut groups: Vec<(&str, Vec<String>)> = Vec::new();
    for &line in lines.iter().skip(1) {
        let text = mindmap_text(line, config);
        if text.is_empty() {
            continue;
        }
        let lower = line.to_lowercase();
        let category = MINDMAP_CATEGORIES
            .iter()
            .find(|cat| lower.contains(*cat))
            .map_or("General", |cat| category_title(cat));
        match groups.iter_mut().find(|(name, _)| *name == category) {
            Some((_, items)) => items.push(text),
            None => groups.push((category, vec![text])),
        }
    }

    for (category, items) in &groups {
        dsl.push_str(&format!("    {category}\n"));
        for item in items {
            dsl.push_str(&format!("      {item}\n"));
        }
    }
    dsl
}

fn category_title(category: &str) -> &'static str {
    match category {
        "team" => "Team",
        "budget" => "Budget",
        "timeline" => "Timeline",
        "tasks" => "Tasks",
        "goals" => "Goals",
        _ => "General",
    }
}

/// Mindmap text is indentation-structured; shape brackets would be parsed
/// as node syntax.
fn mindmap_text(text: &str, config: &DiagramConfig) -> String {
    label(text, config.label_max_chars)
        .chars()
        .map(|c| if matches!(c, '(' | ')' | '[' | ']' | '{' | '}') { ' ' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}

// ---------------------------------------------------------------------------
// Timeline
// ---------------------------------------------------------------------------

/// Chronology: one single-day gantt bar per line.
///
/// A bar's start is the line's `d/m/yy[yy]` date, else the first of its
/// month name in `today`'s year, else `today` plus the line index in days.
#[must_use]
pub fn timeline(lines: &[&str], config: &DiagramConfig, today: NaiveDate) -> String {
    let mut dsl = String::from("gantt\n  title Timeline\n  dateFormat YYYY-MM-DD\n  section Events\n");

    for (i, line) in lines.iter().enumerate() {
        let (start, task) = bar_start(line, i, today);
        let end = start.checked_add_days(Days::new(1)).unwrap_or(start);
        let task = if task.is_empty() {
            format!("Event {}", i + 1)
        } else {
            label(&task, config.label_max_chars).replace(':', " ")
        };
        dsl.push_str(&format!(
            "  {task} :t{i}, {}, {}\n",
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        ));
    }
    dsl
}

fn bar_start(line: &str, index: usize, today: NaiveDate) -> (NaiveDate, String) {
    if let Some(date) = find_numeric_date(line) {
        let task = line.replacen(&date.matched, "", 1).trim().to_string();
        match NaiveDate::from_ymd_opt(date.year, date.month, date.day) {
            Some(start) => return (start, task),
            None => {
                debug!(date = %date.matched, "Invalid calendar date, fabricating bar date");
                return (fabricated(today, index), task);
            }
        }
    }

    if let Some(start) = find_month(line).and_then(|m| NaiveDate::from_ymd_opt(today.year(), m, 1)) {
        return (start, line.to_string());
    }

    (fabricated(today, index), line.to_string())
}

fn fabricated(today: NaiveDate, index: usize) -> NaiveDate {
    today
        .checked_add_days(Days::new(index as u64))
        .unwrap_or(today)
}
