//! Extractors: regex-based pulling of names, dates, deadlines, and figures.
//!
//! Extraction is best-effort string matching, not grammatical parsing.
//! Every function returns an empty result rather than failing.

use regex::Regex;
use std::sync::LazyLock;

// NOTE: expect() on these literals can only trip on a typo in this file.
static CAPITALIZED_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Z][a-z]+)(?:[ \t]+([A-Z][a-z]+))?\b").expect("Invalid regex: capitalized name")
});

static LEADING_SPEAKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^([a-z][a-z'\-]*)\s+(?:discussed|said|says|mentioned|presented|suggested|proposed|asked|agreed|shared|reported|raised|noted|explained|confirmed|reviewed|handles|is\s+handling|is\s+responsible|will|owns|leads|led|joined|wants|thinks|promised|offered|volunteered)\b",
    )
    .expect("Invalid regex: leading speaker")
});

static DATE_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(january|february|march|april|may|june|july|august|september|october|november|december|jan|feb|mar|apr|jun|jul|aug|sept|sep|oct|nov|dec|monday|tuesday|wednesday|thursday|friday|saturday|sunday|tomorrow|today|tonight)\b",
    )
    .expect("Invalid regex: date words")
});

static NUMERIC_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,2})[/\-](\d{1,2})[/\-](\d{2,4})\b").expect("Invalid regex: numeric date")
});

static DEADLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:complete\s+by|finish\s+by|deadline(?:\s+is)?|due(?:\s+on|\s+by)?|by)\s*:?\s+([^,.\n]+)",
    )
    .expect("Invalid regex: deadline phrase")
});

static SCHEDULE_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(deadline|due|schedule[ds]?|timeline|milestones?|launch(?:es|ed)?|eta)\b")
        .expect("Invalid regex: schedule words")
});

static BUDGET_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(budget|costs?|price[sd]?|spend(?:ing)?|funding|invoice|thousand|million)\b")
        .expect("Invalid regex: budget words")
});

static AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:[$€£]\s?\d[\d,]*(?:\.\d+)?(?:\s?(?:k|m|bn|thousand|million)\b)?|\b\d[\d,]*(?:\.\d+)?\s?(?:%|k\b|thousand\b|million\b|usd\b|eur\b))",
    )
    .expect("Invalid regex: amounts")
});

static ACTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(need|must|should|todo|to\s+do|action|task|assign)").expect("Invalid regex: action items")
});

/// Capitalized or speaker-position words that are never treated as names.
const NOT_NAMES: &[&str] = &[
    // pronouns, articles, fillers
    "i", "we", "they", "he", "she", "it", "you", "our", "my", "their", "the", "a", "an", "this",
    "that", "these", "those", "there", "here", "everyone", "someone", "nobody", "all", "who",
    "also", "and", "but", "or", "so", "if", "when", "after", "before", "with", "for", "from", "to",
    "on", "in", "at", "of", "by", "about", "please", "maybe", "yes", "no", "ok", "okay",
    // note vocabulary
    "meeting", "meetings", "project", "projects", "budget", "team", "teams", "notes", "note",
    "agenda", "action", "actions", "task", "tasks", "todo", "next", "then", "first", "finally",
    "need", "needs", "discussion", "discussed", "timeline", "deadline", "milestone", "goal", "goals",
    "summary", "update", "updates", "decision", "decisions", "review", "call", "client", "clients",
    "customer", "customers", "manager", "management", "user", "users", "system", "board", "group",
    "committee", "company", "marketing", "sales", "design", "engineering", "legal", "finance",
    "new", "old", "q1", "q2", "q3", "q4",
    // calendar words
    "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday", "january",
    "february", "march", "april", "may", "june", "july", "august", "september", "october",
    "november", "december", "jan", "feb", "mar", "apr", "jun", "jul", "aug", "sep", "sept", "oct",
    "nov", "dec", "today", "tomorrow", "tonight", "yesterday",
];

fn is_not_name(word: &str) -> bool {
    let lower = word.to_ascii_lowercase();
    NOT_NAMES.contains(&lower.as_str())
}

/// Upper-case the first character, leaving the rest untouched.
#[must_use]
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn title_case(word: &str) -> String {
    capitalize_first(&word.to_lowercase())
}

// ---------------------------------------------------------------------------
// Names
// ---------------------------------------------------------------------------

/// Person-like names found in one line, in order of appearance.
///
/// Two sources feed this: capitalized tokens (`Sarah`, `Sarah Lee`) and a
/// lowercase word leading the line in front of a reporting verb
/// (`sarah discussed ...`). Results are title-cased and deduplicated.
#[must_use]
pub fn extract_names(line: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let mut push = |name: String| {
        if !names.contains(&name) {
            names.push(name);
        }
    };

    if let Some(caps) = LEADING_SPEAKER.captures(line) {
        if let Some(word) = caps.get(1) {
            if !is_not_name(word.as_str()) {
                push(title_case(word.as_str()));
            }
        }
    }

    for caps in CAPITALIZED_NAME.captures_iter(line) {
        let first = caps.get(1).map(|m| m.as_str());
        let second = caps.get(2).map(|m| m.as_str());
        match (first, second) {
            (Some(a), Some(b)) if !is_not_name(a) && !is_not_name(b) => push(format!("{a} {b}")),
            (Some(a), _) if !is_not_name(a) => push(a.to_string()),
            (_, Some(b)) if !is_not_name(b) => push(b.to_string()),
            _ => {}
        }
    }

    names
}

/// The first name in a line, if any.
#[must_use]
pub fn first_name(line: &str) -> Option<String> {
    extract_names(line).into_iter().next()
}

/// Role text following `name` on a line that assigns responsibility.
///
/// Only lines mentioning "handling" or "responsible" carry a role.
#[must_use]
pub fn extract_role(line: &str, name: &str) -> Option<String> {
    let lower = line.to_lowercase();
    if !(lower.contains("handling") || lower.contains("responsible")) {
        return None;
    }
    let start = find_ascii_case_insensitive(line, name)?;
    let role = line[start + name.len()..].trim();
    (!role.is_empty()).then(|| role.to_string())
}

fn find_ascii_case_insensitive(haystack: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() || !needle.is_ascii() {
        return haystack.find(needle);
    }
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle.as_bytes()))
}

// ---------------------------------------------------------------------------
// Dates & deadlines
// ---------------------------------------------------------------------------

/// A numeric `day/month/year` date as written, components unvalidated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericDate {
    /// Exact matched text, e.g. `3/4/25`.
    pub matched: String,
    /// Day component.
    pub day: u32,
    /// Month component.
    pub month: u32,
    /// Year, with two-digit years normalized to `20YY`.
    pub year: i32,
}

/// First numeric date in `text`.
#[must_use]
pub fn find_numeric_date(text: &str) -> Option<NumericDate> {
    let caps = NUMERIC_DATE.captures(text)?;
    let day = caps.get(1)?.as_str().parse().ok()?;
    let month = caps.get(2)?.as_str().parse().ok()?;
    let year_text = caps.get(3)?.as_str();
    let year: i32 = match year_text.len() {
        2 => format!("20{year_text}").parse().ok()?,
        4 => year_text.parse().ok()?,
        _ => return None,
    };
    Some(NumericDate {
        matched: caps.get(0)?.as_str().to_string(),
        day,
        month,
        year,
    })
}

/// First date-like word or numeric date in `text`, as written.
#[must_use]
pub fn find_date(text: &str) -> Option<String> {
    let word = DATE_WORD.find(text);
    let numeric = NUMERIC_DATE.find(text);
    match (word, numeric) {
        (Some(w), Some(n)) if n.start() < w.start() => Some(n.as_str().to_string()),
        (Some(w), _) => Some(w.as_str().to_string()),
        (None, Some(n)) => Some(n.as_str().to_string()),
        (None, None) => None,
    }
}

/// Month number (1-12) of the first month name in `text`.
#[must_use]
pub fn find_month(text: &str) -> Option<u32> {
    DATE_WORD
        .find_iter(text)
        .find_map(|m| month_number(m.as_str()))
}

fn month_number(word: &str) -> Option<u32> {
    let lower = word.to_ascii_lowercase();
    let month = match lower.get(..3)? {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

/// The phrase after `by`/`due`/`deadline`, up to the next comma or period.
#[must_use]
pub fn find_deadline(text: &str) -> Option<String> {
    DEADLINE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .find(|phrase| !phrase.is_empty())
}

/// Whether a line talks about dates or scheduling.
#[must_use]
pub fn is_timeline_line(line: &str) -> bool {
    SCHEDULE_WORD.is_match(line) || DATE_WORD.is_match(line) || NUMERIC_DATE.is_match(line)
}

// ---------------------------------------------------------------------------
// Budget & actions
// ---------------------------------------------------------------------------

/// Currency-like figures in a line (`$5k`, `15%`, `2 million`).
#[must_use]
pub fn extract_amounts(line: &str) -> Vec<String> {
    AMOUNT
        .find_iter(line)
        .map(|m| m.as_str().trim().to_string())
        .collect()
}

/// Whether a line talks about money.
#[must_use]
pub fn is_budget_line(line: &str) -> bool {
    BUDGET_WORD.is_match(line) || !extract_amounts(line).is_empty()
}

/// Whether a line reads like an action item.
#[must_use]
pub fn is_action_line(line: &str) -> bool {
    ACTION.is_match(line)
}
