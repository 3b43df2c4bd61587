//! Markdown renderer: extracted fragments → structured document.
//!
//! Every document is a `#` title followed by category sections in a fixed
//! order and a catch-all section for whatever no category claimed. Each line
//! lands in at most one section: the first category (in section order) that
//! claims it wins.

use pulldown_cmark::{html, Options, Parser};

use crate::extract::{
    capitalize_first, extract_names, extract_role, find_date, find_deadline, first_name,
    is_action_line, is_budget_line, is_timeline_line,
};
use crate::types::{note_lines, NoteKind};

/// Render `text` as markdown using the strategy for `kind`.
#[must_use]
pub fn render(kind: NoteKind, text: &str) -> String {
    let lines = note_lines(text);
    match kind {
        NoteKind::Meeting => render_meeting(&lines),
        NoteKind::Project => render_project(&lines),
        NoteKind::General => render_general(&lines),
    }
}

/// Convert markdown to HTML for display.
#[must_use]
pub fn to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES);
    let mut out = String::with_capacity(markdown.len() + markdown.len() / 2);
    html::push_html(&mut out, parser);
    out
}

/// Plain bullet list of the non-blank lines of `text`.
#[must_use]
pub fn render_bullets(text: &str) -> String {
    let mut md = String::new();
    push_items(&mut md, &note_lines(text));
    md
}

fn push_section(md: &mut String, heading: &str, items: &[&str]) {
    if items.is_empty() {
        return;
    }
    md.push_str(heading);
    md.push('\n');
    push_items(md, items);
    md.push('\n');
}

fn push_items(md: &mut String, items: &[&str]) {
    for item in items {
        md.push_str("- ");
        md.push_str(item);
        md.push('\n');
    }
}

// ---------------------------------------------------------------------------
// Meeting
// ---------------------------------------------------------------------------

/// Title → Meeting Details (date, attendees) → Action Items → Discussion Points.
#[must_use]
pub fn render_meeting(lines: &[&str]) -> String {
    let title_index = lines
        .iter()
        .position(|line| line.to_lowercase().contains("meeting"));
    let title = title_index.map_or_else(|| "Meeting Notes".to_string(), |i| capitalize_first(lines[i]));

    let mut md = format!("# {title}\n\n");
    md.push_str("## Meeting Details\n\n");

    let full_text = lines.join("\n");
    if let Some(date) = find_date(&full_text) {
        md.push_str(&format!("**Date:** {date}\n\n"));
    }

    let mut attendees: Vec<String> = Vec::new();
    let mut attendee_lines: Vec<usize> = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        let names = extract_names(line);
        if names.is_empty() {
            continue;
        }
        if Some(i) != title_index {
            attendee_lines.push(i);
        }
        for name in names {
            if !attendees.contains(&name) {
                attendees.push(name);
            }
        }
    }
    if !attendees.is_empty() {
        md.push_str("### Attendees\n");
        for name in &attendees {
            md.push_str(&format!("- {name}\n"));
        }
        md.push('\n');
    }

    let action_idx: Vec<usize> = (0..lines.len())
        .filter(|&i| Some(i) != title_index && is_action_line(lines[i]))
        .collect();
    let discussion_idx: Vec<usize> = (0..lines.len())
        .filter(|i| Some(*i) != title_index && !attendee_lines.contains(i) && !action_idx.contains(i))
        .collect();

    push_section(&mut md, "## Action Items", &pick(lines, &action_idx));
    push_section(&mut md, "## Discussion Points", &pick(lines, &discussion_idx));
    md
}

fn pick<'a>(lines: &[&'a str], indices: &[usize]) -> Vec<&'a str> {
    indices.iter().map(|&i| lines[i]).collect()
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

/// Title (+ deadline) → Team → Timeline → Budget → Notes.
#[must_use]
pub fn render_project(lines: &[&str]) -> String {
    let project_name = lines
        .iter()
        .find(|line| line.to_lowercase().contains("project"))
        .map_or_else(
            || "Project".to_string(),
            |line| line.split_whitespace().take(3).collect::<Vec<_>>().join(" "),
        );

    let mut md = format!("# {} Notes\n\n", capitalize_first(&project_name));

    if let Some(deadline) = find_deadline(&lines.join("\n")) {
        md.push_str(&format!("**Deadline:** {deadline}\n\n"));
    }

    let mut team: Vec<String> = Vec::new();
    let mut timeline: Vec<&str> = Vec::new();
    let mut budget: Vec<&str> = Vec::new();
    let mut notes: Vec<&str> = Vec::new();

    // A named line lands in Team and may also land in Timeline or Budget;
    // only lines matching none of them reach Notes.
    for &line in lines {
        let person = first_name(line);
        if let Some(person) = &person {
            let entry = match extract_role(line, person) {
                Some(role) => format!("**{person}**: {role}"),
                None => format!("**{person}**"),
            };
            team.push(entry);
        }
        let dated = is_timeline_line(line);
        let costed = !dated && is_budget_line(line);
        if dated {
            timeline.push(line);
        } else if costed {
            budget.push(line);
        }
        if person.is_none() && !dated && !costed {
            notes.push(line);
        }
    }

    let team_refs: Vec<&str> = team.iter().map(String::as_str).collect();
    push_section(&mut md, "## Team", &team_refs);
    push_section(&mut md, "## Timeline", &timeline);
    push_section(&mut md, "## Budget", &budget);
    push_section(&mut md, "## Notes", &notes);
    md
}

// ---------------------------------------------------------------------------
// General
// ---------------------------------------------------------------------------

/// Title from the first line, then groups of lines sharing a keyword.
///
/// A line joins the first group whose key shares a word longer than three
/// characters with it; otherwise it opens a group keyed by its first two
/// words. Groups keep the order in which they were opened.
#[must_use]
pub fn render_general(lines: &[&str]) -> String {
    let title = lines.first().map_or_else(|| "Notes".to_string(), |l| capitalize_first(l));
    let mut md = format!("# {title}\n\n");

    let mut groups: Vec<(String, Vec<&str>)> = Vec::new();
    for &line in lines.iter().skip(1) {
        let line_words: Vec<String> = line.split_whitespace().map(str::to_lowercase).collect();
        let shared = groups.iter().position(|(key, _)| {
            key.split_whitespace()
                .map(str::to_lowercase)
                .any(|word| word.chars().count() > 3 && line_words.contains(&word))
        });

        match shared {
            Some(i) => groups[i].1.push(line),
            None => {
                let key = line.split_whitespace().take(2).collect::<Vec<_>>().join(" ");
                match groups.iter_mut().find(|(k, _)| *k == key) {
                    Some((_, items)) => items.push(line),
                    None => groups.push((key, vec![line])),
                }
            }
        }
    }

    for (key, items) in &groups {
        push_section(&mut md, &format!("## {}", capitalize_first(key)), items);
    }
    md
}
