//! Note classification: text → processing and diagram strategy.
//!
//! Both axes are first-match-wins over ordered keyword sets; match counts
//! are ignored. A note with no hits in any set degrades to
//! [`NoteKind::General`] / [`DiagramKind::Simple`], so classification never
//! fails.

use tracing::debug;

use crate::matchers::{HIERARCHY, MEETING, PROCESS, PROJECT, TIMELINE, VISUALIZE};
use crate::types::{Classification, DiagramKind, Mode, NoteKind};

/// Pick the organize-mode strategy: project > meeting > general.
#[must_use]
pub fn classify_note(text: &str) -> NoteKind {
    if PROJECT.is_match(text) {
        NoteKind::Project
    } else if MEETING.is_match(text) {
        NoteKind::Meeting
    } else {
        NoteKind::General
    }
}

/// Pick the visualize-mode strategy: process > hierarchy > timeline > simple.
#[must_use]
pub fn classify_diagram(text: &str) -> DiagramKind {
    if PROCESS.is_match(text) {
        DiagramKind::Flowchart
    } else if HIERARCHY.is_match(text) {
        DiagramKind::Mindmap
    } else if TIMELINE.is_match(text) {
        DiagramKind::Timeline
    } else {
        DiagramKind::Simple
    }
}

/// Classify along both axes.
#[must_use]
pub fn classify(text: &str) -> Classification {
    let classification = Classification {
        note: classify_note(text),
        diagram: classify_diagram(text),
    };
    debug!(
        note = %classification.note,
        diagram = %classification.diagram,
        "Classified note"
    );
    classification
}

/// Whether the text reads like something that should be drawn.
#[must_use]
pub fn should_visualize(text: &str) -> bool {
    VISUALIZE.is_match(text)
}

/// Resolve the effective mode for a pass.
///
/// With smart mode on, the requested toggle is ignored and the mode follows
/// [`should_visualize`].
#[must_use]
pub fn resolve_mode(text: &str, requested: Mode, smart_mode: bool) -> Mode {
    if !smart_mode {
        return requested;
    }
    if should_visualize(text) {
        Mode::Visualize
    } else {
        Mode::Organize
    }
}
