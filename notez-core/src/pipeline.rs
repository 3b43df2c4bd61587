//! Local processing pipeline: gate, classify, render.
//!
//! This is the total fallback behind the remote organizer. For text that
//! clears the minimum length it always yields a non-empty
//! [`ProcessedNote`]; it has no failure path.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::classifier::{classify_diagram, classify_note, resolve_mode};
use crate::config::NotezConfig;
use crate::types::{Mode, ProcessedNote};
use crate::{diagram, markdown};

/// Whether `text` is long enough to be worth processing.
#[must_use]
pub fn meets_min_length(text: &str, min_length: usize) -> bool {
    text.trim().chars().count() >= min_length
}

/// Process `text` with the local rules only.
///
/// Returns `None` when the trimmed text is shorter than
/// `processing.min_length`; in that case nothing is classified.
/// `requested` is overridden when `processing.smart_mode` is on.
#[must_use]
pub fn process_local(
    text: &str,
    requested: Mode,
    config: &NotezConfig,
    today: NaiveDate,
) -> Option<ProcessedNote> {
    if !meets_min_length(text, config.processing.min_length) {
        debug!(
            chars = text.trim().chars().count(),
            min_length = config.processing.min_length,
            "Note below minimum length, skipping"
        );
        return None;
    }

    let mode = resolve_mode(text, requested, config.processing.smart_mode);
    Some(render_local(text, mode, config, today))
}

/// Render `text` in `mode` without the length gate or smart-mode switch.
#[must_use]
pub fn render_local(text: &str, mode: Mode, config: &NotezConfig, today: NaiveDate) -> ProcessedNote {
    match mode {
        Mode::Organize => {
            let kind = classify_note(text);
            info!(%kind, "Rendering note locally");
            ProcessedNote::organized(markdown::render(kind, text))
        }
        Mode::Visualize => {
            let kind = classify_diagram(text);
            info!(%kind, "Rendering diagram locally");
            ProcessedNote::diagram(diagram::render(kind, text, &config.diagram, today))
        }
    }
}

/// Show `text` as a plain bullet list, one line per item.
#[must_use]
pub fn degrade_to_bullets(text: &str) -> ProcessedNote {
    ProcessedNote::organized(markdown::render_bullets(text))
}
