//! Property-Based Tests for NOTEZ Core
//!
//! Uses `proptest` to check that the local rules never panic, respect the
//! node cap, and honor the minimum-length gate for arbitrary input.

use chrono::NaiveDate;
use proptest::prelude::*;

use notez_core::config::DiagramConfig;
use notez_core::diagram::{self, node_id};
use notez_core::pipeline::{meets_min_length, process_local};
use notez_core::{classify, detect_mood, DiagramKind, Mode, NotezConfig};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, 30).expect("valid date")
}

fn arb_note() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-zA-Z0-9 $%/:\"()\\[\\]-]{0,40}", 0..40).prop_map(|lines| lines.join("\n"))
}

fn arb_kind() -> impl Strategy<Value = DiagramKind> {
    prop_oneof![
        Just(DiagramKind::Flowchart),
        Just(DiagramKind::Mindmap),
        Just(DiagramKind::Timeline),
        Just(DiagramKind::Simple),
    ]
}

// ---------------------------------------------------------------------------
// Property: the local pipeline is total above the minimum length
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn local_pipeline_is_total(text in arb_note(), visualize in any::<bool>()) {
        let mode = if visualize { Mode::Visualize } else { Mode::Organize };
        let config = NotezConfig::default();
        let result = process_local(&text, mode, &config, today());
        if meets_min_length(&text, config.processing.min_length) {
            let note = result.expect("processed above the minimum length");
            prop_assert!(!note.is_empty());
        } else {
            prop_assert!(result.is_none());
        }
    }
}

// ---------------------------------------------------------------------------
// Property: diagram node count never exceeds the cap
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn diagram_respects_node_cap(
        text in arb_note(),
        kind in arb_kind(),
        max_nodes in 1usize..15,
    ) {
        let config = DiagramConfig { max_nodes, ..DiagramConfig::default() };
        let dsl = diagram::render(kind, &text, &config, today());
        let body_lines = dsl.lines().count();
        let header_lines = match kind {
            DiagramKind::Flowchart | DiagramKind::Simple => 1,
            DiagramKind::Timeline => 4,
            DiagramKind::Mindmap => 2,
        };
        let items = body_lines - header_lines;
        match kind {
            // node line + edge line per node after the first
            DiagramKind::Flowchart | DiagramKind::Simple => prop_assert!(items <= 2 * max_nodes),
            DiagramKind::Timeline => prop_assert!(items <= max_nodes),
            // root already counted; category heading + item per remaining line
            DiagramKind::Mindmap => prop_assert!(items <= 2 * max_nodes),
        }
    }
}

// ---------------------------------------------------------------------------
// Property: node identifiers never collide
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn node_ids_are_unique(a in 0usize..5000, b in 0usize..5000) {
        prop_assume!(a != b);
        prop_assert_ne!(node_id(a), node_id(b));
    }
}

// ---------------------------------------------------------------------------
// Property: classification and mood never fail
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn classification_and_mood_are_total(text in "\\PC{0,200}") {
        let _ = classify(&text);
        let reading = detect_mood(&text);
        prop_assert!(reading.intensity >= 1.0);
        prop_assert!(reading.intensity <= 3.0);
    }
}
