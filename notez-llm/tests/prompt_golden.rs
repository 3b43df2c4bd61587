//! Organizer Prompt: Golden Test Set.
//!
//! Curated note/mode pairs checking that the rendered prompt carries the
//! note verbatim, names the mode, and keeps the output contract. These run
//! offline; no model is called.

use notez_llm::prompt::{self, PromptTemplate};

/// A golden test case for prompt rendering.
struct GoldenCase {
    /// Human-readable name for the test case.
    name: &'static str,
    /// Raw note text.
    text: &'static str,
    /// Mode name passed to the prompt.
    mode: &'static str,
    /// Strings that MUST appear in the rendered user turn.
    user_must_contain: Vec<&'static str>,
}

fn golden_cases() -> Vec<GoldenCase> {
    vec![
        GoldenCase {
            name: "meeting_organize",
            text: "meeting with marketing team\nsarah discussed q1 results\nbudget increased by 15%",
            mode: "organize",
            user_must_contain: vec!["sarah discussed q1 results", "budget increased by 15%", "Mode: organize"],
        },
        GoldenCase {
            name: "signup_flow_visualize",
            text: "first user enters email\nthen creates password\nfinally account activated",
            mode: "visualize",
            user_must_contain: vec!["first user enters email", "Mode: visualize"],
        },
        GoldenCase {
            name: "project_with_deadline",
            text: "website relaunch project\nalex is handling design\ndeadline is march 3",
            mode: "organize",
            user_must_contain: vec!["alex is handling design", "deadline is march 3"],
        },
        GoldenCase {
            name: "braces_in_note_survive",
            text: "config uses {\"debug\": true} and {mode} literally",
            mode: "organize",
            user_must_contain: vec!["{\"debug\": true}", "{mode} literally", "Mode: organize"],
        },
        GoldenCase {
            name: "unicode_note",
            text: "réunion avec l'équipe 🚀\nbudget validé",
            mode: "organize",
            user_must_contain: vec!["réunion avec l'équipe 🚀", "budget validé"],
        },
    ]
}

#[test]
fn golden_prompts_render_note_and_mode() {
    let template = PromptTemplate::builtin();
    for case in golden_cases() {
        let (system, user) = template.render(case.text, case.mode);
        assert!(
            user.starts_with("User Input:\n"),
            "Golden case '{}': user turn must open with the input header.\nRendered:\n{user}",
            case.name
        );
        for needle in &case.user_must_contain {
            assert!(
                user.contains(needle),
                "Golden case '{}': user turn must contain '{needle}' but doesn't.\nRendered:\n{user}",
                case.name
            );
        }
        assert!(
            !system.contains("{text}") && !system.contains("{mode}"),
            "Golden case '{}': system prompt has unresolved placeholders",
            case.name
        );
    }
}

#[test]
fn combined_prompt_matches_wire_layout() {
    let (system, user) = PromptTemplate::builtin().render("buy milk", "organize");
    let request = notez_llm::LlmRequest::new(system, user);
    assert_eq!(
        request.combined_prompt(),
        format!("{}\n\nUser Input:\nbuy milk\n\nMode: organize", prompt::ORGANIZER_SYSTEM)
    );
    assert!((request.temperature - 0.3).abs() < f32::EPSILON);
    assert_eq!(request.max_tokens, 2048);
}

#[test]
fn system_prompt_keeps_output_contract() {
    for needle in ["```json", "\"mode\"", "\"content\"", "\"format\"", "mermaid", "markdown"] {
        assert!(
            prompt::ORGANIZER_SYSTEM.contains(needle),
            "system prompt must mention {needle}"
        );
    }
}

#[test]
fn shipped_override_keeps_output_contract() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/prompts/organizer.toml");
    let template = PromptTemplate::from_file(path).expect("shipped prompt file");
    assert!(template.system.contains("```json"));
    let (_, user) = template.render("note", "visualize");
    assert_eq!(user, "User Input:\nnote\n\nMode: visualize");
}
