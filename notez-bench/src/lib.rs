//! Sample notes shared by the NOTEZ benchmarks.

/// Meeting note with attendees, a date, and action items.
pub const MEETING: &str = "meeting with marketing team on 12/03/2026\n\
    sarah discussed q1 results\n\
    john will prepare the budget report\n\
    need to follow up with design by friday\n\
    action: mike to send the deck";

/// Sequential process description.
pub const SIGNUP_FLOW: &str = "first user enters email\n\
    then creates password\n\
    next confirms terms\n\
    finally account activated";

/// A fenced remote diagram as a model would return it.
pub const REMOTE_DIAGRAM: &str = "```mermaid\nflowchart LR\n  A[Sign up] --> B[Verify]\n  B --> C[Done]\n```";

/// A long general note: `lines` lines across a handful of topics.
#[must_use]
pub fn large_note(lines: usize) -> String {
    const TOPICS: [&str; 5] = ["garden plans", "kitchen repairs", "book list", "travel ideas", "budget review"];
    (0..lines)
        .map(|i| format!("{} item {i} with some extra words", TOPICS[i % TOPICS.len()]))
        .collect::<Vec<_>>()
        .join("\n")
}
