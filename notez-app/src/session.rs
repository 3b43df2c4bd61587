//! Request ordering for one editing session.
//!
//! Every processing pass takes a [`Ticket`] before it starts. A finished
//! pass is applied only if its ticket is newer than the last one applied,
//! so a slow early request can never overwrite a faster later one.

use parking_lot::Mutex;
use tracing::debug;

use notez_core::ProcessedNote;

/// Monotonic id of one processing pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    /// Raw sequence number.
    #[must_use]
    pub fn id(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
struct SessionState {
    issued: u64,
    applied: u64,
    last_text: Option<String>,
    current: Option<ProcessedNote>,
}

/// Shared state of the editing session.
#[derive(Debug, Default)]
pub struct NoteSession {
    state: Mutex<SessionState>,
}

impl NoteSession {
    /// Create an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a pass for `text`.
    ///
    /// Returns `None` when `text` equals the text of the previous pass,
    /// unless `force` is set (explicit mode toggles re-run unchanged text).
    pub fn begin(&self, text: &str, force: bool) -> Option<Ticket> {
        let mut state = self.state.lock();
        if !force && state.last_text.as_deref() == Some(text) {
            debug!("Text unchanged since last pass, skipping");
            return None;
        }
        state.issued += 1;
        state.last_text = Some(text.to_string());
        Some(Ticket(state.issued))
    }

    /// Finish a pass. Returns `true` if `result` became the current note.
    ///
    /// A `None` result (input too short) clears nothing but still advances
    /// the applied ticket, so older passes stay stale.
    pub fn complete(&self, ticket: Ticket, result: Option<ProcessedNote>) -> bool {
        let mut state = self.state.lock();
        if ticket.0 <= state.applied {
            debug!(ticket = ticket.0, applied = state.applied, "Discarding stale result");
            return false;
        }
        state.applied = ticket.0;
        match result {
            Some(note) => {
                state.current = Some(note);
                true
            }
            None => false,
        }
    }

    /// The most recently applied note.
    #[must_use]
    pub fn current(&self) -> Option<ProcessedNote> {
        self.state.lock().current.clone()
    }

    /// Forget everything (clear button).
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.last_text = None;
        state.current = None;
        state.applied = state.issued;
    }
}
