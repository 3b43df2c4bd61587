//! Inactivity timers for processing and autosave.
//!
//! Pure state over [`Instant`]s; the caller supplies the clock so the
//! watch loop and the tests share one code path.

use std::time::{Duration, Instant};

/// Fires once after `delay` has passed without a new [`touch`](Self::touch).
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    last_edit: Option<Instant>,
}

impl Debouncer {
    /// Create an idle debouncer.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay, last_edit: None }
    }

    /// Create an idle debouncer from a millisecond delay.
    #[must_use]
    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    /// Record an edit at `now`, restarting the countdown.
    pub fn touch(&mut self, now: Instant) {
        self.last_edit = Some(now);
    }

    /// Whether an edit is waiting.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.last_edit.is_some()
    }

    /// Whether the pending edit has been quiet for the full delay.
    #[must_use]
    pub fn due(&self, now: Instant) -> bool {
        self.last_edit
            .is_some_and(|at| now.saturating_duration_since(at) >= self.delay)
    }

    /// Consume the pending edit if it is due.
    pub fn fire(&mut self, now: Instant) -> bool {
        if self.due(now) {
            self.last_edit = None;
            return true;
        }
        false
    }

    /// Consume the pending edit regardless of the delay (blur, shutdown).
    pub fn flush(&mut self) -> bool {
        self.last_edit.take().is_some()
    }

    /// Time left until the pending edit is due.
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.last_edit
            .map(|at| self.delay.saturating_sub(now.saturating_duration_since(at)))
    }
}
