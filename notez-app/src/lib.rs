//! # NOTEZ App
//!
//! Ties the rule engine and the remote organizer into an editing session:
//!
//! - [`organizer::Organizer`]: remote delegate with a total local fallback
//! - [`session::NoteSession`]: ticketed passes so stale results are dropped
//! - [`debounce::Debouncer`]: inactivity timers for processing and autosave
//! - [`watch`]: live mode over a note file
//! - [`export`]: `notes.md` / `notes.mmd` output
//! - [`logging`]: tracing subscriber setup

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod debounce;
pub mod error;
pub mod export;
pub mod logging;
pub mod organizer;
pub mod session;
pub mod watch;

pub use error::{AppError, Result};
pub use organizer::{NoteSource, Organizer, Outcome};
pub use session::{NoteSession, Ticket};
