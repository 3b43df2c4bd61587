//! # NOTEZ Core Library
//!
//! Rule-based engine that turns freeform notes into organized markdown or
//! mermaid diagrams. Everything in this crate is synchronous and
//! deterministic for a given date:
//!
//! - **Matchers**: fixed keyword sets per category, matched at word starts
//! - **Classifier**: first-match-wins strategy selection
//!   (project > meeting > general; process > hierarchy > timeline > simple)
//! - **Extractors**: names, dates, deadlines, budget figures, action items
//! - **Renderers**: meeting / project / general markdown, and flowchart /
//!   mindmap / gantt / simple diagrams
//! - **Pipeline**: the local fallback that always produces a result
//! - **Store**: SQLite key-value store for the draft, credential, and
//!   smart-mode preference
//!
//! ```
//! use chrono::NaiveDate;
//! use notez_core::{pipeline, Mode, NotezConfig};
//!
//! let today = NaiveDate::from_ymd_opt(2026, 1, 1).expect("valid date");
//! let note = pipeline::process_local(
//!     "first user enters email\nthen creates password",
//!     Mode::Visualize,
//!     &NotezConfig::default(),
//!     today,
//! )
//! .expect("long enough");
//! assert!(note.source().starts_with("graph TD"));
//! ```

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod classifier;
pub mod config;
pub mod diagram;
pub mod error;
pub mod extract;
pub mod markdown;
pub mod matchers;
pub mod mood;
pub mod pipeline;
pub mod store;
pub mod types;
pub mod validate;

pub use classifier::{classify, should_visualize};
pub use config::{InvalidDiagramPolicy, NotezConfig};
pub use error::{NotezError, Result};
pub use mood::{detect_mood, Mood, MoodReading};
pub use store::{Credential, NoteStore};
pub use types::*;
