//! Error type for the organizer front end.

use thiserror::Error;

/// Errors raised while wiring the organizer together or writing its output.
///
/// Remote failures during processing are not errors here; they are logged
/// and answered with the local pipeline.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration, storage, or serialization failure from the core crate.
    #[error(transparent)]
    Core(#[from] notez_core::NotezError),

    /// Remote organizer could not be configured.
    #[error(transparent)]
    Llm(#[from] notez_llm::LlmError),

    /// File system failure (export, reading input).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File watcher failure.
    #[error("Watch error: {0}")]
    Watch(#[from] notify::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, AppError>;
