//! Error types for the NOTEZ core library.
//!
//! Classification, extraction, and rendering never fail; these errors only
//! come from the edges (configuration files and the local key-value store).

use thiserror::Error;

/// Top-level error type for NOTEZ core operations.
#[derive(Error, Debug)]
pub enum NotezError {
    /// Configuration could not be parsed or is out of range.
    #[error("Configuration error: {0}")]
    Config(String),

    /// SQLite store error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, NotezError>;
