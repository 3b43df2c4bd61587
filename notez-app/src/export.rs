//! Writing processed notes to disk.

use std::path::{Path, PathBuf};

use tracing::info;

use notez_core::ProcessedNote;

use crate::error::Result;

/// File name for an exported note: `notes.md` or `notes.mmd`.
#[must_use]
pub fn export_file_name(note: &ProcessedNote) -> String {
    format!("notes.{}", note.file_extension())
}

/// Write the note's source text into `dir`, creating the directory if
/// needed. Returns the written path.
///
/// # Errors
///
/// Returns an I/O error if the directory or file cannot be written.
pub fn export_note(note: &ProcessedNote, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(note));
    std::fs::write(&path, note.source())?;
    info!(path = %path.display(), format = ?note.format(), "Exported note");
    Ok(path)
}
