//! SQLite key-value store for the draft, credential, and preferences.
//!
//! ```sql
//! CREATE TABLE IF NOT EXISTS kv (
//!     key        TEXT PRIMARY KEY,
//!     value      TEXT NOT NULL,
//!     updated_at TEXT NOT NULL
//! );
//! ```
//!
//! Only three well-known keys are used: [`DRAFT_KEY`], [`CREDENTIAL_KEY`],
//! and [`SMART_MODE_KEY`]. There is one draft, never a document history.

use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use tracing::{debug, info};

use crate::error::Result;

/// Key holding the current draft text.
pub const DRAFT_KEY: &str = "note-organizer-text";
/// Key holding the remote organizer API key.
pub const CREDENTIAL_KEY: &str = "GEMINI_API_KEY";
/// Key holding the smart-mode preference (`"true"` / `"false"`).
pub const SMART_MODE_KEY: &str = "smart-mode";

/// Credentials shorter than this are reported as suspicious.
const MIN_CREDENTIAL_LEN: usize = 30;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS kv (
    key        TEXT PRIMARY KEY,
    value      TEXT NOT NULL,
    updated_at TEXT NOT NULL
);";

/// An opaque API key. Only presence carries meaning.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a raw key, trimming whitespace. Blank input yields `None`.
    #[must_use]
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_string()))
    }

    /// Length heuristic: real keys are longer than 30 characters.
    #[must_use]
    pub fn looks_valid(&self) -> bool {
        self.0.chars().count() > MIN_CREDENTIAL_LEN
    }

    /// The raw key.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Credential(<{} chars>)", self.0.chars().count())
    }
}

/// Handle to the SQLite file holding the well-known keys.
pub struct NoteStore {
    conn: Connection,
    db_path: PathBuf,
}

impl std::fmt::Debug for NoteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoteStore")
            .field("db_path", &self.db_path)
            .finish_non_exhaustive()
    }
}

impl NoteStore {
    /// Open (or create) the store at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::NotezError::Database`] on SQLite failures.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db_path = path.as_ref().to_path_buf();
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(&db_path, flags)?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        conn.execute_batch("PRAGMA busy_timeout = 5000;")?;
        conn.execute_batch(SCHEMA)?;

        info!(path = %db_path.display(), "Note store opened");
        Ok(Self { conn, db_path })
    }

    /// Open an in-memory store (useful for tests).
    ///
    /// # Errors
    ///
    /// Returns [`crate::NotezError::Database`] on SQLite failures.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn,
            db_path: PathBuf::from(":memory:"),
        })
    }

    /// Path of the backing file (`:memory:` for in-memory stores).
    #[must_use]
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    // ------------------------------------------------------------------
    // Raw key access
    // ------------------------------------------------------------------

    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns [`crate::NotezError::Database`] on SQLite failures.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self.conn.prepare_cached("SELECT value FROM kv WHERE key = ?1")?;
        let value = stmt.query_row(params![key], |row| row.get(0)).optional()?;
        Ok(value)
    }

    /// Upsert a value.
    ///
    /// # Errors
    ///
    /// Returns [`crate::NotezError::Database`] on SQLite failures.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO kv (key, value, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at",
            params![key, value, now],
        )?;
        debug!(key, bytes = value.len(), "Stored value");
        Ok(())
    }

    /// Remove a key. Returns `true` if a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns [`crate::NotezError::Database`] on SQLite failures.
    pub fn delete(&self, key: &str) -> Result<bool> {
        let rows = self.conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(rows > 0)
    }

    // ------------------------------------------------------------------
    // Well-known keys
    // ------------------------------------------------------------------

    /// The saved draft, if any.
    ///
    /// # Errors
    ///
    /// Returns [`crate::NotezError::Database`] on SQLite failures.
    pub fn draft(&self) -> Result<Option<String>> {
        self.get(DRAFT_KEY)
    }

    /// Replace the saved draft.
    ///
    /// # Errors
    ///
    /// Returns [`crate::NotezError::Database`] on SQLite failures.
    pub fn save_draft(&self, text: &str) -> Result<()> {
        self.set(DRAFT_KEY, text)
    }

    /// Drop the saved draft.
    ///
    /// # Errors
    ///
    /// Returns [`crate::NotezError::Database`] on SQLite failures.
    pub fn clear_draft(&self) -> Result<bool> {
        self.delete(DRAFT_KEY)
    }

    /// The stored credential, if any.
    ///
    /// # Errors
    ///
    /// Returns [`crate::NotezError::Database`] on SQLite failures.
    pub fn credential(&self) -> Result<Option<Credential>> {
        Ok(self.get(CREDENTIAL_KEY)?.as_deref().and_then(Credential::new))
    }

    /// Store a credential.
    ///
    /// # Errors
    ///
    /// Returns [`crate::NotezError::Database`] on SQLite failures.
    pub fn set_credential(&self, credential: &Credential) -> Result<()> {
        self.set(CREDENTIAL_KEY, credential.expose())
    }

    /// Forget the stored credential.
    ///
    /// # Errors
    ///
    /// Returns [`crate::NotezError::Database`] on SQLite failures.
    pub fn clear_credential(&self) -> Result<bool> {
        self.delete(CREDENTIAL_KEY)
    }

    /// Stored smart-mode preference; `None` when never set.
    ///
    /// # Errors
    ///
    /// Returns [`crate::NotezError::Database`] on SQLite failures.
    pub fn smart_mode(&self) -> Result<Option<bool>> {
        Ok(self.get(SMART_MODE_KEY)?.map(|v| v.trim() == "true"))
    }

    /// Persist the smart-mode preference.
    ///
    /// # Errors
    ///
    /// Returns [`crate::NotezError::Database`] on SQLite failures.
    pub fn set_smart_mode(&self, enabled: bool) -> Result<()> {
        self.set(SMART_MODE_KEY, if enabled { "true" } else { "false" })
    }
}
