//! Record database bootstrap.
//!
//! # Responsibility
//! - Open the SQLite file (or in-memory database) behind `SqliteSource`.
//! - Bring the `users` / `user_friends` schema to the latest version.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - Record rows are never read or written before migrations succeed.
//! - Every bootstrap failure names the database location or the migration
//!   that failed.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Where a record database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    File(PathBuf),
    Memory,
}

impl DbLocation {
    pub fn file(path: impl AsRef<Path>) -> Self {
        Self::File(path.as_ref().to_path_buf())
    }
}

impl Display for DbLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Memory => f.write_str(":memory:"),
        }
    }
}

/// Failure while opening or migrating the record database.
#[derive(Debug)]
pub enum DbError {
    /// The database could not be opened or configured.
    Open {
        location: DbLocation,
        source: rusqlite::Error,
    },
    /// `PRAGMA user_version` could not be read.
    SchemaVersion(rusqlite::Error),
    /// Applying the migration to `version` failed; nothing was committed.
    Migration {
        version: u32,
        source: rusqlite::Error,
    },
    /// The file was written by a build with a newer record schema.
    SchemaTooNew { found: u32, supported: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { location, source } => {
                write!(f, "cannot open record database `{location}`: {source}")
            }
            Self::SchemaVersion(source) => {
                write!(f, "cannot read record schema version: {source}")
            }
            Self::Migration { version, source } => {
                write!(f, "record schema migration {version} failed: {source}")
            }
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "record schema version {found} is newer than supported {supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } | Self::Migration { source, .. } => Some(source),
            Self::SchemaVersion(source) => Some(source),
            Self::SchemaTooNew { .. } => None,
        }
    }
}
