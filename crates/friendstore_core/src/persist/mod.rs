//! Persistence collaborators for the record store.
//!
//! # Responsibility
//! - Load the full record mapping at startup.
//! - Persist the full record mapping after each successful mutation.
//!
//! # Invariants
//! - Sources never hand back records that fail format checks.
//! - Sources do not check friend edges; the store audits those.

use crate::db::DbError;
use crate::model::validate::ValidationError;
use crate::store::document_store::RecordMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod json_file;
pub mod memory;
pub mod sqlite;

pub use json_file::JsonFileSource;
pub use memory::MemorySource;
pub use sqlite::SqliteSource;

pub type PersistResult<T> = Result<T, PersistError>;

/// Errors raised while loading or saving records.
#[derive(Debug)]
pub enum PersistError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Json(serde_json::Error),
    /// The record database could not be opened or migrated.
    Db(DbError),
    /// A record query failed on an open database.
    Sqlite(rusqlite::Error),
    /// A persisted record failed validation.
    InvalidRecord {
        id: String,
        source: ValidationError,
    },
    /// Persisted data cannot be mapped to the record model.
    InvalidData(String),
}

impl Display for PersistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "i/o error on `{}`: {source}", path.display()),
            Self::Json(err) => write!(f, "malformed record file: {err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Sqlite(err) => write!(f, "record query failed: {err}"),
            Self::InvalidRecord { id, source } => {
                write!(f, "invalid persisted record `{id}`: {source}")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for PersistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Sqlite(err) => Some(err),
            Self::InvalidRecord { source, .. } => Some(source),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<DbError> for PersistError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for PersistError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Load-all / save-all persistence contract consumed by the service layer.
pub trait RecordSource {
    /// Short backend label used in log events.
    fn backend(&self) -> &'static str;
    fn load_all(&mut self) -> PersistResult<RecordMap>;
    fn save_all(&mut self, records: &RecordMap) -> PersistResult<()>;
}

impl<S: RecordSource + ?Sized> RecordSource for Box<S> {
    fn backend(&self) -> &'static str {
        (**self).backend()
    }

    fn load_all(&mut self) -> PersistResult<RecordMap> {
        (**self).load_all()
    }

    fn save_all(&mut self, records: &RecordMap) -> PersistResult<()> {
        (**self).save_all(records)
    }
}
