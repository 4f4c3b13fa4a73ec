//! JSON file record source.
//!
//! The file holds one object mapping identifier -> record body, the same
//! layout request bodies use:
//!
//! ```json
//! {
//!   "49bf5290-434b-11ed-89f9-acde48001122": {
//!     "name": "Adonalsium",
//!     "email": "ado@brandosando.net",
//!     "friends": ["49bf5452-434b-11ed-89f9-acde48001122"]
//!   }
//! }
//! ```

use crate::model::record::RecordId;
use crate::model::validate::validate;
use crate::persist::{PersistError, PersistResult, RecordSource};
use crate::store::document_store::RecordMap;
use log::{info, warn};
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Record source backed by a single JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> PersistError {
        PersistError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl RecordSource for JsonFileSource {
    fn backend(&self) -> &'static str {
        "json"
    }

    /// Reads and validates every record. A missing file loads as empty.
    fn load_all(&mut self) -> PersistResult<RecordMap> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    "event=source_load module=persist status=empty backend=json path={}",
                    self.path.display()
                );
                return Ok(RecordMap::new());
            }
            Err(err) => return Err(self.io_error(err)),
        };

        let raw: Map<String, Value> = serde_json::from_str(&text)?;
        let mut records = RecordMap::new();
        for (id, body) in raw {
            let record = validate(Some(&body))
                .map_err(|source| PersistError::InvalidRecord { id: id.clone(), source })?;
            records.insert(RecordId::new(id), record);
        }
        Ok(records)
    }

    /// Writes the full mapping to a sibling temp file, then renames it over
    /// the target. The temp file is removed when the rename fails.
    fn save_all(&mut self, records: &RecordMap) -> PersistResult<()> {
        let text = serde_json::to_string_pretty(records)?;
        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        fs::write(&tmp_path, text).map_err(|err| self.io_error(err))?;
        if let Err(err) = fs::rename(&tmp_path, &self.path) {
            if let Err(cleanup) = fs::remove_file(&tmp_path) {
                warn!(
                    "event=source_save module=persist status=error backend=json error_code=tmp_cleanup_failed path={} error={cleanup}",
                    tmp_path.display()
                );
            }
            return Err(self.io_error(err));
        }
        Ok(())
    }
}
