//! In-process record source for tests and embedding.

use crate::persist::{PersistResult, RecordSource};
use crate::store::document_store::RecordMap;

/// Record source that keeps the last saved mapping in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    records: RecordMap,
    saves: usize,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the source with records returned by the next `load_all`.
    pub fn with_records(records: RecordMap) -> Self {
        Self { records, saves: 0 }
    }

    /// Last saved (or seeded) mapping.
    pub fn records(&self) -> &RecordMap {
        &self.records
    }

    /// Number of successful `save_all` calls.
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl RecordSource for MemorySource {
    fn backend(&self) -> &'static str {
        "memory"
    }

    fn load_all(&mut self) -> PersistResult<RecordMap> {
        Ok(self.records.clone())
    }

    fn save_all(&mut self, records: &RecordMap) -> PersistResult<()> {
        self.records = records.clone();
        self.saves += 1;
        Ok(())
    }
}
