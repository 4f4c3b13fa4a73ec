//! Document store over user records.
//!
//! # Responsibility
//! - Provide get/list/insert/replace/delete over the record mapping.
//! - Keep the friends graph consistent when a record is deleted.
//!
//! # Invariants
//! - Writes assume the record already passed `validate` and `resolve`.
//! - `delete` always runs `cascade_unfriend` before returning.
//! - Deleted ids are retired and never handed out again.
//! - Full listing is ordered by identifier.

use crate::model::record::{Record, RecordId};
use crate::store::resolver::RecordLookup;
use log::debug;
use std::collections::{BTreeMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Full identifier -> record mapping.
pub type RecordMap = BTreeMap<RecordId, Record>;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level lookup failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    NotFound(RecordId),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "record not found: {id}"),
        }
    }
}

impl Error for StoreError {}

/// A friend edge whose target is not in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    /// Record whose friends list holds the edge.
    pub owner: RecordId,
    /// Missing target id.
    pub missing: RecordId,
}

/// In-memory identifier -> record store.
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    records: RecordMap,
    retired: HashSet<RecordId>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from records produced by a persistence source.
    ///
    /// Records are taken as-is; call `dangling_references` to audit edges.
    pub fn from_records(records: RecordMap) -> Self {
        Self {
            records,
            retired: HashSet::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    /// Returns an owned copy of the full mapping.
    pub fn get_all(&self) -> RecordMap {
        self.records.clone()
    }

    /// Read-only view of the mapping, used for persistence.
    pub fn as_map(&self) -> &RecordMap {
        &self.records
    }

    /// Looks up one record together with its stored key.
    pub fn get_entry(&self, id: &str) -> Option<(&RecordId, &Record)> {
        self.records.get_key_value(id)
    }

    pub fn get_one(&self, id: &str) -> StoreResult<&Record> {
        self.records
            .get(id)
            .ok_or_else(|| StoreError::NotFound(RecordId::from(id)))
    }

    /// Stores `record` under a freshly allocated identifier.
    pub fn insert(&mut self, record: Record) -> RecordId {
        let id = self.allocate_id();
        self.records.insert(id.clone(), record);
        id
    }

    /// Overwrites the record at `id` wholesale.
    pub fn replace(&mut self, id: &str, record: Record) -> StoreResult<()> {
        match self.records.get_mut(id) {
            Some(slot) => {
                *slot = record;
                Ok(())
            }
            None => Err(StoreError::NotFound(RecordId::from(id))),
        }
    }

    /// Removes the record at `id` and cascades the removal into every
    /// remaining friends list.
    ///
    /// Returns the number of friend edges removed by the cascade.
    pub fn delete(&mut self, id: &str) -> StoreResult<usize> {
        let (removed_id, _) = self
            .records
            .remove_entry(id)
            .ok_or_else(|| StoreError::NotFound(RecordId::from(id)))?;

        let unlinked = self.cascade_unfriend(&removed_id);
        debug!("event=record_delete module=store status=ok id={removed_id} unlinked_edges={unlinked}");
        self.retired.insert(removed_id);
        Ok(unlinked)
    }

    /// Lists every friend edge that points at a missing record.
    pub fn dangling_references(&self) -> Vec<DanglingReference> {
        let mut dangling = Vec::new();
        for (owner, record) in &self.records {
            for friend in &record.friends {
                if !self.records.contains_key(friend) {
                    dangling.push(DanglingReference {
                        owner: owner.clone(),
                        missing: friend.clone(),
                    });
                }
            }
        }
        dangling
    }

    /// Strips every occurrence of `id` from all friends lists, keeping the
    /// relative order of the remaining entries.
    fn cascade_unfriend(&mut self, id: &RecordId) -> usize {
        let mut unlinked = 0;
        for record in self.records.values_mut() {
            let before = record.friends.len();
            record.friends.retain(|friend| friend != id);
            unlinked += before - record.friends.len();
        }
        unlinked
    }

    fn allocate_id(&self) -> RecordId {
        loop {
            let candidate = RecordId::generate();
            if !self.records.contains_key(&candidate) && !self.retired.contains(&candidate) {
                return candidate;
            }
        }
    }
}

impl RecordLookup for DocumentStore {
    fn contains_record(&self, id: &str) -> bool {
        self.contains(id)
    }
}
