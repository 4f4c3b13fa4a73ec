//! Friend identifier resolution.
//!
//! # Responsibility
//! - Confirm every friend id in a candidate record exists in the store.
//!
//! # Invariants
//! - Resolution never reorders or deduplicates the input.
//! - The first unresolved id is the one reported.

use crate::model::record::{Record, RecordId};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Existence lookup used by the resolver.
pub trait RecordLookup {
    fn contains_record(&self, id: &str) -> bool;
}

impl RecordLookup for BTreeMap<RecordId, Record> {
    fn contains_record(&self, id: &str) -> bool {
        self.contains_key(id)
    }
}

/// Resolution failure for a friends list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    UnknownFriend(RecordId),
}

impl Display for ResolveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownFriend(id) => write!(f, "friend `{id}` is not present in the store"),
        }
    }
}

impl Error for ResolveError {}

/// Checks that every id in `friends` exists in `lookup`.
pub fn resolve<L: RecordLookup + ?Sized>(
    friends: &[RecordId],
    lookup: &L,
) -> Result<(), ResolveError> {
    match friends.iter().find(|id| !lookup.contains_record(id.as_str())) {
        Some(missing) => Err(ResolveError::UnknownFriend(missing.clone())),
        None => Ok(()),
    }
}
