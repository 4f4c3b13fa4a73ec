//! User record domain model.
//!
//! # Responsibility
//! - Define the canonical record stored per identifier.
//! - Define the opaque identifier type used for keys and friend edges.
//!
//! # Invariants
//! - `RecordId` values are assigned by the store and never reused.
//! - `friends` keeps insertion order and may contain duplicates.
//! - `email` matches the address rule for every record in a store.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque identifier for one stored record.
///
/// Newly allocated ids are UUID v4 text, but any string loaded from
/// persistence is accepted verbatim.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Wraps an existing identifier string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for RecordId {
    fn borrow(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Canonical user record.
///
/// Serialize-only: inbound data becomes a `Record` through `validate` or a
/// checked row mapping, never through a raw deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    /// Display name, never blank.
    pub name: String,
    /// Contact address in `local@domain.tld` form.
    pub email: String,
    /// Optional age. Omitted from the wire form when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u64>,
    /// Outgoing friend edges, in insertion order.
    pub friends: Vec<RecordId>,
}

impl Record {
    /// Creates a record without an age.
    ///
    /// This constructor does not validate; use `validate` at the boundary.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        friends: impl IntoIterator<Item = RecordId>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            age: None,
            friends: friends.into_iter().collect(),
        }
    }

    /// Returns this record with `age` set.
    pub fn with_age(mut self, age: u64) -> Self {
        self.age = Some(age);
        self
    }

    /// Returns whether `id` appears at least once in `friends`.
    pub fn lists_friend(&self, id: &str) -> bool {
        self.friends.iter().any(|friend| friend.as_str() == id)
    }
}
