//! Record domain model and boundary validation.
//!
//! # Responsibility
//! - Define the canonical user record and its opaque identifier.
//! - Turn weakly-typed request bodies into strongly-typed records.
//!
//! # Invariants
//! - Every stored record is identified by a store-assigned `RecordId`.
//! - A `Record` only exists after passing `validate`.

pub mod record;
pub mod validate;
