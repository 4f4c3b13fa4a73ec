//! In-process document store and referential checks.
//!
//! # Responsibility
//! - Own the identifier -> record mapping.
//! - Check that referenced friend ids exist before mutations.
//!
//! # Invariants
//! - Store writes never introduce dangling friend references.
//! - Delete removes the id from every remaining friends list.
//! - Identifiers are never reused after deletion.

pub mod document_store;
pub mod resolver;
