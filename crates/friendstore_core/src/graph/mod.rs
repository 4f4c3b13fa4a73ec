//! Friend-graph queries over stored records.
//!
//! # Responsibility
//! - Answer "who is within N hops of this record" over `friends` edges.
//!
//! # Invariants
//! - Edges are directed: record -> each listed friend.
//! - Queries never mutate the store.

pub mod traversal;
