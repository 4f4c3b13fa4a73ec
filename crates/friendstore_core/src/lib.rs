//! Core domain logic for friendstore.
//! This crate is the single source of truth for record and friend-graph
//! invariants.

pub mod api;
pub mod config;
pub mod db;
pub mod graph;
pub mod logging;
pub mod model;
pub mod persist;
pub mod service;
pub mod store;

pub use api::handlers;
pub use api::{ApiResponse, StatusCode};
pub use config::{Backend, StoreConfig};
pub use graph::traversal::{traverse, FriendGraph, Neighbor};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::record::{Record, RecordId};
pub use model::validate::{is_valid_email, validate, Field, ValidationError, MAX_AGE};
pub use persist::{
    JsonFileSource, MemorySource, PersistError, PersistResult, RecordSource, SqliteSource,
};
pub use service::user_service::{ServiceError, ServiceResult, UserService};
pub use store::document_store::{
    DanglingReference, DocumentStore, RecordMap, StoreError, StoreResult,
};
pub use store::resolver::{resolve, RecordLookup, ResolveError};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
