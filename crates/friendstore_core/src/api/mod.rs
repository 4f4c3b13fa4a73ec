//! Handler layer mapping service outcomes to status-coded responses.
//!
//! # Responsibility
//! - Translate external calls into service calls.
//! - Map every outcome to a `(status, payload)` response.
//!
//! # Invariants
//! - Handlers never panic; every error becomes a response.
//! - Error payloads are `"Error: <message>"` strings.

pub mod handlers;
pub mod response;

pub use response::{ApiResponse, StatusCode};
