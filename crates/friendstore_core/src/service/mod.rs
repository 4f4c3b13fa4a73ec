//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validation, resolution, store calls and persistence.
//! - Keep handler and CLI layers decoupled from storage details.

pub mod user_service;
