//! Core use-case services.
//!
//! # Responsibility
//! - Wrap snapshot storage with load/save fallback policy.
//! - Own the live editing session and run the commit flow.
//! - Keep host/CLI layers decoupled from storage and compilation details.

pub mod session_service;
pub mod snapshot_service;
