//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the key/value snapshot contract used by the persistence adapter.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repositories store opaque payload strings; encoding belongs to services.
//! - Repository APIs return transport errors; fallback policy lives above.

pub mod snapshot_repo;
