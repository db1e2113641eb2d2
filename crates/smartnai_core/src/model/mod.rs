//! Prompt tree domain model.
//!
//! # Responsibility
//! - Define the persisted prompt tree (`AppState` -> `Topic` -> `Item`).
//! - Keep view-only state (expansion, staging text) out of the persisted shape.
//!
//! # Invariants
//! - Topic order and item order are significant and preserved.
//! - Every topic carries a session-local `TopicId` that is never serialized.
//! - Undesired items never hold a negative level after a mutation.

pub mod prompt;
pub mod view;
