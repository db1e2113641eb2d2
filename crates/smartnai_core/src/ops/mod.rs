//! Pure prompt tree mutations.
//!
//! # Responsibility
//! - Turn one user intent plus the current `AppState` into the next state.
//!
//! # Invariants
//! - Inputs are never modified; every call returns a fresh aggregate.
//! - Only the touched topic is copied; other topics keep sharing their `Arc`.
//! - Filtered intents (blank add, negative undesired level) return a state
//!   equal to the input instead of an error.

pub mod tree_ops;

pub use tree_ops::{
    add_item, add_topic, change_level, drop_blank_items, move_topic, on_item_blur, remove_item,
    remove_topic, rename_topic, set_base_prompt, toggle_topic_active, update_item_prompt, EditError,
    EditResult,
};
