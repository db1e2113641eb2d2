//! Host-side collaborators of the editing session.
//!
//! # Responsibility
//! - Define how compiled prompts reach the host page (`HostBridge`).
//! - Define the blocking yes/no gate for destructive actions (`ConfirmGate`).
//! - Provide an in-memory page model that embeds the field lookup rules.
//!
//! # Invariants
//! - A missing positive field is an error; a missing undesired field is not.

pub mod bridge;
pub mod page;

pub use bridge::{ConfirmGate, FieldUpdate, HostBridge, HostError};
pub use page::{ChangeEvent, HostPage, HostSelectors, PageField, PageHostBridge};
