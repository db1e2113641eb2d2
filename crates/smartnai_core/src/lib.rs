//! Core domain logic for SmartNAI.
//! Owns the prompt tree, its mutations, the prompt compiler and the
//! snapshot persistence policy.

pub mod compiler;
pub mod config;
pub mod db;
pub mod host;
pub mod logging;
pub mod model;
pub mod ops;
pub mod repo;
pub mod service;

pub use compiler::{compile_prompt, CompiledPrompt};
pub use config::{SessionConfig, DEFAULT_DB_FILE_NAME, DEFAULT_STORAGE_KEY};
pub use host::{
    ChangeEvent, ConfirmGate, FieldUpdate, HostBridge, HostError, HostPage, HostSelectors,
    PageField, PageHostBridge,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::prompt::{default_app_state, AppState, Item, ItemList, Topic, TopicId};
pub use model::view::{TopicView, ViewState};
pub use ops::{EditError, EditResult};
pub use repo::snapshot_repo::{RepoError, RepoResult, SnapshotRepository, SqliteSnapshotRepository};
pub use service::session_service::{CommitError, PromptSession};
pub use service::snapshot_service::{SnapshotError, SnapshotService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
