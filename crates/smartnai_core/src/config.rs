//! Session configuration defaults.
//!
//! # Responsibility
//! - Name the storage key and database location a session uses.
//!
//! # Invariants
//! - Defaults match the key earlier releases stored snapshots under.

use std::path::PathBuf;

/// Storage key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "appState";
/// Database file name used when no path is configured.
pub const DEFAULT_DB_FILE_NAME: &str = "smartnai.sqlite3";

/// Where a session loads and saves its snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub storage_key: String,
    pub db_path: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
        }
    }
}

impl SessionConfig {
    /// Overrides the configured values that are present.
    ///
    /// Blank keys are ignored so a stray empty flag keeps the default key.
    pub fn with_overrides(mut self, storage_key: Option<String>, db_path: Option<PathBuf>) -> Self {
        if let Some(key) = storage_key.filter(|key| !key.trim().is_empty()) {
            self.storage_key = key.trim().to_string();
        }
        if let Some(path) = db_path {
            self.db_path = path;
        }
        self
    }
}
