//! Prompt tree persistence adapter.
//!
//! # Responsibility
//! - Encode/decode the persisted snapshot schema as JSON.
//! - Provide best-effort `load`/`save` that never surface storage failures.
//!
//! # Invariants
//! - `load` always yields a usable state; failures fall back to the default.
//! - `save` never changes in-memory state and never returns an error.
//! - Logs carry keys, sizes and error text only, never prompt content.

use crate::model::prompt::{default_app_state, AppState};
use crate::repo::snapshot_repo::{RepoError, SnapshotRepository};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Typed failure of one snapshot read or write.
#[derive(Debug)]
pub enum SnapshotError {
    /// Storage layer failure.
    Repo(RepoError),
    /// State could not be serialized.
    Encode(serde_json::Error),
    /// Stored payload is not a valid snapshot.
    Decode(serde_json::Error),
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode snapshot: {err}"),
            Self::Decode(err) => write!(f, "malformed snapshot: {err}"),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Encode(err) | Self::Decode(err) => Some(err),
        }
    }
}

impl From<RepoError> for SnapshotError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Serializes the persisted form of `state`.
///
/// View state lives outside `AppState`, so the output never contains it.
pub fn encode_snapshot(state: &AppState) -> Result<String, SnapshotError> {
    serde_json::to_string(state).map_err(SnapshotError::Encode)
}

/// Parses a stored snapshot payload.
///
/// Undesired levels below 0 are raised to 0.
pub fn decode_snapshot(payload: &str) -> Result<AppState, SnapshotError> {
    let mut state: AppState = serde_json::from_str(payload).map_err(SnapshotError::Decode)?;
    for slot in &mut state.topics {
        for item in &mut Arc::make_mut(slot).undesired {
            item.level = item.level.max(0);
        }
    }
    Ok(state)
}

/// Load/save facade over a snapshot repository.
pub struct SnapshotService<R: SnapshotRepository> {
    repo: R,
}

impl<R: SnapshotRepository> SnapshotService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Loads the snapshot under `key`, or `None` when nothing is stored.
    pub fn try_load(&self, key: &str) -> Result<Option<AppState>, SnapshotError> {
        match self.repo.get_snapshot(key)? {
            Some(payload) => decode_snapshot(&payload).map(Some),
            None => Ok(None),
        }
    }

    /// Encodes and stores `state` under `key`.
    pub fn try_save(&self, key: &str, state: &AppState) -> Result<(), SnapshotError> {
        let payload = encode_snapshot(state)?;
        self.repo.put_snapshot(key, &payload)?;
        Ok(())
    }

    /// Loads the snapshot under `key`, falling back to the default state.
    ///
    /// Missing, malformed or unreadable snapshots are logged and replaced by
    /// [`default_app_state`].
    pub fn load(&self, key: &str) -> AppState {
        match self.try_load(key) {
            Ok(Some(state)) => {
                info!(
                    "event=snapshot_load module=service status=ok key={} topics={}",
                    key,
                    state.topics.len()
                );
                state
            }
            Ok(None) => {
                info!("event=snapshot_load module=service status=miss key={key} fallback=default");
                default_app_state()
            }
            Err(err) => {
                error!(
                    "event=snapshot_load module=service status=error key={} fallback=default error={}",
                    key, err
                );
                default_app_state()
            }
        }
    }

    /// Stores `state` under `key` on a best-effort basis.
    pub fn save(&self, key: &str, state: &AppState) {
        match self.try_save(key, state) {
            Ok(()) => info!(
                "event=snapshot_save module=service status=ok key={} topics={}",
                key,
                state.topics.len()
            ),
            Err(err) => error!(
                "event=snapshot_save module=service status=error key={} error={}",
                key, err
            ),
        }
    }
}
