//! Editing session use-case service.
//!
//! # Responsibility
//! - Own the live `AppState` and its `ViewState` for one session.
//! - Apply one mutation per user intent by replacing state wholesale.
//! - Run the commit flow: compile, push to host, persist snapshot.
//!
//! # Invariants
//! - Live state only changes through `ops` results, never in place.
//! - View state is pruned after every replacement and never persisted.
//! - A commit that cannot reach the positive field saves nothing.
//! - Committed and saved trees never contain blank items.

use crate::compiler::{compile_prompt, CompiledPrompt};
use crate::host::{ConfirmGate, FieldUpdate, HostBridge, HostError};
use crate::model::prompt::{AppState, ItemList, TopicId};
use crate::model::view::{TopicView, ViewState};
use crate::ops::{self, EditError, EditResult};
use crate::repo::snapshot_repo::SnapshotRepository;
use crate::service::snapshot_service::SnapshotService;
use log::{debug, error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Errors that abort a commit.
#[derive(Debug)]
pub enum CommitError {
    /// Compiled text could not be pushed into the host.
    Host(HostError),
}

impl Display for CommitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Host(err) => write!(f, "failed to update prompt: {err}"),
        }
    }
}

impl Error for CommitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Host(err) => Some(err),
        }
    }
}

impl From<HostError> for CommitError {
    fn from(value: HostError) -> Self {
        Self::Host(value)
    }
}

/// Live editing session over one storage key.
pub struct PromptSession<R: SnapshotRepository> {
    snapshots: SnapshotService<R>,
    key: String,
    state: AppState,
    view: ViewState,
}

impl<R: SnapshotRepository> PromptSession<R> {
    /// Opens a session, loading the snapshot stored under `key`.
    ///
    /// Falls back to the default tree when nothing usable is stored.
    pub fn open(snapshots: SnapshotService<R>, key: impl Into<String>) -> Self {
        let key = key.into();
        let state = snapshots.load(&key);
        Self {
            snapshots,
            key,
            state,
            view: ViewState::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Topics merged with their expansion flags, for display.
    pub fn topic_views(&self) -> Vec<TopicView<'_>> {
        self.view.topic_views(&self.state)
    }

    pub fn set_base_prompt(&mut self, text: impl Into<String>) {
        let next = ops::set_base_prompt(&self.state, text);
        self.replace(next);
    }

    /// Appends a default topic and expands it. Returns its id.
    pub fn add_topic(&mut self) -> TopicId {
        let next = ops::add_topic(&self.state);
        let id = next
            .topics
            .last()
            .map(|topic| topic.id())
            .unwrap_or_default();
        self.replace(next);
        self.view.set_open(id, true);
        id
    }

    /// Removes a topic after `gate` accepts the confirmation message.
    ///
    /// Returns `Ok(false)` when the user declined; state is then unchanged.
    pub fn remove_topic<G>(&mut self, topic_index: usize, gate: &mut G) -> EditResult<bool>
    where
        G: ConfirmGate + ?Sized,
    {
        let topic = self
            .state
            .topic(topic_index)
            .ok_or(EditError::TopicNotFound(topic_index))?;
        let message = format!(
            "Are you sure you want to delete the topic \"{}\"?",
            topic.name
        );
        if !gate.confirm(&message) {
            debug!("event=topic_remove module=service status=skipped reason=declined");
            return Ok(false);
        }
        let next = ops::remove_topic(&self.state, topic_index)?;
        self.replace(next);
        Ok(true)
    }

    pub fn toggle_topic_active(&mut self, topic_index: usize) -> EditResult<()> {
        let next = ops::toggle_topic_active(&self.state, topic_index)?;
        self.replace(next);
        Ok(())
    }

    /// Flips the expansion flag of one topic and returns the new value.
    pub fn toggle_topic_open(&mut self, topic_index: usize) -> EditResult<bool> {
        let id = self.topic_id(topic_index)?;
        Ok(self.view.toggle_open(id))
    }

    pub fn rename_topic(&mut self, topic_index: usize, name: impl Into<String>) -> EditResult<()> {
        let next = ops::rename_topic(&self.state, topic_index, name)?;
        self.replace(next);
        Ok(())
    }

    pub fn move_topic(&mut self, topic_index: usize, target_index: usize) -> EditResult<()> {
        let next = ops::move_topic(&self.state, topic_index, target_index)?;
        self.replace(next);
        Ok(())
    }

    /// Replaces the staging text of one list.
    pub fn set_staging(
        &mut self,
        topic_index: usize,
        list: ItemList,
        text: impl Into<String>,
    ) -> EditResult<()> {
        let id = self.topic_id(topic_index)?;
        self.view.set_staging(id, list, text);
        Ok(())
    }

    /// Completes the staging input of one list (blur or submit).
    ///
    /// Appends the staged text as a new item and clears the staging field.
    /// Blank staging text appends nothing and returns `Ok(false)`.
    pub fn commit_staged_item(&mut self, topic_index: usize, list: ItemList) -> EditResult<bool> {
        let id = self.topic_id(topic_index)?;
        let text = self.view.staging(id, list).to_string();
        let added = self.add_item(topic_index, &text, list)?;
        if added {
            self.view.clear_staging(id, list);
        }
        Ok(added)
    }

    /// Appends an item directly. Returns whether an item was appended.
    pub fn add_item(&mut self, topic_index: usize, text: &str, list: ItemList) -> EditResult<bool> {
        let before = self.list_len(topic_index, list)?;
        let next = ops::add_item(&self.state, topic_index, text, list)?;
        self.replace(next);
        Ok(self.list_len(topic_index, list)? > before)
    }

    pub fn update_item_prompt(
        &mut self,
        topic_index: usize,
        list: ItemList,
        item_index: usize,
        text: impl Into<String>,
    ) -> EditResult<()> {
        let next = ops::update_item_prompt(&self.state, topic_index, list, item_index, text)?;
        self.replace(next);
        Ok(())
    }

    /// Runs the blur convention: a blank item is deleted.
    ///
    /// Returns whether the item was removed.
    pub fn on_item_blur(
        &mut self,
        topic_index: usize,
        list: ItemList,
        item_index: usize,
    ) -> EditResult<bool> {
        let before = self.list_len(topic_index, list)?;
        let next = ops::on_item_blur(&self.state, topic_index, list, item_index)?;
        self.replace(next);
        Ok(self.list_len(topic_index, list)? < before)
    }

    pub fn change_level(
        &mut self,
        topic_index: usize,
        list: ItemList,
        item_index: usize,
        delta: i32,
    ) -> EditResult<()> {
        let next = ops::change_level(&self.state, topic_index, list, item_index, delta)?;
        self.replace(next);
        Ok(())
    }

    pub fn remove_item(
        &mut self,
        topic_index: usize,
        list: ItemList,
        item_index: usize,
    ) -> EditResult<()> {
        let next = ops::remove_item(&self.state, topic_index, list, item_index)?;
        self.replace(next);
        Ok(())
    }

    /// Compiles the live tree without pushing or saving it.
    pub fn preview(&self) -> CompiledPrompt {
        compile_prompt(&self.state.base_prompt, &self.state.topics)
    }

    /// Compiles the live tree, pushes it into the host and saves a snapshot.
    ///
    /// Blank items still present (no blur happened) are dropped first, so they
    /// are neither compiled nor saved.
    ///
    /// # Errors
    /// - `CommitError::Host` when the positive field cannot be updated; the
    ///   snapshot is not saved in that case.
    ///
    /// A missing or failing undesired field is logged and skipped. Save
    /// failures are logged only.
    pub fn commit<B>(&mut self, bridge: &mut B) -> Result<CompiledPrompt, CommitError>
    where
        B: HostBridge + ?Sized,
    {
        let started_at = Instant::now();
        let pruned = ops::drop_blank_items(&self.state);
        if pruned != self.state {
            debug!("event=commit module=service status=ok action=drop_blank_items");
            self.replace(pruned);
        }
        let compiled = self.preview();

        if let Err(err) = bridge.set_positive_prompt_field(&compiled.prompt_text) {
            error!(
                "event=commit module=service status=error field=positive duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }

        match bridge.set_undesired_prompt_field(&compiled.undesired_text) {
            Ok(FieldUpdate::Applied) => {}
            Ok(FieldUpdate::Skipped) => {
                debug!("event=commit module=service status=skipped field=undesired");
            }
            Err(err) => {
                error!("event=commit module=service status=error field=undesired error={err}");
            }
        }

        self.snapshots.save(&self.key, &self.state);
        info!(
            "event=commit module=service status=ok duration_ms={} prompt_chars={} undesired_chars={}",
            started_at.elapsed().as_millis(),
            compiled.prompt_text.chars().count(),
            compiled.undesired_text.chars().count()
        );
        Ok(compiled)
    }

    fn replace(&mut self, next: AppState) {
        self.state = next;
        self.view.retain_topics(&self.state);
    }

    fn topic_id(&self, topic_index: usize) -> EditResult<TopicId> {
        self.state
            .topic(topic_index)
            .map(|topic| topic.id())
            .ok_or(EditError::TopicNotFound(topic_index))
    }

    fn list_len(&self, topic_index: usize, list: ItemList) -> EditResult<usize> {
        self.state
            .topic(topic_index)
            .map(|topic| topic.list(list).len())
            .ok_or(EditError::TopicNotFound(topic_index))
    }
}
