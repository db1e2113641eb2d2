//! View-only session state.
//!
//! # Responsibility
//! - Track which topics are expanded and what text sits in staging inputs.
//! - Merge view state with the prompt tree for display without mutating it.
//!
//! # Invariants
//! - Nothing in this module is ever persisted.
//! - Entries are keyed by `TopicId`, so reordering topics keeps them attached.

use crate::model::prompt::{AppState, ItemList, Topic, TopicId};
use std::collections::{HashMap, HashSet};

/// Expansion flags and staging text, keyed by topic identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    open: HashSet<TopicId>,
    staging: HashMap<(TopicId, ItemList), String>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self, id: TopicId) -> bool {
        self.open.contains(&id)
    }

    pub fn set_open(&mut self, id: TopicId, open: bool) {
        if open {
            self.open.insert(id);
        } else {
            self.open.remove(&id);
        }
    }

    /// Flips expansion for `id` and returns the new value.
    pub fn toggle_open(&mut self, id: TopicId) -> bool {
        let next = !self.is_open(id);
        self.set_open(id, next);
        next
    }

    /// Current staging text for one list of one topic (empty when unset).
    pub fn staging(&self, id: TopicId, list: ItemList) -> &str {
        self.staging
            .get(&(id, list))
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn set_staging(&mut self, id: TopicId, list: ItemList, text: impl Into<String>) {
        self.staging.insert((id, list), text.into());
    }

    pub fn clear_staging(&mut self, id: TopicId, list: ItemList) {
        self.staging.remove(&(id, list));
    }

    /// Drops entries for topics that are no longer part of `state`.
    pub fn retain_topics(&mut self, state: &AppState) {
        let live: HashSet<TopicId> = state.topics.iter().map(|topic| topic.id()).collect();
        self.open.retain(|id| live.contains(id));
        self.staging.retain(|(id, _), _| live.contains(id));
    }

    /// Pairs every topic with its view flags, in topic order.
    pub fn topic_views<'a>(&self, state: &'a AppState) -> Vec<TopicView<'a>> {
        state
            .topics
            .iter()
            .enumerate()
            .map(|(index, topic)| TopicView {
                index,
                topic: topic.as_ref(),
                open: self.is_open(topic.id()),
            })
            .collect()
    }
}

/// Display projection of one topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopicView<'a> {
    pub index: usize,
    pub topic: &'a Topic,
    pub open: bool,
}
