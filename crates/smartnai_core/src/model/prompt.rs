//! Prompt tree records.
//!
//! # Responsibility
//! - Define the canonical tree shape that is compiled and persisted.
//! - Provide default constructors used by fresh sessions and new topics.
//!
//! # Invariants
//! - `Topic::id` is session-local identity; equality only compares content.
//! - The serialized form contains exactly `basePrompt` and `topics`, with each
//!   topic carrying `name`, `active`, `items`, `undesired`.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use uuid::Uuid;

/// Session-local topic identity, used to key view state.
pub type TopicId = Uuid;

/// Name given to topics created without explicit input.
pub const DEFAULT_TOPIC_NAME: &str = "New Topic";

/// Root aggregate of one editing session.
///
/// Topics are held behind `Arc` so that a mutation only copies the topic it
/// touches; untouched siblings stay shared between old and new states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    /// Free text prepended to the compiled positive prompt.
    #[serde(default)]
    pub base_prompt: String,
    /// Ordered topics; order drives compiled order.
    #[serde(default)]
    pub topics: Vec<Arc<Topic>>,
}

impl AppState {
    /// Builds a state from owned topics.
    pub fn new(base_prompt: impl Into<String>, topics: Vec<Topic>) -> Self {
        Self {
            base_prompt: base_prompt.into(),
            topics: topics.into_iter().map(Arc::new).collect(),
        }
    }

    /// Returns the topic at `index`, if any.
    pub fn topic(&self, index: usize) -> Option<&Topic> {
        self.topics.get(index).map(Arc::as_ref)
    }
}

/// Returns the state used when nothing has been persisted yet.
///
/// One active topic named [`DEFAULT_TOPIC_NAME`] with empty lists.
pub fn default_app_state() -> AppState {
    AppState::new(String::new(), vec![Topic::new(DEFAULT_TOPIC_NAME)])
}

/// Named, toggleable group of prompt fragments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    #[serde(skip, default = "Uuid::new_v4")]
    id: TopicId,
    pub name: String,
    /// Missing in very old snapshots; those topics load inactive.
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub undesired: Vec<Item>,
}

impl Topic {
    /// Creates an active topic with empty lists and a fresh identity.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            active: true,
            items: Vec::new(),
            undesired: Vec::new(),
        }
    }

    /// Session-local identity of this topic.
    pub fn id(&self) -> TopicId {
        self.id
    }

    pub fn list(&self, list: ItemList) -> &[Item] {
        match list {
            ItemList::Items => &self.items,
            ItemList::Undesired => &self.undesired,
        }
    }

    pub fn list_mut(&mut self, list: ItemList) -> &mut Vec<Item> {
        match list {
            ItemList::Items => &mut self.items,
            ItemList::Undesired => &mut self.undesired,
        }
    }
}

impl PartialEq for Topic {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.active == other.active
            && self.items == other.items
            && self.undesired == other.undesired
    }
}

impl Eq for Topic {}

/// Weighted prompt fragment, shared by both item lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub prompt: String,
    /// Bracket depth. Negative values are only meaningful for positive items.
    #[serde(default)]
    pub level: i32,
}

impl Item {
    /// Creates a level-0 item.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self::with_level(prompt, 0)
    }

    pub fn with_level(prompt: impl Into<String>, level: i32) -> Self {
        Self {
            prompt: prompt.into(),
            level,
        }
    }

    /// Whether the prompt is empty or whitespace-only.
    pub fn is_blank(&self) -> bool {
        self.prompt.trim().is_empty()
    }
}

/// Selects one of the two item lists of a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemList {
    /// Desired fragments, compiled into the positive prompt.
    Items,
    /// Fragments to suppress, compiled into the undesired prompt.
    Undesired,
}

impl ItemList {
    /// Stable lowercase name used by logs and display.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Items => "items",
            Self::Undesired => "undesired",
        }
    }

    /// Lowest level a mutation may leave on an entry of this list.
    pub fn min_level(self) -> Option<i32> {
        match self {
            Self::Items => None,
            Self::Undesired => Some(0),
        }
    }
}

impl Display for ItemList {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
