//! Topic and item mutation operations.

use crate::model::prompt::{AppState, Item, ItemList, Topic, DEFAULT_TOPIC_NAME};
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub type EditResult<T> = Result<T, EditError>;

/// Errors for intents that address something not present in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditError {
    /// Topic index is out of range.
    TopicNotFound(usize),
    /// Item index is out of range for the selected list.
    ItemNotFound {
        topic_index: usize,
        list: ItemList,
        item_index: usize,
    },
}

impl Display for EditError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TopicNotFound(index) => write!(f, "topic not found at index {index}"),
            Self::ItemNotFound {
                topic_index,
                list,
                item_index,
            } => write!(
                f,
                "{list} entry {item_index} not found in topic {topic_index}"
            ),
        }
    }
}

impl Error for EditError {}

/// Replaces the base prompt.
pub fn set_base_prompt(state: &AppState, text: impl Into<String>) -> AppState {
    AppState {
        base_prompt: text.into(),
        topics: state.topics.clone(),
    }
}

/// Appends an active default topic with empty lists.
///
/// The new topic is always the last one; callers use its id to mark it open.
pub fn add_topic(state: &AppState) -> AppState {
    let mut next = state.clone();
    next.topics.push(Arc::new(Topic::new(DEFAULT_TOPIC_NAME)));
    next
}

/// Removes one topic unconditionally.
///
/// Confirmation is the caller's responsibility.
pub fn remove_topic(state: &AppState, topic_index: usize) -> EditResult<AppState> {
    ensure_topic(state, topic_index)?;
    let mut next = state.clone();
    next.topics.remove(topic_index);
    Ok(next)
}

/// Moves one topic to `target_index`, shifting the topics in between.
pub fn move_topic(state: &AppState, topic_index: usize, target_index: usize) -> EditResult<AppState> {
    ensure_topic(state, topic_index)?;
    ensure_topic(state, target_index)?;
    let mut next = state.clone();
    let topic = next.topics.remove(topic_index);
    next.topics.insert(target_index, topic);
    Ok(next)
}

pub fn toggle_topic_active(state: &AppState, topic_index: usize) -> EditResult<AppState> {
    with_topic(state, topic_index, |topic| {
        topic.active = !topic.active;
        Ok(())
    })
}

pub fn rename_topic(
    state: &AppState,
    topic_index: usize,
    name: impl Into<String>,
) -> EditResult<AppState> {
    let name = name.into();
    with_topic(state, topic_index, |topic| {
        topic.name = name;
        Ok(())
    })
}

/// Appends `{prompt: text, level: 0}` to the selected list.
///
/// # Contract
/// - Blank (empty/whitespace-only) text is a no-op.
/// - Text is stored as given; trimming happens at compile time.
pub fn add_item(
    state: &AppState,
    topic_index: usize,
    text: &str,
    list: ItemList,
) -> EditResult<AppState> {
    ensure_topic(state, topic_index)?;
    if text.trim().is_empty() {
        debug!("event=item_add module=ops status=skipped reason=blank list={list}");
        return Ok(state.clone());
    }
    with_topic(state, topic_index, |topic| {
        topic.list_mut(list).push(Item::new(text));
        Ok(())
    })
}

pub fn update_item_prompt(
    state: &AppState,
    topic_index: usize,
    list: ItemList,
    item_index: usize,
    text: impl Into<String>,
) -> EditResult<AppState> {
    let text = text.into();
    with_item(state, topic_index, list, item_index, |item| item.prompt = text)
}

/// Deletes the item when its prompt is blank; otherwise leaves the state as is.
///
/// Behaves identically for both lists.
pub fn on_item_blur(
    state: &AppState,
    topic_index: usize,
    list: ItemList,
    item_index: usize,
) -> EditResult<AppState> {
    if !item_at(state, topic_index, list, item_index)?.is_blank() {
        return Ok(state.clone());
    }
    debug!("event=item_blur module=ops status=ok action=remove_blank list={list}");
    remove_item(state, topic_index, list, item_index)
}

/// Applies the blur rule to every item of every topic.
///
/// Topics without blank items keep sharing their `Arc`.
pub fn drop_blank_items(state: &AppState) -> AppState {
    let mut next = state.clone();
    for slot in &mut next.topics {
        if !slot.items.iter().chain(&slot.undesired).any(Item::is_blank) {
            continue;
        }
        let topic = Arc::make_mut(slot);
        topic.items.retain(|item| !item.is_blank());
        topic.undesired.retain(|item| !item.is_blank());
    }
    next
}

/// Adds `delta` to the item level.
///
/// # Contract
/// - Undesired entries never go below 0; such a change is a no-op.
/// - An entry already below the floor may still move up towards it.
/// - Arithmetic saturates at the `i32` bounds.
pub fn change_level(
    state: &AppState,
    topic_index: usize,
    list: ItemList,
    item_index: usize,
    delta: i32,
) -> EditResult<AppState> {
    let current = item_at(state, topic_index, list, item_index)?.level;
    let next_level = current.saturating_add(delta);
    if list
        .min_level()
        .is_some_and(|min| next_level < min && next_level < current)
    {
        debug!(
            "event=item_level module=ops status=skipped reason=below_min list={list} level={next_level}"
        );
        return Ok(state.clone());
    }
    with_item(state, topic_index, list, item_index, |item| {
        item.level = next_level;
    })
}

/// Removes one item from the selected list. Always allowed.
pub fn remove_item(
    state: &AppState,
    topic_index: usize,
    list: ItemList,
    item_index: usize,
) -> EditResult<AppState> {
    item_at(state, topic_index, list, item_index)?;
    with_topic(state, topic_index, |topic| {
        topic.list_mut(list).remove(item_index);
        Ok(())
    })
}

fn ensure_topic(state: &AppState, topic_index: usize) -> EditResult<&Topic> {
    state
        .topic(topic_index)
        .ok_or(EditError::TopicNotFound(topic_index))
}

fn item_at(
    state: &AppState,
    topic_index: usize,
    list: ItemList,
    item_index: usize,
) -> EditResult<&Item> {
    ensure_topic(state, topic_index)?
        .list(list)
        .get(item_index)
        .ok_or(EditError::ItemNotFound {
            topic_index,
            list,
            item_index,
        })
}

fn with_topic<F>(state: &AppState, topic_index: usize, edit: F) -> EditResult<AppState>
where
    F: FnOnce(&mut Topic) -> EditResult<()>,
{
    let mut next = state.clone();
    let slot = next
        .topics
        .get_mut(topic_index)
        .ok_or(EditError::TopicNotFound(topic_index))?;
    edit(Arc::make_mut(slot))?;
    Ok(next)
}

fn with_item<F>(
    state: &AppState,
    topic_index: usize,
    list: ItemList,
    item_index: usize,
    edit: F,
) -> EditResult<AppState>
where
    F: FnOnce(&mut Item),
{
    with_topic(state, topic_index, |topic| {
        let item = topic
            .list_mut(list)
            .get_mut(item_index)
            .ok_or(EditError::ItemNotFound {
                topic_index,
                list,
                item_index,
            })?;
        edit(item);
        Ok(())
    })
}
