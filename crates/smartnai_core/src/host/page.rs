//! In-memory host page model.
//!
//! # Responsibility
//! - Hold the input fields a host page exposes and the change events fired
//!   on them.
//! - Locate prompt fields with the same rules a browser host would use.
//!
//! # Invariants
//! - Every value set through the bridge emits exactly one bubbling `input`
//!   event.
//! - The undesired field is the first candidate whose label matches the
//!   marker text; labels are compared case-insensitively with collapsed
//!   whitespace.

use super::bridge::{FieldUpdate, HostBridge, HostError};
use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

pub const DEFAULT_POSITIVE_FIELD_ID: &str = "prompt-input-0";
pub const DEFAULT_UNDESIRED_CANDIDATE_TAG: &str = "textarea";
pub const DEFAULT_UNDESIRED_LABEL: &str = "Undesired Content";

const CHANGE_EVENT_KIND: &str = "input";

/// Lookup rules for the host's prompt fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSelectors {
    /// Element id of the positive prompt field (without `#`).
    pub positive_field_id: String,
    /// Tag every undesired-field candidate must have.
    pub undesired_candidate_tag: String,
    /// Text of the label adjacent to the undesired field.
    pub undesired_label: String,
}

impl Default for HostSelectors {
    fn default() -> Self {
        Self {
            positive_field_id: DEFAULT_POSITIVE_FIELD_ID.to_string(),
            undesired_candidate_tag: DEFAULT_UNDESIRED_CANDIDATE_TAG.to_string(),
            undesired_label: DEFAULT_UNDESIRED_LABEL.to_string(),
        }
    }
}

/// One input-like element of the host page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageField {
    pub id: Option<String>,
    pub tag: String,
    /// Text of the label rendered next to the field.
    pub label: Option<String>,
    pub value: String,
}

impl PageField {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Change notification observed by the host framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    pub field_index: usize,
    pub kind: &'static str,
    pub bubbles: bool,
}

/// Host page: ordered fields plus the events dispatched on them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostPage {
    fields: Vec<PageField>,
    events: Vec<ChangeEvent>,
}

impl HostPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field and returns its index.
    pub fn add_field(&mut self, field: PageField) -> usize {
        self.fields.push(field);
        self.fields.len() - 1
    }

    pub fn field(&self, index: usize) -> Option<&PageField> {
        self.fields.get(index)
    }

    pub fn fields(&self) -> &[PageField] {
        &self.fields
    }

    pub fn events(&self) -> &[ChangeEvent] {
        &self.events
    }

    fn set_value_and_notify(&mut self, index: usize, text: &str) {
        if let Some(field) = self.fields.get_mut(index) {
            field.value = text.to_string();
            self.events.push(ChangeEvent {
                field_index: index,
                kind: CHANGE_EVENT_KIND,
                bubbles: true,
            });
        }
    }
}

/// `HostBridge` over a `HostPage`.
pub struct PageHostBridge<'page> {
    page: &'page mut HostPage,
    selectors: HostSelectors,
}

impl<'page> PageHostBridge<'page> {
    pub fn new(page: &'page mut HostPage, selectors: HostSelectors) -> Self {
        Self { page, selectors }
    }

    fn positive_field_index(&self) -> Option<usize> {
        let wanted = self.selectors.positive_field_id.as_str();
        self.page
            .fields
            .iter()
            .position(|field| field.id.as_deref() == Some(wanted))
    }

    fn undesired_field_index(&self) -> Option<usize> {
        let marker = normalize_label(&self.selectors.undesired_label);
        self.page.fields.iter().position(|field| {
            field
                .tag
                .eq_ignore_ascii_case(&self.selectors.undesired_candidate_tag)
                && field
                    .label
                    .as_deref()
                    .is_some_and(|label| normalize_label(label) == marker)
        })
    }
}

impl HostBridge for PageHostBridge<'_> {
    fn set_positive_prompt_field(&mut self, text: &str) -> Result<(), HostError> {
        let index = self.positive_field_index().ok_or_else(|| {
            HostError::FieldNotFound(format!("#{}", self.selectors.positive_field_id))
        })?;
        self.page.set_value_and_notify(index, text);
        Ok(())
    }

    fn set_undesired_prompt_field(&mut self, text: &str) -> Result<FieldUpdate, HostError> {
        match self.undesired_field_index() {
            Some(index) => {
                self.page.set_value_and_notify(index, text);
                Ok(FieldUpdate::Applied)
            }
            None => Ok(FieldUpdate::Skipped),
        }
    }
}

fn normalize_label(value: &str) -> String {
    WHITESPACE_RE
        .replace_all(value.trim(), " ")
        .to_lowercase()
}
