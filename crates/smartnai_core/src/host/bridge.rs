//! Host bridge and confirmation contracts.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors raised while pushing text into the host.
#[derive(Debug)]
pub enum HostError {
    /// Required field could not be located; carries the selector used.
    FieldNotFound(String),
    /// Host output could not be written.
    Io(std::io::Error),
}

impl Display for HostError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FieldNotFound(selector) => write!(f, "host field not found: `{selector}`"),
            Self::Io(err) => write!(f, "host write failed: {err}"),
        }
    }
}

impl Error for HostError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::FieldNotFound(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for HostError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Outcome of an optional field update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldUpdate {
    /// Value was set and a change notification was emitted.
    Applied,
    /// No matching field exists; nothing happened.
    Skipped,
}

/// Pushes compiled prompt text into the host and notifies it of the change.
pub trait HostBridge {
    /// Sets the positive prompt field.
    ///
    /// # Errors
    /// - `HostError::FieldNotFound` when the host has no positive field.
    fn set_positive_prompt_field(&mut self, text: &str) -> Result<(), HostError>;

    /// Sets the undesired prompt field when the host has one.
    fn set_undesired_prompt_field(&mut self, text: &str) -> Result<FieldUpdate, HostError>;
}

impl<B: HostBridge + ?Sized> HostBridge for &mut B {
    fn set_positive_prompt_field(&mut self, text: &str) -> Result<(), HostError> {
        (**self).set_positive_prompt_field(text)
    }

    fn set_undesired_prompt_field(&mut self, text: &str) -> Result<FieldUpdate, HostError> {
        (**self).set_undesired_prompt_field(text)
    }
}

/// Synchronous yes/no decision taken before a destructive action.
pub trait ConfirmGate {
    /// Returns `true` when the user accepts `message`.
    fn confirm(&mut self, message: &str) -> bool;
}

impl<F> ConfirmGate for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, message: &str) -> bool {
        self(message)
    }
}
