//! Block and unblock protocol shared by transfer tasks and checklist tasks.
//!
//! A field operator blocks a task with one of the enumerated causes; a
//! manager later resolves the block by continuing or cancelling the task.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Cause recorded when an operator blocks a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockReason {
    /// Water temperature in the source or target aquarium is unsuitable.
    Temperature,
    /// Fish size does not fit the target aquarium.
    Size,
    /// An aquarium is leaking.
    Leak,
    /// Any other cause, described in the block notes.
    Other,
}

impl BlockReason {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Size => "size",
            Self::Leak => "leak",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for BlockReason {
    type Error = ParseEscalationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "temperature" => Ok(Self::Temperature),
            "size" => Ok(Self::Size),
            "leak" => Ok(Self::Leak),
            "other" => Ok(Self::Other),
            _ => Err(ParseEscalationError::BlockReason(value.to_owned())),
        }
    }
}

/// Reason and notes attached to a task while it is blocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blockage {
    reason: BlockReason,
    notes: Option<String>,
}

impl Blockage {
    /// Creates a blockage; blank notes are dropped.
    #[must_use]
    pub fn new(reason: BlockReason, notes: Option<String>) -> Self {
        let notes = notes
            .map(|text| text.trim().to_owned())
            .filter(|text| !text.is_empty());
        Self { reason, notes }
    }

    /// Returns the block reason.
    #[must_use]
    pub const fn reason(&self) -> BlockReason {
        self.reason
    }

    /// Returns the block notes, if any.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

/// Manager decision that resolves a blocked task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnblockAction {
    /// Return the task to `pending` so work can resume.
    Continue,
    /// Cancel the task permanently.
    Cancel,
}

impl UnblockAction {
    /// Returns the canonical representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Continue => "continue",
            Self::Cancel => "cancel",
        }
    }
}

impl TryFrom<&str> for UnblockAction {
    type Error = ParseEscalationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "continue" => Ok(Self::Continue),
            "cancel" => Ok(Self::Cancel),
            _ => Err(ParseEscalationError::UnblockAction(value.to_owned())),
        }
    }
}

/// Error returned when parsing escalation values from strings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseEscalationError {
    /// The block reason is not one of the enumerated causes.
    #[error("unknown block reason '{0}', expected temperature, size, leak or other")]
    BlockReason(String),
    /// The unblock action is neither `continue` nor `cancel`.
    #[error("unknown unblock action '{0}', expected continue or cancel")]
    UnblockAction(String),
}
