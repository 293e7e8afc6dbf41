//! Error types for checklist task validation and transitions.

use super::{ChecklistStatus, ChecklistTaskId};
use crate::error::ErrorKind;
use thiserror::Error;

/// Errors returned by checklist task operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChecklistDomainError {
    /// The task cannot move from its current status to the requested one.
    #[error("checklist task {task_id} cannot transition from {from} to {to}")]
    InvalidStateTransition {
        /// Task identifier.
        task_id: ChecklistTaskId,
        /// Current status.
        from: ChecklistStatus,
        /// Requested status.
        to: ChecklistStatus,
    },

    /// Blocked tasks cannot be completed until a manager resolves the block.
    #[error("checklist task {0} is blocked; a manager must unblock it before it can be completed")]
    TaskBlocked(ChecklistTaskId),

    /// The title is empty after trimming.
    #[error("checklist task title must not be empty")]
    EmptyTitle,

    /// The title exceeds the configured limit.
    #[error("checklist task title exceeds {limit} characters")]
    TitleTooLong {
        /// Configured limit.
        limit: usize,
    },

    /// Notes exceed the configured limit.
    #[error("notes exceed {limit} characters")]
    NotesTooLong {
        /// Configured limit.
        limit: usize,
    },
}

impl ChecklistDomainError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidStateTransition { .. } | Self::TaskBlocked(_) => ErrorKind::State,
            Self::EmptyTitle | Self::TitleTooLong { .. } | Self::NotesTooLong { .. } => {
                ErrorKind::Validation
            }
        }
    }
}

/// Error returned while parsing checklist statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown checklist status: {0}")]
pub struct ParseChecklistStatusError(pub String);
