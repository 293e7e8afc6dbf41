//! Checklist task entity.

use super::{ChecklistDomainError, ChecklistTaskId, ParseChecklistStatusError};
use crate::config::PlanningConfig;
use crate::escalation::{Blockage, UnblockAction};
use crate::inventory::domain::FarmId;
use crate::relocation::TransferPayload;
use crate::revision::{Revision, Revisioned};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Checklist task status. There is no in-progress state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChecklistStatus {
    /// Waiting to be done.
    Pending,
    /// An operator reported a problem.
    Blocked,
    /// Done.
    Completed,
    /// Abandoned by a manager.
    Cancelled,
}

impl ChecklistStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Blocked => "blocked",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ChecklistStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ChecklistStatus {
    type Error = ParseChecklistStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "blocked" => Ok(Self::Blocked),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseChecklistStatusError(value.to_owned())),
        }
    }
}

/// Validated input for a new checklist task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChecklistTask {
    /// Owning farm.
    pub farm_id: FarmId,
    /// Short description of the work.
    pub title: String,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Relocation performed on completion.
    pub transfer: Option<TransferPayload>,
}

/// Free-form task, optionally carrying a relocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistTask {
    id: ChecklistTaskId,
    farm_id: FarmId,
    title: String,
    notes: Option<String>,
    status: ChecklistStatus,
    blockage: Option<Blockage>,
    transfer: Option<TransferPayload>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    revision: Revision,
}

/// Parameter object for reconstructing a persisted checklist task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedChecklistTaskData {
    /// Persisted task identifier.
    pub id: ChecklistTaskId,
    /// Owning farm.
    pub farm_id: FarmId,
    /// Task title.
    pub title: String,
    /// Task notes.
    pub notes: Option<String>,
    /// Persisted status.
    pub status: ChecklistStatus,
    /// Blockage recorded while blocked.
    pub blockage: Option<Blockage>,
    /// Embedded relocation.
    pub transfer: Option<TransferPayload>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Persisted revision.
    pub revision: Revision,
}

impl ChecklistTask {
    /// Creates a pending task.
    ///
    /// # Errors
    ///
    /// Returns [`ChecklistDomainError`] when the title is blank or the title
    /// or notes exceed the configured lengths.
    pub fn new(
        input: NewChecklistTask,
        config: &PlanningConfig,
        clock: &impl Clock,
    ) -> Result<Self, ChecklistDomainError> {
        let title = input.title.trim();
        if title.is_empty() {
            return Err(ChecklistDomainError::EmptyTitle);
        }
        if title.chars().count() > config.max_name_length {
            return Err(ChecklistDomainError::TitleTooLong {
                limit: config.max_name_length,
            });
        }
        let notes = input
            .notes
            .map(|text| text.trim().to_owned())
            .filter(|text| !text.is_empty());
        if notes
            .as_deref()
            .is_some_and(|text| text.chars().count() > config.max_notes_length)
        {
            return Err(ChecklistDomainError::NotesTooLong {
                limit: config.max_notes_length,
            });
        }

        let timestamp = clock.utc();
        Ok(Self {
            id: ChecklistTaskId::new(),
            farm_id: input.farm_id,
            title: title.to_owned(),
            notes,
            status: ChecklistStatus::Pending,
            blockage: None,
            transfer: input.transfer,
            created_at: timestamp,
            updated_at: timestamp,
            completed_at: None,
            revision: Revision::UNSAVED,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedChecklistTaskData) -> Self {
        Self {
            id: data.id,
            farm_id: data.farm_id,
            title: data.title,
            notes: data.notes,
            status: data.status,
            blockage: data.blockage,
            transfer: data.transfer,
            created_at: data.created_at,
            updated_at: data.updated_at,
            completed_at: data.completed_at,
            revision: data.revision,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> ChecklistTaskId {
        self.id
    }

    /// Returns the owning farm.
    #[must_use]
    pub const fn farm_id(&self) -> FarmId {
        self.farm_id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the notes, if any.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> ChecklistStatus {
        self.status
    }

    /// Returns the blockage while blocked.
    #[must_use]
    pub const fn blockage(&self) -> Option<&Blockage> {
        self.blockage.as_ref()
    }

    /// Returns the embedded relocation, if any.
    #[must_use]
    pub const fn transfer(&self) -> Option<&TransferPayload> {
        self.transfer.as_ref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the completion timestamp.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Checks that the task may be completed.
    ///
    /// # Errors
    ///
    /// Returns [`ChecklistDomainError::TaskBlocked`] for blocked tasks and
    /// [`ChecklistDomainError::InvalidStateTransition`] for completed or
    /// cancelled ones.
    pub const fn ensure_completable(&self) -> Result<(), ChecklistDomainError> {
        match self.status {
            ChecklistStatus::Pending => Ok(()),
            ChecklistStatus::Blocked => Err(ChecklistDomainError::TaskBlocked(self.id)),
            ChecklistStatus::Completed | ChecklistStatus::Cancelled => {
                Err(self.invalid_transition(ChecklistStatus::Completed))
            }
        }
    }

    /// Marks the task completed.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::ensure_completable`].
    pub fn complete(&mut self, clock: &impl Clock) -> Result<(), ChecklistDomainError> {
        self.ensure_completable()?;
        let timestamp = clock.utc();
        self.status = ChecklistStatus::Completed;
        self.completed_at = Some(timestamp);
        self.updated_at = timestamp;
        Ok(())
    }

    /// Blocks a pending task.
    ///
    /// # Errors
    ///
    /// Returns [`ChecklistDomainError::InvalidStateTransition`] unless the
    /// task is pending.
    pub fn block(&mut self, blockage: Blockage, clock: &impl Clock) -> Result<(), ChecklistDomainError> {
        if self.status != ChecklistStatus::Pending {
            return Err(self.invalid_transition(ChecklistStatus::Blocked));
        }
        self.status = ChecklistStatus::Blocked;
        self.blockage = Some(blockage);
        self.updated_at = clock.utc();
        Ok(())
    }

    /// Resolves a block by returning the task to pending or cancelling it.
    ///
    /// # Errors
    ///
    /// Returns [`ChecklistDomainError::InvalidStateTransition`] unless the
    /// task is blocked.
    pub fn unblock(
        &mut self,
        action: UnblockAction,
        clock: &impl Clock,
    ) -> Result<(), ChecklistDomainError> {
        let target = match action {
            UnblockAction::Continue => ChecklistStatus::Pending,
            UnblockAction::Cancel => ChecklistStatus::Cancelled,
        };
        if self.status != ChecklistStatus::Blocked {
            return Err(self.invalid_transition(target));
        }
        self.status = target;
        self.blockage = None;
        self.updated_at = clock.utc();
        Ok(())
    }

    const fn invalid_transition(&self, to: ChecklistStatus) -> ChecklistDomainError {
        ChecklistDomainError::InvalidStateTransition {
            task_id: self.id,
            from: self.status,
            to,
        }
    }
}

impl Revisioned for ChecklistTask {
    fn revision(&self) -> Revision {
        self.revision
    }

    fn stamp_revision(&mut self, revision: Revision) {
        self.revision = revision;
    }
}
