//! Transfer task entity and its status machine.

use super::{ParseTransferStatusError, TransferDomainError, TransferPlanId, TransferTaskId};
use crate::escalation::{Blockage, UnblockAction};
use crate::relocation::TransferPayload;
use crate::revision::{Revision, Revisioned};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Transfer task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferTaskStatus {
    /// Waiting for an operator.
    Pending,
    /// An operator started moving the fish.
    InProgress,
    /// The relocation was executed.
    Completed,
    /// An operator reported a problem; a manager must resolve it.
    Blocked,
    /// The task was abandoned.
    Cancelled,
}

impl TransferTaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Blocked => "blocked",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns whether no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Returns whether the task still feeds the occupancy projection.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::InProgress)
    }

    /// Returns whether moving to `target` is permitted.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (
                Self::Pending,
                Self::InProgress | Self::Blocked | Self::Completed | Self::Cancelled
            ) | (Self::InProgress, Self::Blocked | Self::Completed | Self::Cancelled)
                | (Self::Blocked, Self::Pending | Self::Cancelled)
        )
    }
}

impl fmt::Display for TransferTaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TransferTaskStatus {
    type Error = ParseTransferStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "blocked" => Ok(Self::Blocked),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseTransferStatusError(value.to_owned())),
        }
    }
}

/// One relocation inside a transfer plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferTask {
    id: TransferTaskId,
    plan_id: TransferPlanId,
    payload: TransferPayload,
    order: u32,
    status: TransferTaskStatus,
    blockage: Option<Blockage>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    executed_at: Option<DateTime<Utc>>,
    revision: Revision,
}

/// Parameter object for reconstructing a persisted transfer task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTransferTaskData {
    /// Persisted task identifier.
    pub id: TransferTaskId,
    /// Owning plan.
    pub plan_id: TransferPlanId,
    /// Relocation the task performs.
    pub payload: TransferPayload,
    /// Advisory position within the plan.
    pub order: u32,
    /// Persisted status.
    pub status: TransferTaskStatus,
    /// Blockage recorded while blocked.
    pub blockage: Option<Blockage>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Execution timestamp for completed tasks.
    pub executed_at: Option<DateTime<Utc>>,
    /// Persisted revision.
    pub revision: Revision,
}

impl TransferTask {
    /// Creates a pending task at `order` within its plan.
    #[must_use]
    pub fn new(
        plan_id: TransferPlanId,
        payload: TransferPayload,
        order: u32,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TransferTaskId::new(),
            plan_id,
            payload,
            order,
            status: TransferTaskStatus::Pending,
            blockage: None,
            created_at: timestamp,
            updated_at: timestamp,
            executed_at: None,
            revision: Revision::UNSAVED,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTransferTaskData) -> Self {
        Self {
            id: data.id,
            plan_id: data.plan_id,
            payload: data.payload,
            order: data.order,
            status: data.status,
            blockage: data.blockage,
            created_at: data.created_at,
            updated_at: data.updated_at,
            executed_at: data.executed_at,
            revision: data.revision,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TransferTaskId {
        self.id
    }

    /// Returns the owning plan identifier.
    #[must_use]
    pub const fn plan_id(&self) -> TransferPlanId {
        self.plan_id
    }

    /// Returns the relocation payload.
    #[must_use]
    pub const fn payload(&self) -> &TransferPayload {
        &self.payload
    }

    /// Returns the advisory order within the plan.
    #[must_use]
    pub const fn order(&self) -> u32 {
        self.order
    }

    /// Returns the task status.
    #[must_use]
    pub const fn status(&self) -> TransferTaskStatus {
        self.status
    }

    /// Returns the blockage while the task is blocked.
    #[must_use]
    pub const fn blockage(&self) -> Option<&Blockage> {
        self.blockage.as_ref()
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

    /// Returns when the relocation was executed.
    #[must_use]
    pub const fn executed_at(&self) -> Option<DateTime<Utc>> {
        self.executed_at
    }

    /// Marks a pending task as started.
    ///
    /// # Errors
    ///
    /// Returns [`TransferDomainError::InvalidStateTransition`] unless the task
    /// is pending.
    pub fn start(&mut self, clock: &impl Clock) -> Result<(), TransferDomainError> {
        if self.status != TransferTaskStatus::Pending {
            return Err(self.invalid_transition(TransferTaskStatus::InProgress));
        }
        self.status = TransferTaskStatus::InProgress;
        self.touch(clock);
        Ok(())
    }

    /// Checks that the task may be executed.
    ///
    /// # Errors
    ///
    /// Returns [`TransferDomainError::TaskBlocked`] for blocked tasks and
    /// [`TransferDomainError::InvalidStateTransition`] for completed or
    /// cancelled ones.
    pub const fn ensure_executable(&self) -> Result<(), TransferDomainError> {
        match self.status {
            TransferTaskStatus::Pending | TransferTaskStatus::InProgress => Ok(()),
            TransferTaskStatus::Blocked => Err(TransferDomainError::TaskBlocked(self.id)),
            TransferTaskStatus::Completed | TransferTaskStatus::Cancelled => {
                Err(TransferDomainError::InvalidStateTransition {
                    task_id: self.id,
                    from: self.status,
                    to: TransferTaskStatus::Completed,
                })
            }
        }
    }

    /// Marks the task completed and stamps its execution time.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::ensure_executable`].
    pub fn complete(&mut self, clock: &impl Clock) -> Result<(), TransferDomainError> {
        self.ensure_executable()?;
        let timestamp = clock.utc();
        self.status = TransferTaskStatus::Completed;
        self.executed_at = Some(timestamp);
        self.updated_at = timestamp;
        Ok(())
    }

    /// Blocks a pending or in-progress task.
    ///
    /// # Errors
    ///
    /// Returns [`TransferDomainError::InvalidStateTransition`] for blocked,
    /// completed or cancelled tasks.
    pub fn block(&mut self, blockage: Blockage, clock: &impl Clock) -> Result<(), TransferDomainError> {
        self.transition_to(TransferTaskStatus::Blocked)?;
        self.blockage = Some(blockage);
        self.touch(clock);
        Ok(())
    }

    /// Resolves a block by returning the task to pending or cancelling it.
    ///
    /// Continuing always lands in `pending`, also for tasks that were in
    /// progress when blocked. The operator starts the task again once the
    /// blocking condition is cleared.
    ///
    /// # Errors
    ///
    /// Returns [`TransferDomainError::InvalidStateTransition`] unless the task
    /// is blocked.
    pub fn unblock(
        &mut self,
        action: UnblockAction,
        clock: &impl Clock,
    ) -> Result<(), TransferDomainError> {
        let target = match action {
            UnblockAction::Continue => TransferTaskStatus::Pending,
            UnblockAction::Cancel => TransferTaskStatus::Cancelled,
        };
        if self.status != TransferTaskStatus::Blocked {
            return Err(self.invalid_transition(target));
        }
        self.status = target;
        self.blockage = None;
        self.touch(clock);
        Ok(())
    }

    /// Cancels a non-terminal task alongside its plan.
    ///
    /// Returns the status the task held before cancellation.
    ///
    /// # Errors
    ///
    /// Returns [`TransferDomainError::InvalidStateTransition`] for completed
    /// or cancelled tasks.
    pub fn cancel(&mut self, clock: &impl Clock) -> Result<TransferTaskStatus, TransferDomainError> {
        let previous = self.status;
        self.transition_to(TransferTaskStatus::Cancelled)?;
        self.blockage = None;
        self.touch(clock);
        Ok(previous)
    }

    fn transition_to(&mut self, target: TransferTaskStatus) -> Result<(), TransferDomainError> {
        if !self.status.can_transition_to(target) {
            return Err(self.invalid_transition(target));
        }
        self.status = target;
        Ok(())
    }

    const fn invalid_transition(&self, to: TransferTaskStatus) -> TransferDomainError {
        TransferDomainError::InvalidStateTransition {
            task_id: self.id,
            from: self.status,
            to,
        }
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

impl Revisioned for TransferTask {
    fn revision(&self) -> Revision {
        self.revision
    }

    fn stamp_revision(&mut self, revision: Revision) {
        self.revision = revision;
    }
}
