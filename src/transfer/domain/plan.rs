//! Transfer plan aggregate and its task counters.

use super::{ParseTransferStatusError, TransferDomainError, TransferPlanId, TransferTask, TransferTaskStatus};
use crate::config::CancelledTaskPolicy;
use crate::escalation::UnblockAction;
use crate::inventory::domain::FarmId;
use crate::revision::{Revision, Revisioned};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Transfer plan lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    /// Tasks are still being added.
    Planning,
    /// The plan was finalized and awaits execution.
    Ready,
    /// At least one task was started or executed.
    InProgress,
    /// Every counted task was executed.
    Completed,
    /// The plan was abandoned.
    Cancelled,
}

impl PlanStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::Ready => "ready",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns whether the plan reached a final status.
    #[must_use]
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for PlanStatus {
    type Error = ParseTransferStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "planning" => Ok(Self::Planning),
            "ready" => Ok(Self::Ready),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseTransferStatusError(value.to_owned())),
        }
    }
}

/// Aggregate task counters kept on a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlanCounters {
    task_count: u32,
    completed_task_count: u32,
    blocked_task_count: u32,
    cancelled_task_count: u32,
}

impl PlanCounters {
    /// Creates counters from raw values.
    #[must_use]
    pub const fn new(
        task_count: u32,
        completed_task_count: u32,
        blocked_task_count: u32,
        cancelled_task_count: u32,
    ) -> Self {
        Self {
            task_count,
            completed_task_count,
            blocked_task_count,
            cancelled_task_count,
        }
    }

    /// Recomputes counters from the plan's task collection.
    #[must_use]
    pub fn tally<'a>(tasks: impl IntoIterator<Item = &'a TransferTask>) -> Self {
        tasks.into_iter().fold(Self::default(), |mut counters, task| {
            counters.task_count += 1;
            match task.status() {
                TransferTaskStatus::Completed => counters.completed_task_count += 1,
                TransferTaskStatus::Blocked => counters.blocked_task_count += 1,
                TransferTaskStatus::Cancelled => counters.cancelled_task_count += 1,
                TransferTaskStatus::Pending | TransferTaskStatus::InProgress => {}
            }
            counters
        })
    }

    /// Returns the number of tasks ever added.
    #[must_use]
    pub const fn task_count(self) -> u32 {
        self.task_count
    }

    /// Returns the number of executed tasks.
    #[must_use]
    pub const fn completed_task_count(self) -> u32 {
        self.completed_task_count
    }

    /// Returns the number of currently blocked tasks.
    #[must_use]
    pub const fn blocked_task_count(self) -> u32 {
        self.blocked_task_count
    }

    /// Returns the number of cancelled tasks.
    #[must_use]
    pub const fn cancelled_task_count(self) -> u32 {
        self.cancelled_task_count
    }

    /// Returns how many tasks still stand between the plan and completion.
    #[must_use]
    pub const fn outstanding(self, policy: CancelledTaskPolicy) -> u32 {
        let remaining = self.task_count.saturating_sub(self.completed_task_count);
        match policy {
            CancelledTaskPolicy::ExcludeFromCompletion => {
                remaining.saturating_sub(self.cancelled_task_count)
            }
            CancelledTaskPolicy::BlockCompletion => remaining,
        }
    }
}

/// Transfer plan aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferPlan {
    id: TransferPlanId,
    farm_id: FarmId,
    name: String,
    status: PlanStatus,
    counters: PlanCounters,
    created_by: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    revision: Revision,
}

/// Parameter object for reconstructing a persisted plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTransferPlanData {
    /// Persisted plan identifier.
    pub id: TransferPlanId,
    /// Owning farm.
    pub farm_id: FarmId,
    /// Plan name.
    pub name: String,
    /// Persisted status.
    pub status: PlanStatus,
    /// Persisted counters.
    pub counters: PlanCounters,
    /// Author of the plan.
    pub created_by: String,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Persisted revision.
    pub revision: Revision,
}

impl TransferPlan {
    /// Creates a plan in `planning` status with zeroed counters.
    ///
    /// # Errors
    ///
    /// Returns [`TransferDomainError::EmptyPlanName`],
    /// [`TransferDomainError::PlanNameTooLong`] or
    /// [`TransferDomainError::MissingAuthor`] for invalid input.
    pub fn new(
        farm_id: FarmId,
        name: &str,
        created_by: &str,
        max_name_length: usize,
        clock: &impl Clock,
    ) -> Result<Self, TransferDomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TransferDomainError::EmptyPlanName);
        }
        if name.chars().count() > max_name_length {
            return Err(TransferDomainError::PlanNameTooLong {
                limit: max_name_length,
            });
        }
        let created_by = created_by.trim();
        if created_by.is_empty() {
            return Err(TransferDomainError::MissingAuthor);
        }

        let timestamp = clock.utc();
        Ok(Self {
            id: TransferPlanId::new(),
            farm_id,
            name: name.to_owned(),
            status: PlanStatus::Planning,
            counters: PlanCounters::default(),
            created_by: created_by.to_owned(),
            created_at: timestamp,
            updated_at: timestamp,
            revision: Revision::UNSAVED,
        })
    }

    /// Reconstructs a plan from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTransferPlanData) -> Self {
        Self {
            id: data.id,
            farm_id: data.farm_id,
            name: data.name,
            status: data.status,
            counters: data.counters,
            created_by: data.created_by,
            created_at: data.created_at,
            updated_at: data.updated_at,
            revision: data.revision,
        }
    }

    /// Returns the plan identifier.
    #[must_use]
    pub const fn id(&self) -> TransferPlanId {
        self.id
    }

    /// Returns the owning farm.
    #[must_use]
    pub const fn farm_id(&self) -> FarmId {
        self.farm_id
    }

    /// Returns the plan name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the plan status.
    #[must_use]
    pub const fn status(&self) -> PlanStatus {
        self.status
    }

    /// Returns the task counters.
    #[must_use]
    pub const fn counters(&self) -> PlanCounters {
        self.counters
    }

    /// Returns the plan author.
    #[must_use]
    pub fn created_by(&self) -> &str {
        &self.created_by
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

    /// Counts a newly added task and returns its advisory order.
    ///
    /// # Errors
    ///
    /// Returns [`TransferDomainError::PlanClosed`] for completed or cancelled
    /// plans and [`TransferDomainError::TooManyTasks`] when the plan is full.
    pub fn record_task_added(
        &mut self,
        max_tasks: u32,
        clock: &impl Clock,
    ) -> Result<u32, TransferDomainError> {
        self.ensure_accepts_tasks()?;
        if self.counters.task_count >= max_tasks {
            return Err(TransferDomainError::TooManyTasks {
                plan_id: self.id,
                limit: max_tasks,
            });
        }
        let order = self.counters.task_count;
        self.counters.task_count += 1;
        self.touch(clock);
        Ok(order)
    }

    /// Validates that tasks may still be added.
    ///
    /// # Errors
    ///
    /// Returns [`TransferDomainError::PlanClosed`] for completed or cancelled
    /// plans.
    pub const fn ensure_accepts_tasks(&self) -> Result<(), TransferDomainError> {
        if self.status.is_closed() {
            return Err(TransferDomainError::PlanClosed {
                plan_id: self.id,
                status: self.status,
            });
        }
        Ok(())
    }

    /// Moves a plan from `planning` to `ready`.
    ///
    /// # Errors
    ///
    /// Returns [`TransferDomainError::InvalidPlanTransition`] unless the plan
    /// is planning, and [`TransferDomainError::EmptyPlan`] when it holds no
    /// tasks.
    pub fn finalize(&mut self, clock: &impl Clock) -> Result<(), TransferDomainError> {
        if self.status != PlanStatus::Planning {
            return Err(TransferDomainError::InvalidPlanTransition {
                plan_id: self.id,
                from: self.status,
                to: PlanStatus::Ready,
            });
        }
        if self.counters.task_count == 0 {
            return Err(TransferDomainError::EmptyPlan(self.id));
        }
        self.status = PlanStatus::Ready;
        self.touch(clock);
        Ok(())
    }

    /// Validates that the plan's tasks may be started or executed.
    ///
    /// # Errors
    ///
    /// Returns [`TransferDomainError::PlanNotFinalized`] while the plan is
    /// still planning and [`TransferDomainError::PlanClosed`] once it is
    /// completed or cancelled.
    pub const fn ensure_executing(&self) -> Result<(), TransferDomainError> {
        match self.status {
            PlanStatus::Planning => Err(TransferDomainError::PlanNotFinalized(self.id)),
            PlanStatus::Completed | PlanStatus::Cancelled => Err(TransferDomainError::PlanClosed {
                plan_id: self.id,
                status: self.status,
            }),
            PlanStatus::Ready | PlanStatus::InProgress => Ok(()),
        }
    }

    /// Marks the plan in progress when an operator starts a task.
    pub fn record_task_started(&mut self, clock: &impl Clock) {
        if self.status == PlanStatus::Ready {
            self.status = PlanStatus::InProgress;
        }
        self.touch(clock);
    }

    /// Counts an executed task and recomputes the plan status.
    pub fn record_task_completed(&mut self, policy: CancelledTaskPolicy, clock: &impl Clock) {
        self.counters.completed_task_count += 1;
        self.status = if self.counters.outstanding(policy) == 0 {
            PlanStatus::Completed
        } else {
            PlanStatus::InProgress
        };
        self.touch(clock);
    }

    /// Counts a newly blocked task.
    pub fn record_task_blocked(&mut self, clock: &impl Clock) {
        self.counters.blocked_task_count += 1;
        self.touch(clock);
    }

    /// Counts a resolved block, whichever action the manager took.
    pub fn record_task_unblocked(
        &mut self,
        action: UnblockAction,
        policy: CancelledTaskPolicy,
        clock: &impl Clock,
    ) {
        self.counters.blocked_task_count = self.counters.blocked_task_count.saturating_sub(1);
        if action == UnblockAction::Cancel {
            self.counters.cancelled_task_count += 1;
            self.settle_after_cancellation(policy);
        }
        self.touch(clock);
    }

    /// Cancels the plan, counting the tasks cancelled alongside it.
    ///
    /// # Errors
    ///
    /// Returns [`TransferDomainError::InvalidPlanTransition`] when the plan is
    /// already completed or cancelled.
    pub fn cancel(
        &mut self,
        cancelled_tasks: u32,
        previously_blocked: u32,
        clock: &impl Clock,
    ) -> Result<(), TransferDomainError> {
        if self.status.is_closed() {
            return Err(TransferDomainError::InvalidPlanTransition {
                plan_id: self.id,
                from: self.status,
                to: PlanStatus::Cancelled,
            });
        }
        self.counters.cancelled_task_count += cancelled_tasks;
        self.counters.blocked_task_count = self
            .counters
            .blocked_task_count
            .saturating_sub(previously_blocked);
        self.status = PlanStatus::Cancelled;
        self.touch(clock);
        Ok(())
    }

    /// Replaces drifted counters; returns whether anything changed.
    pub fn reconcile_counters(&mut self, counters: PlanCounters, clock: &impl Clock) -> bool {
        if self.counters == counters {
            return false;
        }
        self.counters = counters;
        self.touch(clock);
        true
    }

    // Planning plans stay editable even when every task so far was cancelled.
    fn settle_after_cancellation(&mut self, policy: CancelledTaskPolicy) {
        if !matches!(self.status, PlanStatus::Ready | PlanStatus::InProgress)
            || self.counters.outstanding(policy) > 0
        {
            return;
        }
        self.status = if self.counters.completed_task_count > 0 {
            PlanStatus::Completed
        } else {
            PlanStatus::Cancelled
        };
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

impl Revisioned for TransferPlan {
    fn revision(&self) -> Revision {
        self.revision
    }

    fn stamp_revision(&mut self, revision: Revision) {
        self.revision = revision;
    }
}
