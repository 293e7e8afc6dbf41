//! Error types for transfer domain validation and state transitions.

use super::{PlanStatus, TransferPlanId, TransferTaskId, TransferTaskStatus};
use crate::error::ErrorKind;
use thiserror::Error;

/// Errors returned by transfer plan and task operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransferDomainError {
    /// The task cannot move from its current status to the requested one.
    #[error("transfer task {task_id} cannot transition from {from} to {to}")]
    InvalidStateTransition {
        /// Task identifier.
        task_id: TransferTaskId,
        /// Current status.
        from: TransferTaskStatus,
        /// Requested status.
        to: TransferTaskStatus,
    },

    /// Blocked tasks cannot be executed until a manager resolves the block.
    #[error("transfer task {0} is blocked; a manager must unblock it before it can be executed")]
    TaskBlocked(TransferTaskId),

    /// The plan cannot move from its current status to the requested one.
    #[error("transfer plan {plan_id} cannot transition from {from} to {to}")]
    InvalidPlanTransition {
        /// Plan identifier.
        plan_id: TransferPlanId,
        /// Current status.
        from: PlanStatus,
        /// Requested status.
        to: PlanStatus,
    },

    /// A plan needs at least one task before it is finalized.
    #[error("transfer plan {0} has no tasks and cannot be finalized")]
    EmptyPlan(TransferPlanId),

    /// Tasks run only after their plan is finalized.
    #[error("transfer plan {0} is still planning; finalize it before running its tasks")]
    PlanNotFinalized(TransferPlanId),

    /// Completed and cancelled plans accept no new tasks.
    #[error("transfer plan {plan_id} is {status} and accepts no new tasks")]
    PlanClosed {
        /// Plan identifier.
        plan_id: TransferPlanId,
        /// Current status.
        status: PlanStatus,
    },

    /// The plan already holds the configured maximum number of tasks.
    #[error("transfer plan {plan_id} already holds the maximum of {limit} tasks")]
    TooManyTasks {
        /// Plan identifier.
        plan_id: TransferPlanId,
        /// Configured limit.
        limit: u32,
    },

    /// The plan name is empty after trimming.
    #[error("transfer plan name must not be empty")]
    EmptyPlanName,

    /// The plan name exceeds the configured limit.
    #[error("transfer plan name exceeds {limit} characters")]
    PlanNameTooLong {
        /// Configured limit.
        limit: usize,
    },

    /// The plan author is empty after trimming.
    #[error("transfer plan author must not be empty")]
    MissingAuthor,

    /// Notes exceed the configured limit.
    #[error("notes exceed {limit} characters")]
    NotesTooLong {
        /// Configured limit.
        limit: usize,
    },
}

impl TransferDomainError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidStateTransition { .. }
            | Self::TaskBlocked(_)
            | Self::InvalidPlanTransition { .. }
            | Self::PlanNotFinalized(_)
            | Self::PlanClosed { .. } => ErrorKind::State,
            Self::EmptyPlan(_) => ErrorKind::EmptyPlan,
            Self::TooManyTasks { .. }
            | Self::EmptyPlanName
            | Self::PlanNameTooLong { .. }
            | Self::MissingAuthor
            | Self::NotesTooLong { .. } => ErrorKind::Validation,
        }
    }
}

/// Error returned while parsing plan or task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown transfer status: {0}")]
pub struct ParseTransferStatusError(pub String);
