//! Domain model for transfer plans and their tasks.
//!
//! Plans and tasks are pure state machines; the occupancy projection and
//! conflict validator are pure functions over them. Infrastructure concerns
//! stay outside this boundary.

mod error;
mod ids;
mod plan;
mod projection;
mod task;
mod validator;

pub use error::{ParseTransferStatusError, TransferDomainError};
pub use ids::{TransferPlanId, TransferTaskId};
pub use plan::{PersistedTransferPlanData, PlanCounters, PlanStatus, TransferPlan};
pub use projection::{AquariumProjection, OccupancyProjection};
pub use task::{PersistedTransferTaskData, TransferTask, TransferTaskStatus};
pub use validator::{ConflictValidator, ConflictWarning, ProposedTransfer, WarningKind, WarningSeverity};
