//! Read port for checklist tasks.

use crate::checklist::domain::{ChecklistTask, ChecklistTaskId};
use crate::inventory::domain::FarmId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for checklist repository operations.
pub type ChecklistRepositoryResult<T> = Result<T, ChecklistRepositoryError>;

/// Checklist task lookup contract.
#[async_trait]
pub trait ChecklistRepository: Send + Sync {
    /// Finds a checklist task by identifier.
    async fn find_checklist_task(
        &self,
        id: ChecklistTaskId,
    ) -> ChecklistRepositoryResult<Option<ChecklistTask>>;

    /// Returns the farm's checklist tasks, oldest first.
    async fn checklist_tasks_for_farm(
        &self,
        farm_id: FarmId,
    ) -> ChecklistRepositoryResult<Vec<ChecklistTask>>;
}

/// Errors returned by checklist repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ChecklistRepositoryError {
    /// A stored row could not be turned back into a task.
    #[error("invalid persisted checklist data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ChecklistRepositoryError {
    /// Wraps a conversion error.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
