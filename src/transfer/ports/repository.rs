//! Read port for transfer plans and their tasks.

use crate::inventory::domain::FarmId;
use crate::transfer::domain::{TransferPlan, TransferPlanId, TransferTask, TransferTaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for transfer repository operations.
pub type TransferRepositoryResult<T> = Result<T, TransferRepositoryError>;

/// Transfer plan lookup contract.
///
/// Writes go through [`crate::store::BatchWriter`].
#[async_trait]
pub trait TransferRepository: Send + Sync {
    /// Finds a plan by identifier.
    async fn find_plan(&self, id: TransferPlanId) -> TransferRepositoryResult<Option<TransferPlan>>;

    /// Returns the farm's plans, oldest first.
    async fn plans_for_farm(&self, farm_id: FarmId) -> TransferRepositoryResult<Vec<TransferPlan>>;

    /// Finds a transfer task by identifier.
    async fn find_task(&self, id: TransferTaskId) -> TransferRepositoryResult<Option<TransferTask>>;

    /// Returns every task of the plan sorted by `order`.
    async fn tasks_for_plan(
        &self,
        plan_id: TransferPlanId,
    ) -> TransferRepositoryResult<Vec<TransferTask>>;
}

/// Errors returned by transfer repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TransferRepositoryError {
    /// A stored row could not be turned back into a plan or task.
    #[error("invalid persisted transfer data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TransferRepositoryError {
    /// Wraps a conversion error.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
