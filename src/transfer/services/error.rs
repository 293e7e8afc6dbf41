//! Service-level errors for transfer operations.

use crate::error::ErrorKind;
use crate::inventory::ports::InventoryRepositoryError;
use crate::relocation::RelocationError;
use crate::store::StoreError;
use crate::transfer::{
    domain::{TransferDomainError, TransferPlanId, TransferTaskId},
    ports::TransferRepositoryError,
};
use thiserror::Error;

/// Errors returned by [`super::TransferPlanService`].
#[derive(Debug, Clone, Error)]
pub enum TransferServiceError {
    /// A plan or task rule rejected the operation.
    #[error(transparent)]
    Domain(#[from] TransferDomainError),

    /// The relocation could not be prepared or executed.
    #[error(transparent)]
    Relocation(#[from] RelocationError),

    /// Plan or task lookup failed.
    #[error(transparent)]
    Repository(#[from] TransferRepositoryError),

    /// Inventory lookup failed.
    #[error(transparent)]
    Inventory(#[from] InventoryRepositoryError),

    /// The batch commit failed; nothing was written.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The plan does not exist.
    #[error("transfer plan {0} not found")]
    PlanNotFound(TransferPlanId),

    /// The task does not exist.
    #[error("transfer task {0} not found")]
    TaskNotFound(TransferTaskId),
}

impl TransferServiceError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) => err.kind(),
            Self::Relocation(err) => err.kind(),
            Self::Repository(_) | Self::Inventory(_) | Self::Store(StoreError::Persistence(_)) => {
                ErrorKind::Persistence
            }
            Self::Store(StoreError::Conflict { .. } | StoreError::DuplicateRecord(_)) => {
                ErrorKind::Conflict
            }
            Self::PlanNotFound(_) | Self::TaskNotFound(_) => ErrorKind::NotFound,
        }
    }
}

/// Result type for transfer service operations.
pub type TransferServiceResult<T> = Result<T, TransferServiceError>;
