//! Write port shared by every service.

use super::{RecordKey, WriteBatch};
use crate::revision::Revision;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for batch commits.
pub type StoreResult<T> = Result<T, StoreError>;

/// Applies write batches atomically.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BatchWriter: Send + Sync {
    /// Applies every operation in `batch`, or none of them.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] when a record's stored revision no
    /// longer matches, [`StoreError::DuplicateRecord`] when the batch touches
    /// a record twice, and [`StoreError::Persistence`] for backend failures.
    async fn commit(&self, batch: WriteBatch) -> StoreResult<()>;
}

/// Errors returned by batch writers.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The record changed since it was read.
    #[error("write conflict on {key}: expected {expected}, found {}", found.map_or_else(|| "no record".to_owned(), |revision| revision.to_string()))]
    Conflict {
        /// Conflicting record.
        key: RecordKey,
        /// Revision the batch expected.
        expected: Revision,
        /// Revision actually stored; `None` when the record is absent.
        found: Option<Revision>,
    },

    /// The batch touches the same record more than once.
    #[error("batch writes {0} more than once")]
    DuplicateRecord(RecordKey),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
