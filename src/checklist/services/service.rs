//! Checklist task orchestration.

use crate::checklist::{
    domain::{ChecklistDomainError, ChecklistTask, ChecklistTaskId, NewChecklistTask},
    ports::{ChecklistRepository, ChecklistRepositoryError},
};
use crate::config::PlanningConfig;
use crate::error::ErrorKind;
use crate::escalation::{BlockReason, Blockage, UnblockAction};
use crate::inventory::{domain::FarmId, ports::InventoryRepository};
use crate::relocation::{RelocationError, RelocationExecutor, RelocationKind, TransferDraft};
use crate::revision::Revisioned;
use crate::store::{BatchWriter, StoreError, WriteBatch, WriteOp};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Request payload for creating a checklist task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateChecklistTaskRequest {
    farm_id: FarmId,
    title: String,
    notes: Option<String>,
    transfer: Option<TransferDraft>,
}

impl CreateChecklistTaskRequest {
    /// Creates a plain checklist request.
    #[must_use]
    pub fn new(farm_id: FarmId, title: impl Into<String>) -> Self {
        Self {
            farm_id,
            title: title.into(),
            notes: None,
            transfer: None,
        }
    }

    /// Sets the notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Attaches a relocation performed when the task completes.
    #[must_use]
    pub fn with_transfer(mut self, draft: TransferDraft) -> Self {
        self.transfer = Some(draft);
        self
    }
}

/// Outcome of a completed checklist task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionReport {
    /// The completed task.
    pub task: ChecklistTask,
    /// The relocation performed, for tasks carrying a transfer.
    pub relocation: Option<RelocationKind>,
}

/// Errors returned by [`ChecklistService`].
#[derive(Debug, Clone, Error)]
pub enum ChecklistServiceError {
    /// A checklist rule rejected the operation.
    #[error(transparent)]
    Domain(#[from] ChecklistDomainError),

    /// The embedded relocation could not be prepared or executed.
    #[error(transparent)]
    Relocation(#[from] RelocationError),

    /// Task lookup failed.
    #[error(transparent)]
    Repository(#[from] ChecklistRepositoryError),

    /// The batch commit failed; nothing was written.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The task does not exist.
    #[error("checklist task {0} not found")]
    TaskNotFound(ChecklistTaskId),
}

impl ChecklistServiceError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) => err.kind(),
            Self::Relocation(err) => err.kind(),
            Self::Repository(_) | Self::Store(StoreError::Persistence(_)) => ErrorKind::Persistence,
            Self::Store(StoreError::Conflict { .. } | StoreError::DuplicateRecord(_)) => {
                ErrorKind::Conflict
            }
            Self::TaskNotFound(_) => ErrorKind::NotFound,
        }
    }
}

/// Result type for checklist service operations.
pub type ChecklistServiceResult<T> = Result<T, ChecklistServiceError>;

/// Checklist task orchestration service.
#[derive(Clone)]
pub struct ChecklistService<R, I, W, C>
where
    R: ChecklistRepository,
    I: InventoryRepository,
    W: BatchWriter,
    C: Clock + Send + Sync,
{
    tasks: Arc<R>,
    executor: RelocationExecutor<I>,
    writer: Arc<W>,
    clock: Arc<C>,
    config: PlanningConfig,
}

impl<R, I, W, C> ChecklistService<R, I, W, C>
where
    R: ChecklistRepository,
    I: InventoryRepository,
    W: BatchWriter,
    C: Clock + Send + Sync,
{
    /// Creates a service with the default planning configuration.
    #[must_use]
    pub fn new(tasks: Arc<R>, inventory: Arc<I>, writer: Arc<W>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            executor: RelocationExecutor::new(inventory),
            writer,
            clock,
            config: PlanningConfig::default(),
        }
    }

    /// Replaces the planning configuration.
    #[must_use]
    pub fn with_config(mut self, config: PlanningConfig) -> Self {
        self.config = config;
        self
    }

    /// Creates a pending checklist task.
    ///
    /// An attached transfer draft is validated against live inventory now
    /// and stored with its fish reference resolved.
    ///
    /// # Errors
    ///
    /// Returns [`ChecklistServiceError`] when the title, notes or transfer
    /// fail validation, or the commit fails.
    pub async fn create_task(
        &self,
        request: CreateChecklistTaskRequest,
    ) -> ChecklistServiceResult<ChecklistTask> {
        let limit = self.config.max_notes_length;
        let transfer = match &request.transfer {
            Some(draft)
                if draft
                    .notes
                    .as_deref()
                    .is_some_and(|notes| notes.trim().chars().count() > limit) =>
            {
                return Err(ChecklistDomainError::NotesTooLong { limit }.into());
            }
            Some(draft) => Some(self.executor.prepare(draft).await?),
            None => None,
        };
        let mut task = ChecklistTask::new(
            NewChecklistTask {
                farm_id: request.farm_id,
                title: request.title,
                notes: request.notes,
                transfer,
            },
            &self.config,
            &*self.clock,
        )?;

        self.commit(WriteOp::PutChecklistTask(task.clone())).await?;
        task.advance_revision();
        info!(
            task_id = %task.id(),
            farm_id = %task.farm_id(),
            has_transfer = task.transfer().is_some(),
            "checklist task created"
        );
        Ok(task)
    }

    /// Returns a checklist task.
    ///
    /// # Errors
    ///
    /// Returns [`ChecklistServiceError::TaskNotFound`] when it is missing.
    pub async fn get_task(&self, task_id: ChecklistTaskId) -> ChecklistServiceResult<ChecklistTask> {
        self.load(task_id).await
    }

    /// Returns the farm's checklist tasks, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`ChecklistServiceError::Repository`] when the lookup fails.
    pub async fn get_tasks(&self, farm_id: FarmId) -> ChecklistServiceResult<Vec<ChecklistTask>> {
        Ok(self.tasks.checklist_tasks_for_farm(farm_id).await?)
    }

    /// Completes a task, running its relocation first when it carries one.
    ///
    /// # Errors
    ///
    /// Returns [`ChecklistServiceError`] when the task is blocked or
    /// finished, the relocation no longer applies, or the commit conflicts.
    pub async fn complete_task(
        &self,
        task_id: ChecklistTaskId,
    ) -> ChecklistServiceResult<CompletionReport> {
        let mut task = self.load(task_id).await?;
        task.ensure_completable()?;

        let mut batch = WriteBatch::new();
        let relocation = match task.transfer() {
            Some(payload) => {
                let effects = self.executor.relocate(payload).await?;
                let kind = effects.kind();
                batch.extend(effects.into_ops());
                Some(kind)
            }
            None => None,
        };
        task.complete(&*self.clock)?;
        batch.push(WriteOp::PutChecklistTask(task.clone()));

        self.commit_batch(batch).await?;
        task.advance_revision();
        info!(task_id = %task.id(), relocated = relocation.is_some(), "checklist task completed");
        Ok(CompletionReport { task, relocation })
    }

    /// Blocks a pending task.
    ///
    /// # Errors
    ///
    /// Returns [`ChecklistServiceError`] when the task is not pending, the
    /// notes are too long, or the commit conflicts.
    pub async fn block_task(
        &self,
        task_id: ChecklistTaskId,
        reason: BlockReason,
        notes: Option<String>,
    ) -> ChecklistServiceResult<ChecklistTask> {
        let limit = self.config.max_notes_length;
        let blockage = Blockage::new(reason, notes);
        if blockage
            .notes()
            .is_some_and(|text| text.chars().count() > limit)
        {
            return Err(ChecklistDomainError::NotesTooLong { limit }.into());
        }

        let mut task = self.load(task_id).await?;
        task.block(blockage, &*self.clock)?;
        self.commit(WriteOp::PutChecklistTask(task.clone())).await?;
        task.advance_revision();
        info!(task_id = %task.id(), %reason, "checklist task blocked");
        Ok(task)
    }

    /// Resolves a blocked task by continuing or cancelling it.
    ///
    /// # Errors
    ///
    /// Returns [`ChecklistServiceError`] when the task is not blocked or the
    /// commit conflicts.
    pub async fn unblock_task(
        &self,
        task_id: ChecklistTaskId,
        action: UnblockAction,
    ) -> ChecklistServiceResult<ChecklistTask> {
        let mut task = self.load(task_id).await?;
        task.unblock(action, &*self.clock)?;
        self.commit(WriteOp::PutChecklistTask(task.clone())).await?;
        task.advance_revision();
        info!(task_id = %task.id(), action = action.as_str(), "checklist task unblocked");
        Ok(task)
    }

    /// Deletes a task in any status.
    ///
    /// # Errors
    ///
    /// Returns [`ChecklistServiceError`] when the task is missing or changed
    /// concurrently.
    pub async fn delete_task(&self, task_id: ChecklistTaskId) -> ChecklistServiceResult<()> {
        let task = self.load(task_id).await?;
        self.commit(WriteOp::DeleteChecklistTask {
            id: task.id(),
            revision: task.revision(),
        })
        .await?;
        info!(task_id = %task_id, "checklist task deleted");
        Ok(())
    }

    async fn load(&self, task_id: ChecklistTaskId) -> ChecklistServiceResult<ChecklistTask> {
        self.tasks
            .find_checklist_task(task_id)
            .await?
            .ok_or(ChecklistServiceError::TaskNotFound(task_id))
    }

    async fn commit(&self, op: WriteOp) -> ChecklistServiceResult<()> {
        self.commit_batch(WriteBatch::from_iter([op])).await
    }

    async fn commit_batch(&self, batch: WriteBatch) -> ChecklistServiceResult<()> {
        self.writer.commit(batch).await.map_err(|err| {
            if let StoreError::Conflict { key, .. } = &err {
                warn!(record = %key, "checklist commit conflicted");
            }
            err.into()
        })
    }
}
