//! Task-level transitions: start, execute, block and unblock.

use super::{TransferPlanService, TransferServiceResult};
use crate::escalation::{BlockReason, Blockage, UnblockAction};
use crate::inventory::ports::InventoryRepository;
use crate::relocation::RelocationKind;
use crate::revision::Revisioned;
use crate::store::{BatchWriter, WriteBatch, WriteOp};
use crate::transfer::{
    domain::{TransferDomainError, TransferPlan, TransferTask, TransferTaskId},
    ports::TransferRepository,
};
use mockable::Clock;
use tracing::info;

/// Outcome of an executed transfer task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionReport {
    /// The completed task.
    pub task: TransferTask,
    /// The plan with updated counters and status.
    pub plan: TransferPlan,
    /// What happened to the moved stock record.
    pub relocation: RelocationKind,
}

impl<R, I, W, C> TransferPlanService<R, I, W, C>
where
    R: TransferRepository,
    I: InventoryRepository,
    W: BatchWriter,
    C: Clock + Send + Sync,
{
    /// Marks a pending task as started and moves its plan in progress.
    ///
    /// # Errors
    ///
    /// Returns [`super::TransferServiceError`] when the task is missing or not
    /// pending, its plan is not finalized, or the commit conflicts.
    pub async fn start_task(&self, task_id: TransferTaskId) -> TransferServiceResult<TransferTask> {
        let mut task = self.load_task(task_id).await?;
        let mut plan = self.load_plan(task.plan_id()).await?;
        plan.ensure_executing()?;
        task.start(&*self.clock)?;
        plan.record_task_started(&*self.clock);

        self.commit([WriteOp::PutTransferTask(task.clone()), WriteOp::PutPlan(plan)])
            .await?;
        task.advance_revision();
        info!(task_id = %task.id(), plan_id = %task.plan_id(), "transfer task started");
        Ok(task)
    }

    /// Executes the task's relocation and marks it completed.
    ///
    /// The inventory writes, aquarium occupancy, task status and plan counters
    /// commit in one batch. If the fish record or either aquarium changed
    /// since it was read, the batch is rejected and nothing is written.
    ///
    /// # Errors
    ///
    /// Returns [`super::TransferServiceError`] when the task is blocked,
    /// completed or cancelled, its plan is still planning, the relocation no
    /// longer applies, or the commit conflicts.
    pub async fn execute_task(&self, task_id: TransferTaskId) -> TransferServiceResult<ExecutionReport> {
        let mut task = self.load_task(task_id).await?;
        task.ensure_executable()?;
        let mut plan = self.load_plan(task.plan_id()).await?;
        plan.ensure_executing()?;

        let effects = self.executor.relocate(task.payload()).await?;
        let relocation = effects.kind();
        task.complete(&*self.clock)?;
        plan.record_task_completed(self.config.cancelled_tasks, &*self.clock);

        let mut batch: WriteBatch = effects.into_ops().into_iter().collect();
        batch.push(WriteOp::PutTransferTask(task.clone()));
        batch.push(WriteOp::PutPlan(plan.clone()));
        self.commit(batch).await?;
        task.advance_revision();
        plan.advance_revision();

        info!(
            task_id = %task.id(),
            plan_id = %plan.id(),
            fish = %task.payload().fish(),
            quantity = task.payload().quantity().get(),
            destination = %task.payload().destination(),
            plan_status = %plan.status(),
            "transfer task executed"
        );
        Ok(ExecutionReport {
            task,
            plan,
            relocation,
        })
    }

    /// Blocks a pending or in-progress task with a reason and notes.
    ///
    /// # Errors
    ///
    /// Returns [`super::TransferServiceError`] when the task cannot be
    /// blocked from its status, the notes are too long, or the commit
    /// conflicts.
    pub async fn block_task(
        &self,
        task_id: TransferTaskId,
        reason: BlockReason,
        notes: Option<String>,
    ) -> TransferServiceResult<TransferTask> {
        let limit = self.config.max_notes_length;
        let blockage = Blockage::new(reason, notes);
        if blockage
            .notes()
            .is_some_and(|text| text.chars().count() > limit)
        {
            return Err(TransferDomainError::NotesTooLong { limit }.into());
        }

        let mut task = self.load_task(task_id).await?;
        let mut plan = self.load_plan(task.plan_id()).await?;
        task.block(blockage, &*self.clock)?;
        plan.record_task_blocked(&*self.clock);

        self.commit([WriteOp::PutTransferTask(task.clone()), WriteOp::PutPlan(plan)])
            .await?;
        task.advance_revision();
        info!(task_id = %task.id(), plan_id = %task.plan_id(), %reason, "transfer task blocked");
        Ok(task)
    }

    /// Resolves a blocked task by continuing or cancelling it.
    ///
    /// # Errors
    ///
    /// Returns [`super::TransferServiceError`] when the task is not blocked
    /// or the commit conflicts.
    pub async fn unblock_task(
        &self,
        task_id: TransferTaskId,
        action: UnblockAction,
    ) -> TransferServiceResult<TransferTask> {
        let mut task = self.load_task(task_id).await?;
        let mut plan = self.load_plan(task.plan_id()).await?;
        task.unblock(action, &*self.clock)?;
        plan.record_task_unblocked(action, self.config.cancelled_tasks, &*self.clock);

        self.commit([WriteOp::PutTransferTask(task.clone()), WriteOp::PutPlan(plan)])
            .await?;
        task.advance_revision();
        info!(
            task_id = %task.id(),
            plan_id = %task.plan_id(),
            action = action.as_str(),
            status = %task.status(),
            "transfer task unblocked"
        );
        Ok(task)
    }
}
