//! Plan creation, task addition, and plan-level operations.

use super::{TransferServiceError, TransferServiceResult};
use crate::config::PlanningConfig;
use crate::inventory::{
    domain::{Aquarium, AquariumId, FarmId},
    ports::InventoryRepository,
};
use crate::relocation::{RelocationError, RelocationExecutor, TransferDraft, TransferPayload};
use crate::revision::Revisioned;
use crate::store::{BatchWriter, StoreError, WriteBatch, WriteOp};
use crate::transfer::{
    domain::{
        ConflictValidator, ConflictWarning, OccupancyProjection, PlanCounters, ProposedTransfer,
        TransferDomainError, TransferPlan, TransferPlanId, TransferTask, TransferTaskId,
        TransferTaskStatus,
    },
    ports::TransferRepository,
};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Request payload for creating a transfer plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePlanRequest {
    farm_id: FarmId,
    name: String,
    created_by: String,
}

impl CreatePlanRequest {
    /// Creates a request.
    #[must_use]
    pub fn new(farm_id: FarmId, name: impl Into<String>, created_by: impl Into<String>) -> Self {
        Self {
            farm_id,
            name: name.into(),
            created_by: created_by.into(),
        }
    }
}

/// Request payload for adding a task to a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddTransferTaskRequest {
    plan_id: TransferPlanId,
    draft: TransferDraft,
    acknowledge_warnings: bool,
}

impl AddTransferTaskRequest {
    /// Creates a request that stops at the first round of warnings.
    #[must_use]
    pub const fn new(plan_id: TransferPlanId, draft: TransferDraft) -> Self {
        Self {
            plan_id,
            draft,
            acknowledge_warnings: false,
        }
    }

    /// Records the caller's second confirmation of any warnings.
    #[must_use]
    pub const fn acknowledging_warnings(mut self) -> Self {
        self.acknowledge_warnings = true;
        self
    }
}

/// Result of [`TransferPlanService::add_task`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddTaskOutcome {
    /// Warnings were raised and not acknowledged; nothing was stored.
    ConfirmationRequired {
        /// Warnings to present to the caller.
        warnings: Vec<ConflictWarning>,
    },
    /// The task was stored.
    Added {
        /// Stored task.
        task: TransferTask,
        /// Warnings the caller acknowledged.
        warnings: Vec<ConflictWarning>,
    },
}

/// Transfer plan orchestration service.
#[derive(Clone)]
pub struct TransferPlanService<R, I, W, C>
where
    R: TransferRepository,
    I: InventoryRepository,
    W: BatchWriter,
    C: Clock + Send + Sync,
{
    pub(super) plans: Arc<R>,
    pub(super) inventory: Arc<I>,
    pub(super) executor: RelocationExecutor<I>,
    pub(super) writer: Arc<W>,
    pub(super) clock: Arc<C>,
    pub(super) config: PlanningConfig,
}

impl<R, I, W, C> TransferPlanService<R, I, W, C>
where
    R: TransferRepository,
    I: InventoryRepository,
    W: BatchWriter,
    C: Clock + Send + Sync,
{
    /// Creates a service with the default planning configuration.
    #[must_use]
    pub fn new(plans: Arc<R>, inventory: Arc<I>, writer: Arc<W>, clock: Arc<C>) -> Self {
        Self {
            plans,
            executor: RelocationExecutor::new(Arc::clone(&inventory)),
            inventory,
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

    /// Returns the active planning configuration.
    #[must_use]
    pub const fn config(&self) -> &PlanningConfig {
        &self.config
    }

    /// Creates a plan in `planning` status with zeroed counters.
    ///
    /// # Errors
    ///
    /// Returns [`TransferServiceError::Domain`] when the name or author is
    /// invalid, or [`TransferServiceError::Store`] when the commit fails.
    pub async fn create_plan(&self, request: CreatePlanRequest) -> TransferServiceResult<TransferPlan> {
        let mut plan = TransferPlan::new(
            request.farm_id,
            &request.name,
            &request.created_by,
            self.config.max_name_length,
            &*self.clock,
        )?;
        self.commit([WriteOp::PutPlan(plan.clone())]).await?;
        plan.advance_revision();
        info!(plan_id = %plan.id(), farm_id = %plan.farm_id(), "transfer plan created");
        Ok(plan)
    }

    /// Returns a plan.
    ///
    /// # Errors
    ///
    /// Returns [`TransferServiceError::PlanNotFound`] when the plan is missing.
    pub async fn get_plan(&self, plan_id: TransferPlanId) -> TransferServiceResult<TransferPlan> {
        self.load_plan(plan_id).await
    }

    /// Returns the farm's plans, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`TransferServiceError::Repository`] when the lookup fails.
    pub async fn list_plans(&self, farm_id: FarmId) -> TransferServiceResult<Vec<TransferPlan>> {
        Ok(self.plans.plans_for_farm(farm_id).await?)
    }

    /// Returns the plan's tasks sorted by `order`.
    ///
    /// # Errors
    ///
    /// Returns [`TransferServiceError::PlanNotFound`] when the plan is missing.
    pub async fn get_tasks(&self, plan_id: TransferPlanId) -> TransferServiceResult<Vec<TransferTask>> {
        let plan = self.load_plan(plan_id).await?;
        Ok(self.plans.tasks_for_plan(plan.id()).await?)
    }

    /// Returns the advisory warnings a draft would raise in the plan.
    ///
    /// # Errors
    ///
    /// Returns [`TransferServiceError`] when the plan is missing or the draft
    /// fails validation against live inventory.
    pub async fn validate_task_warnings(
        &self,
        plan_id: TransferPlanId,
        draft: &TransferDraft,
    ) -> TransferServiceResult<Vec<ConflictWarning>> {
        let plan = self.load_plan(plan_id).await?;
        let payload = self.prepare(draft).await?;
        self.evaluate(plan.id(), &payload).await
    }

    /// Validates a draft and adds it to the plan.
    ///
    /// The task is stored at `order` = the plan's previous task count, and the
    /// count is incremented in the same batch. When the draft raises warnings
    /// the caller has not acknowledged, nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns [`TransferServiceError`] when the plan is missing or closed,
    /// the draft fails validation, the plan is full, or the commit conflicts.
    pub async fn add_task(&self, request: AddTransferTaskRequest) -> TransferServiceResult<AddTaskOutcome> {
        let mut plan = self.load_plan(request.plan_id).await?;
        // Reserves the order on the local copy; closed or full plans fail
        // here before any inventory read.
        let order = plan.record_task_added(self.config.max_tasks_per_plan, &*self.clock)?;
        let payload = self.prepare(&request.draft).await?;

        let warnings = self.evaluate(plan.id(), &payload).await?;
        if !warnings.is_empty() && !request.acknowledge_warnings {
            warn!(
                plan_id = %plan.id(),
                warnings = warnings.len(),
                "transfer task needs confirmation"
            );
            return Ok(AddTaskOutcome::ConfirmationRequired { warnings });
        }

        let mut task = TransferTask::new(plan.id(), payload, order, &*self.clock);
        self.commit([WriteOp::PutPlan(plan), WriteOp::PutTransferTask(task.clone())])
            .await?;
        task.advance_revision();
        info!(
            plan_id = %task.plan_id(),
            task_id = %task.id(),
            order,
            fish = %task.payload().fish(),
            "transfer task added"
        );
        Ok(AddTaskOutcome::Added { task, warnings })
    }

    /// Moves a plan from `planning` to `ready`.
    ///
    /// # Errors
    ///
    /// Returns [`TransferDomainError::EmptyPlan`] (as
    /// [`TransferServiceError::Domain`]) when the plan holds no tasks.
    pub async fn finalize_plan(&self, plan_id: TransferPlanId) -> TransferServiceResult<TransferPlan> {
        let mut plan = self.load_plan(plan_id).await?;
        plan.finalize(&*self.clock)?;
        self.commit([WriteOp::PutPlan(plan.clone())]).await?;
        plan.advance_revision();
        info!(plan_id = %plan.id(), tasks = plan.counters().task_count(), "transfer plan finalized");
        Ok(plan)
    }

    /// Deletes the plan and every task in one batch.
    ///
    /// Returns the number of tasks deleted.
    ///
    /// # Errors
    ///
    /// Returns [`TransferServiceError`] when the plan is missing or a task
    /// changed concurrently; nothing is deleted in that case.
    pub async fn delete_plan(&self, plan_id: TransferPlanId) -> TransferServiceResult<usize> {
        let plan = self.load_plan(plan_id).await?;
        let tasks = self.plans.tasks_for_plan(plan.id()).await?;
        let deleted = tasks.len();

        let mut batch: WriteBatch = tasks
            .iter()
            .map(|task| WriteOp::DeleteTransferTask {
                id: task.id(),
                revision: task.revision(),
            })
            .collect();
        batch.push(WriteOp::DeletePlan {
            id: plan.id(),
            revision: plan.revision(),
        });
        self.commit(batch).await?;
        info!(plan_id = %plan_id, tasks = deleted, "transfer plan deleted");
        Ok(deleted)
    }

    /// Cancels the plan and every task that has not finished.
    ///
    /// Completed tasks and their inventory effects are left alone.
    ///
    /// # Errors
    ///
    /// Returns [`TransferServiceError`] when the plan is missing or closed, or
    /// the commit conflicts.
    pub async fn cancel_plan(&self, plan_id: TransferPlanId) -> TransferServiceResult<TransferPlan> {
        let mut plan = self.load_plan(plan_id).await?;
        let tasks = self.plans.tasks_for_plan(plan.id()).await?;

        let mut batch = WriteBatch::new();
        let mut cancelled = 0_u32;
        let mut previously_blocked = 0_u32;
        for mut task in tasks.into_iter().filter(|task| !task.status().is_terminal()) {
            if task.cancel(&*self.clock)? == TransferTaskStatus::Blocked {
                previously_blocked += 1;
            }
            cancelled += 1;
            batch.push(WriteOp::PutTransferTask(task));
        }
        plan.cancel(cancelled, previously_blocked, &*self.clock)?;
        batch.push(WriteOp::PutPlan(plan.clone()));

        self.commit(batch).await?;
        plan.advance_revision();
        info!(plan_id = %plan.id(), cancelled_tasks = cancelled, "transfer plan cancelled");
        Ok(plan)
    }

    /// Recomputes the plan counters from its tasks and stores them if they
    /// drifted.
    ///
    /// # Errors
    ///
    /// Returns [`TransferServiceError`] when the plan is missing or the commit
    /// conflicts.
    pub async fn reconcile_counters(&self, plan_id: TransferPlanId) -> TransferServiceResult<TransferPlan> {
        let mut plan = self.load_plan(plan_id).await?;
        let tasks = self.plans.tasks_for_plan(plan.id()).await?;
        let counters = PlanCounters::tally(&tasks);
        let previous = plan.counters();

        if plan.reconcile_counters(counters, &*self.clock) {
            self.commit([WriteOp::PutPlan(plan.clone())]).await?;
            plan.advance_revision();
            warn!(
                plan_id = %plan.id(),
                ?previous,
                ?counters,
                "transfer plan counters reconciled"
            );
        }
        Ok(plan)
    }

    pub(super) async fn load_plan(&self, plan_id: TransferPlanId) -> TransferServiceResult<TransferPlan> {
        self.plans
            .find_plan(plan_id)
            .await?
            .ok_or(TransferServiceError::PlanNotFound(plan_id))
    }

    pub(super) async fn load_task(&self, task_id: TransferTaskId) -> TransferServiceResult<TransferTask> {
        self.plans
            .find_task(task_id)
            .await?
            .ok_or(TransferServiceError::TaskNotFound(task_id))
    }

    pub(super) async fn commit(&self, ops: impl IntoIterator<Item = WriteOp>) -> TransferServiceResult<()> {
        let batch: WriteBatch = ops.into_iter().collect();
        match self.writer.commit(batch).await {
            Ok(()) => Ok(()),
            Err(err) => {
                if let StoreError::Conflict { key, .. } = &err {
                    warn!(record = %key, "transfer commit conflicted");
                }
                Err(err.into())
            }
        }
    }

    async fn prepare(&self, draft: &TransferDraft) -> TransferServiceResult<TransferPayload> {
        let limit = self.config.max_notes_length;
        if draft
            .notes
            .as_deref()
            .is_some_and(|notes| notes.trim().chars().count() > limit)
        {
            return Err(TransferDomainError::NotesTooLong { limit }.into());
        }
        Ok(self.executor.prepare(draft).await?)
    }

    async fn evaluate(
        &self,
        plan_id: TransferPlanId,
        payload: &TransferPayload,
    ) -> TransferServiceResult<Vec<ConflictWarning>> {
        let tasks = self.plans.tasks_for_plan(plan_id).await?;
        let projection = OccupancyProjection::from_tasks(&tasks);
        debug!(plan_id = %plan_id, aquariums = projection.len(), "occupancy projected");

        let source = self.require_aquarium(payload.source()).await?;
        let target = match payload.destination().aquarium() {
            Some(target_id) => Some(self.require_aquarium(target_id).await?),
            None => None,
        };
        Ok(ConflictValidator::evaluate(
            &projection,
            &ProposedTransfer {
                source: &source,
                target: target.as_ref(),
                allow_mixing: payload.allow_mixing(),
            },
        ))
    }

    async fn require_aquarium(
        &self,
        id: AquariumId,
    ) -> TransferServiceResult<Aquarium> {
        self.inventory
            .find_aquarium(id)
            .await?
            .ok_or_else(|| RelocationError::AquariumNotFound(id).into())
    }
}
