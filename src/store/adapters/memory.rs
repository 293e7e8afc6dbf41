//! In-memory farm store for tests and embedding.

use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::hash::Hash;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::checklist::{
    domain::{ChecklistTask, ChecklistTaskId},
    ports::{ChecklistRepository, ChecklistRepositoryError, ChecklistRepositoryResult},
};
use crate::inventory::{
    domain::{
        Aquarium, AquariumId, CatalogLot, FarmId, LotId, ReceptionInstance, ReceptionInstanceId,
    },
    ports::{InventoryRepository, InventoryRepositoryError, InventoryRepositoryResult},
};
use crate::revision::{Revision, Revisioned};
use crate::store::{BatchWriter, RecordKey, StoreError, StoreResult, WriteBatch, WriteOp};
use crate::transfer::{
    domain::{TransferPlan, TransferPlanId, TransferTask, TransferTaskId},
    ports::{TransferRepository, TransferRepositoryError, TransferRepositoryResult},
};

/// Thread-safe in-memory store holding every farm collection.
///
/// All collections live behind one lock, so a committed batch is observed
/// either entirely or not at all.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFarmStore {
    state: Arc<RwLock<FarmState>>,
}

#[derive(Debug, Default)]
struct FarmState {
    aquariums: HashMap<AquariumId, Aquarium>,
    lots: HashMap<LotId, CatalogLot>,
    reception_instances: HashMap<ReceptionInstanceId, ReceptionInstance>,
    plans: HashMap<TransferPlanId, TransferPlan>,
    transfer_tasks: HashMap<TransferTaskId, TransferTask>,
    checklist_tasks: HashMap<ChecklistTaskId, ChecklistTask>,
    lots_by_aquarium: HashMap<AquariumId, BTreeSet<LotId>>,
    instances_by_aquarium: HashMap<AquariumId, BTreeSet<ReceptionInstanceId>>,
    tasks_by_plan: HashMap<TransferPlanId, BTreeSet<TransferTaskId>>,
}

impl InMemoryFarmStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, FarmState>, std::io::Error> {
        self.state.read().map_err(poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, FarmState>, std::io::Error> {
        self.state.write().map_err(poisoned)
    }
}

fn poisoned<T>(err: PoisonError<T>) -> std::io::Error {
    std::io::Error::other(err.to_string())
}

fn add_to_index<K, V>(index: &mut HashMap<K, BTreeSet<V>>, key: Option<K>, value: V)
where
    K: Eq + Hash,
    V: Ord,
{
    if let Some(key) = key {
        index.entry(key).or_default().insert(value);
    }
}

fn remove_from_index<K, V>(index: &mut HashMap<K, BTreeSet<V>>, key: Option<K>, value: &V)
where
    K: Eq + Hash,
    V: Ord,
{
    if let Some(key) = key
        && let Some(values) = index.get_mut(&key)
    {
        values.remove(value);
        if values.is_empty() {
            index.remove(&key);
        }
    }
}

fn stamped<T: Revisioned>(mut record: T) -> T {
    record.advance_revision();
    record
}

impl FarmState {
    fn stored_revision(&self, key: RecordKey) -> Option<Revision> {
        match key {
            RecordKey::Aquarium(id) => self.aquariums.get(&id).map(Revisioned::revision),
            RecordKey::Lot(id) => self.lots.get(&id).map(Revisioned::revision),
            RecordKey::ReceptionInstance(id) => {
                self.reception_instances.get(&id).map(Revisioned::revision)
            }
            RecordKey::Plan(id) => self.plans.get(&id).map(Revisioned::revision),
            RecordKey::TransferTask(id) => self.transfer_tasks.get(&id).map(Revisioned::revision),
            RecordKey::ChecklistTask(id) => {
                self.checklist_tasks.get(&id).map(Revisioned::revision)
            }
        }
    }

    fn check(&self, batch: &WriteBatch) -> StoreResult<()> {
        if let Some(key) = batch.first_duplicate() {
            return Err(StoreError::DuplicateRecord(key));
        }
        for op in batch.ops() {
            let key = op.key();
            let expected = op.expected_revision();
            let found = self.stored_revision(key);
            let matches = if !op.is_delete() && expected.is_unsaved() {
                found.is_none()
            } else {
                found == Some(expected)
            };
            if !matches {
                return Err(StoreError::Conflict {
                    key,
                    expected,
                    found,
                });
            }
        }
        Ok(())
    }

    fn apply(&mut self, op: WriteOp) {
        match op {
            WriteOp::PutAquarium(aquarium) => {
                self.aquariums.insert(aquarium.id(), stamped(aquarium));
            }
            WriteOp::PutLot(lot) => {
                let lot = stamped(lot);
                if let Some(previous) = self.lots.get(&lot.id()) {
                    let old_aquarium = previous.aquarium_id();
                    remove_from_index(&mut self.lots_by_aquarium, old_aquarium, &lot.id());
                }
                add_to_index(&mut self.lots_by_aquarium, lot.aquarium_id(), lot.id());
                self.lots.insert(lot.id(), lot);
            }
            WriteOp::DeleteLot { id, .. } => {
                if let Some(previous) = self.lots.remove(&id) {
                    remove_from_index(&mut self.lots_by_aquarium, previous.aquarium_id(), &id);
                }
            }
            WriteOp::PutReceptionInstance(instance) => {
                let instance = stamped(instance);
                if let Some(previous) = self.reception_instances.get(&instance.id()) {
                    let old_aquarium = previous.aquarium_id();
                    remove_from_index(&mut self.instances_by_aquarium, old_aquarium, &instance.id());
                }
                add_to_index(
                    &mut self.instances_by_aquarium,
                    instance.aquarium_id(),
                    instance.id(),
                );
                self.reception_instances.insert(instance.id(), instance);
            }
            WriteOp::DeleteReceptionInstance { id, .. } => {
                if let Some(previous) = self.reception_instances.remove(&id) {
                    remove_from_index(&mut self.instances_by_aquarium, previous.aquarium_id(), &id);
                }
            }
            WriteOp::PutPlan(plan) => {
                self.plans.insert(plan.id(), stamped(plan));
            }
            WriteOp::DeletePlan { id, .. } => {
                self.plans.remove(&id);
            }
            WriteOp::PutTransferTask(task) => {
                let task = stamped(task);
                add_to_index(&mut self.tasks_by_plan, Some(task.plan_id()), task.id());
                self.transfer_tasks.insert(task.id(), task);
            }
            WriteOp::DeleteTransferTask { id, .. } => {
                if let Some(previous) = self.transfer_tasks.remove(&id) {
                    remove_from_index(&mut self.tasks_by_plan, Some(previous.plan_id()), &id);
                }
            }
            WriteOp::PutChecklistTask(task) => {
                self.checklist_tasks.insert(task.id(), stamped(task));
            }
            WriteOp::DeleteChecklistTask { id, .. } => {
                self.checklist_tasks.remove(&id);
            }
        }
    }
}

#[async_trait]
impl BatchWriter for InMemoryFarmStore {
    async fn commit(&self, batch: WriteBatch) -> StoreResult<()> {
        let mut state = self.write().map_err(StoreError::persistence)?;
        state.check(&batch)?;
        for op in batch.into_ops() {
            state.apply(op);
        }
        Ok(())
    }
}

#[async_trait]
impl InventoryRepository for InMemoryFarmStore {
    async fn find_aquarium(&self, id: AquariumId) -> InventoryRepositoryResult<Option<Aquarium>> {
        let state = self.read().map_err(InventoryRepositoryError::persistence)?;
        Ok(state.aquariums.get(&id).cloned())
    }

    async fn find_lot(&self, id: LotId) -> InventoryRepositoryResult<Option<CatalogLot>> {
        let state = self.read().map_err(InventoryRepositoryError::persistence)?;
        Ok(state.lots.get(&id).cloned())
    }

    async fn find_reception_instance(
        &self,
        id: ReceptionInstanceId,
    ) -> InventoryRepositoryResult<Option<ReceptionInstance>> {
        let state = self.read().map_err(InventoryRepositoryError::persistence)?;
        Ok(state.reception_instances.get(&id).cloned())
    }

    async fn lots_in_aquarium(&self, id: AquariumId) -> InventoryRepositoryResult<Vec<CatalogLot>> {
        let state = self.read().map_err(InventoryRepositoryError::persistence)?;
        Ok(state
            .lots_by_aquarium
            .get(&id)
            .into_iter()
            .flatten()
            .filter_map(|lot_id| state.lots.get(lot_id).cloned())
            .collect())
    }

    async fn reception_instances_in_aquarium(
        &self,
        id: AquariumId,
    ) -> InventoryRepositoryResult<Vec<ReceptionInstance>> {
        let state = self.read().map_err(InventoryRepositoryError::persistence)?;
        Ok(state
            .instances_by_aquarium
            .get(&id)
            .into_iter()
            .flatten()
            .filter_map(|instance_id| state.reception_instances.get(instance_id).cloned())
            .collect())
    }
}

#[async_trait]
impl TransferRepository for InMemoryFarmStore {
    async fn find_plan(&self, id: TransferPlanId) -> TransferRepositoryResult<Option<TransferPlan>> {
        let state = self.read().map_err(TransferRepositoryError::persistence)?;
        Ok(state.plans.get(&id).cloned())
    }

    async fn plans_for_farm(&self, farm_id: FarmId) -> TransferRepositoryResult<Vec<TransferPlan>> {
        let state = self.read().map_err(TransferRepositoryError::persistence)?;
        let mut plans: Vec<TransferPlan> = state
            .plans
            .values()
            .filter(|plan| plan.farm_id() == farm_id)
            .cloned()
            .collect();
        plans.sort_by_key(|plan| (plan.created_at(), plan.id()));
        Ok(plans)
    }

    async fn find_task(&self, id: TransferTaskId) -> TransferRepositoryResult<Option<TransferTask>> {
        let state = self.read().map_err(TransferRepositoryError::persistence)?;
        Ok(state.transfer_tasks.get(&id).cloned())
    }

    async fn tasks_for_plan(
        &self,
        plan_id: TransferPlanId,
    ) -> TransferRepositoryResult<Vec<TransferTask>> {
        let state = self.read().map_err(TransferRepositoryError::persistence)?;
        let mut tasks: Vec<TransferTask> = state
            .tasks_by_plan
            .get(&plan_id)
            .into_iter()
            .flatten()
            .filter_map(|task_id| state.transfer_tasks.get(task_id).cloned())
            .collect();
        tasks.sort_by_key(|task| (task.order(), task.created_at()));
        Ok(tasks)
    }
}

#[async_trait]
impl ChecklistRepository for InMemoryFarmStore {
    async fn find_checklist_task(
        &self,
        id: ChecklistTaskId,
    ) -> ChecklistRepositoryResult<Option<ChecklistTask>> {
        let state = self.read().map_err(ChecklistRepositoryError::persistence)?;
        Ok(state.checklist_tasks.get(&id).cloned())
    }

    async fn checklist_tasks_for_farm(
        &self,
        farm_id: FarmId,
    ) -> ChecklistRepositoryResult<Vec<ChecklistTask>> {
        let state = self.read().map_err(ChecklistRepositoryError::persistence)?;
        let mut tasks: Vec<ChecklistTask> = state
            .checklist_tasks
            .values()
            .filter(|task| task.farm_id() == farm_id)
            .cloned()
            .collect();
        tasks.sort_by_key(|task| (task.created_at(), task.id()));
        Ok(tasks)
    }
}
