//! Shared test helpers for in-memory integration tests.

use std::sync::Arc;

use aquaroute::checklist::services::ChecklistService;
use aquaroute::inventory::{
    domain::{
        Aquarium, AquariumId, CatalogLot, FarmId, FishDescriptor, LotId, Quantity, ReceptionId,
        ReceptionInstance, ReceptionInstanceId,
    },
    ports::InventoryRepository,
};
use aquaroute::relocation::{Destination, TransferDraft};
use aquaroute::store::{BatchWriter, WriteBatch, WriteOp, adapters::memory::InMemoryFarmStore};
use aquaroute::transfer::{
    domain::{TransferPlan, TransferPlanId, TransferTask},
    services::{AddTaskOutcome, AddTransferTaskRequest, CreatePlanRequest, TransferPlanService},
};
use eyre::{bail, eyre};
use mockable::DefaultClock;

/// Transfer service wired to the in-memory store.
pub type TestTransferService =
    TransferPlanService<InMemoryFarmStore, InMemoryFarmStore, InMemoryFarmStore, DefaultClock>;

/// Checklist service wired to the in-memory store.
pub type TestChecklistService =
    ChecklistService<InMemoryFarmStore, InMemoryFarmStore, InMemoryFarmStore, DefaultClock>;

/// One farm backed by a fresh in-memory store.
pub struct Farm {
    pub store: Arc<InMemoryFarmStore>,
    pub farm_id: FarmId,
    pub transfers: TestTransferService,
    pub checklist: TestChecklistService,
}

impl Default for Farm {
    fn default() -> Self {
        let store = Arc::new(InMemoryFarmStore::new());
        let clock = Arc::new(DefaultClock);
        let transfers = TransferPlanService::new(
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::clone(&clock),
        );
        let checklist = ChecklistService::new(
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::clone(&store),
            clock,
        );
        Self {
            store,
            farm_id: FarmId::new(),
            transfers,
            checklist,
        }
    }
}

/// Returns a validated quantity.
///
/// # Errors
///
/// Returns an error when `value` is zero.
pub fn quantity(value: u32) -> eyre::Result<Quantity> {
    Ok(Quantity::new(value)?)
}

impl Farm {
    /// Registers an empty aquarium.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails.
    pub async fn aquarium(&self, number: &str) -> eyre::Result<AquariumId> {
        let aquarium = Aquarium::new(self.farm_id, number, "Hall 1", 250);
        let id = aquarium.id();
        self.store
            .commit(WriteBatch::from_iter([WriteOp::PutAquarium(aquarium)]))
            .await?;
        Ok(id)
    }

    /// Stocks a catalog lot into an aquarium and updates its occupancy.
    ///
    /// # Errors
    ///
    /// Returns an error if the aquarium is missing or the commit fails.
    pub async fn lot(&self, aquarium_id: AquariumId, name: &str, count: u32) -> eyre::Result<LotId> {
        let aquarium = self.aquarium_state(aquarium_id).await?;
        let lot = CatalogLot::new(
            self.farm_id,
            FishDescriptor::new(name)?,
            quantity(count)?,
            aquarium_id,
        );
        let id = lot.id();
        let total = aquarium.total_fish() + count;
        self.store
            .commit(WriteBatch::from_iter([
                WriteOp::PutLot(lot),
                WriteOp::PutAquarium(aquarium.with_occupancy(total)),
            ]))
            .await?;
        Ok(id)
    }

    /// Admits a reception instance into an aquarium and updates its occupancy.
    ///
    /// # Errors
    ///
    /// Returns an error if the aquarium is missing or the commit fails.
    pub async fn reception_instance(
        &self,
        aquarium_id: AquariumId,
        name: &str,
        count: u32,
    ) -> eyre::Result<ReceptionInstanceId> {
        let aquarium = self.aquarium_state(aquarium_id).await?;
        let instance = ReceptionInstance::new(
            ReceptionId::new(),
            self.farm_id,
            FishDescriptor::new(name)?,
            quantity(count)?,
            aquarium_id,
        );
        let id = instance.id();
        let total = aquarium.total_fish() + count;
        self.store
            .commit(WriteBatch::from_iter([
                WriteOp::PutReceptionInstance(instance),
                WriteOp::PutAquarium(aquarium.with_occupancy(total)),
            ]))
            .await?;
        Ok(id)
    }

    /// Reads an aquarium back from the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the aquarium is missing.
    pub async fn aquarium_state(&self, id: AquariumId) -> eyre::Result<Aquarium> {
        self.store
            .find_aquarium(id)
            .await?
            .ok_or_else(|| eyre!("aquarium {id} not found"))
    }

    /// Reads a catalog lot back from the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    pub async fn lot_state(&self, id: LotId) -> eyre::Result<Option<CatalogLot>> {
        Ok(self.store.find_lot(id).await?)
    }

    /// Creates a transfer plan for the farm.
    ///
    /// # Errors
    ///
    /// Returns an error if plan creation fails.
    pub async fn plan(&self, name: &str) -> eyre::Result<TransferPlan> {
        Ok(self
            .transfers
            .create_plan(CreatePlanRequest::new(self.farm_id, name, "operator-1"))
            .await?)
    }

    /// Adds a task, acknowledging any warnings it raises.
    ///
    /// # Errors
    ///
    /// Returns an error if the draft is rejected.
    pub async fn add_task(
        &self,
        plan_id: TransferPlanId,
        draft: TransferDraft,
    ) -> eyre::Result<TransferTask> {
        let request = AddTransferTaskRequest::new(plan_id, draft).acknowledging_warnings();
        match self.transfers.add_task(request).await? {
            AddTaskOutcome::Added { task, .. } => Ok(task),
            AddTaskOutcome::ConfirmationRequired { .. } => {
                bail!("acknowledged task still needs confirmation")
            }
        }
    }
}

/// Builds a draft moving a catalog lot between aquariums.
#[must_use]
pub fn move_lot(lot: LotId, count: u32, source: AquariumId, target: AquariumId) -> TransferDraft {
    TransferDraft::new(
        aquaroute::inventory::domain::FishRef::Catalog(lot),
        count,
        source,
        Destination::Aquarium(target),
    )
}

/// Builds a draft shipping part of a catalog lot off the farm.
#[must_use]
pub fn ship_lot(lot: LotId, count: u32, source: AquariumId) -> TransferDraft {
    TransferDraft::new(
        aquaroute::inventory::domain::FishRef::Catalog(lot),
        count,
        source,
        Destination::Shipment,
    )
}
