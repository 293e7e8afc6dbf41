//! Shared world state for transfer task escalation BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use aquaroute::inventory::{
    domain::{AquariumId, FarmId, FishRef},
    ports::InventoryRepository,
};
use aquaroute::relocation::{Destination, TransferDraft};
use aquaroute::store::adapters::memory::InMemoryFarmStore;
use aquaroute::transfer::{
    domain::{TransferPlanId, TransferTask},
    services::{AddTaskOutcome, AddTransferTaskRequest, TransferPlanService, TransferServiceError},
};
use eyre::WrapErr;
use mockable::DefaultClock;
use rstest::fixture;

/// Service type used by the BDD world.
pub type TestTransferService =
    TransferPlanService<InMemoryFarmStore, InMemoryFarmStore, InMemoryFarmStore, DefaultClock>;

/// Scenario world for escalation behaviour tests.
pub struct EscalationWorld {
    pub store: Arc<InMemoryFarmStore>,
    pub service: TestTransferService,
    pub farm_id: FarmId,
    pub aquariums: HashMap<String, AquariumId>,
    pub task: Option<TransferTask>,
    pub last_error: Option<TransferServiceError>,
}

impl EscalationWorld {
    /// Creates a world backed by an empty store.
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(InMemoryFarmStore::new());
        let service = TransferPlanService::new(
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::new(DefaultClock),
        );
        Self {
            store,
            service,
            farm_id: FarmId::new(),
            aquariums: HashMap::new(),
            task: None,
            last_error: None,
        }
    }

    /// Looks up an aquarium registered by a given step.
    pub fn aquarium(&self, number: &str) -> Result<AquariumId, eyre::Report> {
        self.aquariums
            .get(number)
            .copied()
            .ok_or_else(|| eyre::eyre!("aquarium {number} was never registered"))
    }

    /// Returns the task under test.
    pub fn task(&self) -> Result<&TransferTask, eyre::Report> {
        self.task
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing transfer task in scenario world"))
    }

    /// Adds an acknowledged move of the first lot in `source_number` and
    /// makes it the task under test.
    pub fn add_move(
        &mut self,
        plan_id: TransferPlanId,
        count: u32,
        source_number: &str,
        target_number: &str,
    ) -> Result<(), eyre::Report> {
        let source = self.aquarium(source_number)?;
        let target = self.aquarium(target_number)?;
        let lots = run_async(self.store.lots_in_aquarium(source)).wrap_err("read source lots")?;
        let lot = lots
            .first()
            .ok_or_else(|| eyre::eyre!("source aquarium holds no lot"))?;
        let draft = TransferDraft::new(
            FishRef::Catalog(lot.id()),
            count,
            source,
            Destination::Aquarium(target),
        );
        let outcome = run_async(
            self.service
                .add_task(AddTransferTaskRequest::new(plan_id, draft).acknowledging_warnings()),
        )
        .wrap_err("add transfer task")?;
        let AddTaskOutcome::Added { task, .. } = outcome else {
            return Err(eyre::eyre!("task was not stored"));
        };
        self.task = Some(task);
        Ok(())
    }

    /// Finalizes the plan of the task under test.
    pub fn finalize_plan(&mut self) -> Result<(), eyre::Report> {
        let plan_id = self.task()?.plan_id();
        if let Err(err) = run_async(self.service.finalize_plan(plan_id)) {
            self.last_error = Some(err);
        }
        Ok(())
    }

    /// Records the outcome of a task operation.
    pub fn record(&mut self, result: Result<TransferTask, TransferServiceError>) {
        match result {
            Ok(task) => {
                self.task = Some(task);
                self.last_error = None;
            }
            Err(err) => self.last_error = Some(err),
        }
    }
}

impl Default for EscalationWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> EscalationWorld {
    EscalationWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
