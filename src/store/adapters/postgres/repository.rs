//! `PostgreSQL` farm store: read ports plus transactional batch commits.

use super::{
    models::{
        AquariumRow, CatalogLotRow, ChecklistTaskRow, ReceptionInstanceRow, RowConversionError,
        TransferPlanRow, TransferTaskRow, next_revision, revision_column,
    },
    schema::{
        aquariums, catalog_lots, checklist_tasks, reception_instances, transfer_plans,
        transfer_tasks,
    },
};
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
use crate::revision::Revision;
use crate::store::{BatchWriter, RecordKey, StoreError, StoreResult, WriteBatch, WriteOp};
use crate::transfer::{
    domain::{TransferPlan, TransferPlanId, TransferTask, TransferTaskId},
    ports::{TransferRepository, TransferRepositoryError, TransferRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::Error as DieselError;
use tracing::debug;

/// `PostgreSQL` connection pool type used by the farm store.
pub type FarmPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed farm store.
#[derive(Debug, Clone)]
pub struct PostgresFarmStore {
    pool: FarmPgPool,
}

/// Error types that can carry a persistence failure.
trait PersistenceFailure: Send + 'static {
    fn from_failure(err: impl std::error::Error + Send + Sync + 'static) -> Self;
}

impl PersistenceFailure for InventoryRepositoryError {
    fn from_failure(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

impl PersistenceFailure for TransferRepositoryError {
    fn from_failure(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

impl PersistenceFailure for ChecklistRepositoryError {
    fn from_failure(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

impl PersistenceFailure for StoreError {
    fn from_failure(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

impl PostgresFarmStore {
    /// Creates a store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: FarmPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T, E>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut PgConnection) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: PersistenceFailure,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(E::from_failure)?;
            f(&mut connection)
        })
        .await
        .map_err(E::from_failure)?
    }
}

enum CommitFailure {
    Rejected(StoreError),
    Database(DieselError),
}

impl From<DieselError> for CommitFailure {
    fn from(err: DieselError) -> Self {
        Self::Database(err)
    }
}

impl From<RowConversionError> for CommitFailure {
    fn from(err: RowConversionError) -> Self {
        Self::Rejected(StoreError::persistence(err))
    }
}

impl From<CommitFailure> for StoreError {
    fn from(failure: CommitFailure) -> Self {
        match failure {
            CommitFailure::Rejected(err) => err,
            CommitFailure::Database(err) => Self::persistence(err),
        }
    }
}

/// Inserts unsaved rows and updates saved ones only at the expected revision.
macro_rules! put_row {
    ($connection:expr, $table:ident, $row:expr, $key:expr, $expected:expr) => {{
        let row = $row;
        let affected = if $expected.is_unsaved() {
            diesel::insert_into($table::table)
                .values(&row)
                .on_conflict_do_nothing()
                .execute($connection)?
        } else {
            diesel::update(
                $table::table
                    .filter($table::id.eq(row.id))
                    .filter($table::revision.eq(revision_column($expected)?)),
            )
            .set(&row)
            .execute($connection)?
        };
        if affected != 1 {
            let found = stored_revision!($connection, $table, row.id);
            return Err(conflict($key, $expected, found));
        }
    }};
}

/// Deletes a row only at the expected revision.
macro_rules! delete_row {
    ($connection:expr, $table:ident, $id:expr, $key:expr, $expected:expr) => {{
        let id = $id;
        let affected = diesel::delete(
            $table::table
                .filter($table::id.eq(id))
                .filter($table::revision.eq(revision_column($expected)?)),
        )
        .execute($connection)?;
        if affected != 1 {
            let found = stored_revision!($connection, $table, id);
            return Err(conflict($key, $expected, found));
        }
    }};
}

macro_rules! stored_revision {
    ($connection:expr, $table:ident, $id:expr) => {
        $table::table
            .filter($table::id.eq($id))
            .select($table::revision)
            .first::<i64>($connection)
            .optional()?
            .and_then(|value| u64::try_from(value).ok())
            .map(Revision::new)
    };
}

fn conflict(key: RecordKey, expected: Revision, found: Option<Revision>) -> CommitFailure {
    CommitFailure::Rejected(StoreError::Conflict {
        key,
        expected,
        found,
    })
}

fn apply(connection: &mut PgConnection, op: &WriteOp) -> Result<(), CommitFailure> {
    let key = op.key();
    let expected = op.expected_revision();
    match op {
        WriteOp::PutAquarium(aquarium) => put_row!(
            connection,
            aquariums,
            AquariumRow::from_domain(aquarium, next_revision(aquarium))?,
            key,
            expected
        ),
        WriteOp::PutLot(lot) => put_row!(
            connection,
            catalog_lots,
            CatalogLotRow::from_domain(lot, next_revision(lot))?,
            key,
            expected
        ),
        WriteOp::DeleteLot { id, .. } => {
            delete_row!(connection, catalog_lots, id.into_inner(), key, expected);
        }
        WriteOp::PutReceptionInstance(instance) => put_row!(
            connection,
            reception_instances,
            ReceptionInstanceRow::from_domain(instance, next_revision(instance))?,
            key,
            expected
        ),
        WriteOp::DeleteReceptionInstance { id, .. } => {
            delete_row!(connection, reception_instances, id.into_inner(), key, expected);
        }
        WriteOp::PutPlan(plan) => put_row!(
            connection,
            transfer_plans,
            TransferPlanRow::from_domain(plan, next_revision(plan))?,
            key,
            expected
        ),
        WriteOp::DeletePlan { id, .. } => {
            delete_row!(connection, transfer_plans, id.into_inner(), key, expected);
        }
        WriteOp::PutTransferTask(task) => put_row!(
            connection,
            transfer_tasks,
            TransferTaskRow::from_domain(task, next_revision(task))?,
            key,
            expected
        ),
        WriteOp::DeleteTransferTask { id, .. } => {
            delete_row!(connection, transfer_tasks, id.into_inner(), key, expected);
        }
        WriteOp::PutChecklistTask(task) => put_row!(
            connection,
            checklist_tasks,
            ChecklistTaskRow::from_domain(task, next_revision(task))?,
            key,
            expected
        ),
        WriteOp::DeleteChecklistTask { id, .. } => {
            delete_row!(connection, checklist_tasks, id.into_inner(), key, expected);
        }
    }
    Ok(())
}

#[async_trait]
impl BatchWriter for PostgresFarmStore {
    async fn commit(&self, batch: WriteBatch) -> StoreResult<()> {
        if let Some(key) = batch.first_duplicate() {
            return Err(StoreError::DuplicateRecord(key));
        }
        let operations = batch.len();
        self.run_blocking(move |connection| {
            connection
                .transaction::<(), CommitFailure, _>(|connection| {
                    for op in batch.ops() {
                        apply(connection, op)?;
                    }
                    Ok(())
                })
                .map_err(StoreError::from)
        })
        .await?;
        debug!(operations, "batch committed");
        Ok(())
    }
}

#[async_trait]
impl InventoryRepository for PostgresFarmStore {
    async fn find_aquarium(&self, id: AquariumId) -> InventoryRepositoryResult<Option<Aquarium>> {
        self.run_blocking(move |connection| {
            aquariums::table
                .filter(aquariums::id.eq(id.into_inner()))
                .select(AquariumRow::as_select())
                .first::<AquariumRow>(connection)
                .optional()
                .map_err(InventoryRepositoryError::persistence)?
                .map(AquariumRow::into_domain)
                .transpose()
                .map_err(InventoryRepositoryError::invalid_persisted_data)
        })
        .await
    }

    async fn find_lot(&self, id: LotId) -> InventoryRepositoryResult<Option<CatalogLot>> {
        self.run_blocking(move |connection| {
            catalog_lots::table
                .filter(catalog_lots::id.eq(id.into_inner()))
                .select(CatalogLotRow::as_select())
                .first::<CatalogLotRow>(connection)
                .optional()
                .map_err(InventoryRepositoryError::persistence)?
                .map(CatalogLotRow::into_domain)
                .transpose()
                .map_err(InventoryRepositoryError::invalid_persisted_data)
        })
        .await
    }

    async fn find_reception_instance(
        &self,
        id: ReceptionInstanceId,
    ) -> InventoryRepositoryResult<Option<ReceptionInstance>> {
        self.run_blocking(move |connection| {
            reception_instances::table
                .filter(reception_instances::id.eq(id.into_inner()))
                .select(ReceptionInstanceRow::as_select())
                .first::<ReceptionInstanceRow>(connection)
                .optional()
                .map_err(InventoryRepositoryError::persistence)?
                .map(ReceptionInstanceRow::into_domain)
                .transpose()
                .map_err(InventoryRepositoryError::invalid_persisted_data)
        })
        .await
    }

    async fn lots_in_aquarium(&self, id: AquariumId) -> InventoryRepositoryResult<Vec<CatalogLot>> {
        self.run_blocking(move |connection| {
            catalog_lots::table
                .filter(catalog_lots::aquarium_id.eq(id.into_inner()))
                .select(CatalogLotRow::as_select())
                .load::<CatalogLotRow>(connection)
                .map_err(InventoryRepositoryError::persistence)?
                .into_iter()
                .map(CatalogLotRow::into_domain)
                .collect::<Result<Vec<_>, _>>()
                .map_err(InventoryRepositoryError::invalid_persisted_data)
        })
        .await
    }

    async fn reception_instances_in_aquarium(
        &self,
        id: AquariumId,
    ) -> InventoryRepositoryResult<Vec<ReceptionInstance>> {
        self.run_blocking(move |connection| {
            reception_instances::table
                .filter(reception_instances::aquarium_id.eq(id.into_inner()))
                .select(ReceptionInstanceRow::as_select())
                .load::<ReceptionInstanceRow>(connection)
                .map_err(InventoryRepositoryError::persistence)?
                .into_iter()
                .map(ReceptionInstanceRow::into_domain)
                .collect::<Result<Vec<_>, _>>()
                .map_err(InventoryRepositoryError::invalid_persisted_data)
        })
        .await
    }
}

#[async_trait]
impl TransferRepository for PostgresFarmStore {
    async fn find_plan(&self, id: TransferPlanId) -> TransferRepositoryResult<Option<TransferPlan>> {
        self.run_blocking(move |connection| {
            transfer_plans::table
                .filter(transfer_plans::id.eq(id.into_inner()))
                .select(TransferPlanRow::as_select())
                .first::<TransferPlanRow>(connection)
                .optional()
                .map_err(TransferRepositoryError::persistence)?
                .map(TransferPlanRow::into_domain)
                .transpose()
                .map_err(TransferRepositoryError::invalid_persisted_data)
        })
        .await
    }

    async fn plans_for_farm(&self, farm_id: FarmId) -> TransferRepositoryResult<Vec<TransferPlan>> {
        self.run_blocking(move |connection| {
            transfer_plans::table
                .filter(transfer_plans::farm_id.eq(farm_id.into_inner()))
                .order((transfer_plans::created_at.asc(), transfer_plans::id.asc()))
                .select(TransferPlanRow::as_select())
                .load::<TransferPlanRow>(connection)
                .map_err(TransferRepositoryError::persistence)?
                .into_iter()
                .map(TransferPlanRow::into_domain)
                .collect::<Result<Vec<_>, _>>()
                .map_err(TransferRepositoryError::invalid_persisted_data)
        })
        .await
    }

    async fn find_task(&self, id: TransferTaskId) -> TransferRepositoryResult<Option<TransferTask>> {
        self.run_blocking(move |connection| {
            transfer_tasks::table
                .filter(transfer_tasks::id.eq(id.into_inner()))
                .select(TransferTaskRow::as_select())
                .first::<TransferTaskRow>(connection)
                .optional()
                .map_err(TransferRepositoryError::persistence)?
                .map(TransferTaskRow::into_domain)
                .transpose()
                .map_err(TransferRepositoryError::invalid_persisted_data)
        })
        .await
    }

    async fn tasks_for_plan(
        &self,
        plan_id: TransferPlanId,
    ) -> TransferRepositoryResult<Vec<TransferTask>> {
        self.run_blocking(move |connection| {
            transfer_tasks::table
                .filter(transfer_tasks::plan_id.eq(plan_id.into_inner()))
                .order((transfer_tasks::task_order.asc(), transfer_tasks::created_at.asc()))
                .select(TransferTaskRow::as_select())
                .load::<TransferTaskRow>(connection)
                .map_err(TransferRepositoryError::persistence)?
                .into_iter()
                .map(TransferTaskRow::into_domain)
                .collect::<Result<Vec<_>, _>>()
                .map_err(TransferRepositoryError::invalid_persisted_data)
        })
        .await
    }
}

#[async_trait]
impl ChecklistRepository for PostgresFarmStore {
    async fn find_checklist_task(
        &self,
        id: ChecklistTaskId,
    ) -> ChecklistRepositoryResult<Option<ChecklistTask>> {
        self.run_blocking(move |connection| {
            checklist_tasks::table
                .filter(checklist_tasks::id.eq(id.into_inner()))
                .select(ChecklistTaskRow::as_select())
                .first::<ChecklistTaskRow>(connection)
                .optional()
                .map_err(ChecklistRepositoryError::persistence)?
                .map(ChecklistTaskRow::into_domain)
                .transpose()
                .map_err(ChecklistRepositoryError::invalid_persisted_data)
        })
        .await
    }

    async fn checklist_tasks_for_farm(
        &self,
        farm_id: FarmId,
    ) -> ChecklistRepositoryResult<Vec<ChecklistTask>> {
        self.run_blocking(move |connection| {
            checklist_tasks::table
                .filter(checklist_tasks::farm_id.eq(farm_id.into_inner()))
                .order((checklist_tasks::created_at.asc(), checklist_tasks::id.asc()))
                .select(ChecklistTaskRow::as_select())
                .load::<ChecklistTaskRow>(connection)
                .map_err(ChecklistRepositoryError::persistence)?
                .into_iter()
                .map(ChecklistTaskRow::into_domain)
                .collect::<Result<Vec<_>, _>>()
                .map_err(ChecklistRepositoryError::invalid_persisted_data)
        })
        .await
    }
}
