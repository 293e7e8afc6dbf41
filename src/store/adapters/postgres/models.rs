//! Diesel row models and their conversions to and from domain records.

use super::schema::{
    aquariums, catalog_lots, checklist_tasks, reception_instances, transfer_plans, transfer_tasks,
};
use crate::checklist::domain::{
    ChecklistStatus, ChecklistTask, ChecklistTaskId, ParseChecklistStatusError,
    PersistedChecklistTaskData,
};
use crate::escalation::{BlockReason, Blockage, ParseEscalationError};
use crate::inventory::domain::{
    Aquarium, AquariumId, AquariumStatus, CatalogLot, FarmId, FishDescriptor,
    InventoryDomainError, LotId, ParseAquariumStatusError, PersistedAquariumData,
    PersistedCatalogLotData, PersistedReceptionInstanceData, ReceptionId, ReceptionInstance,
    ReceptionInstanceId,
};
use crate::revision::{Revision, Revisioned};
use crate::transfer::domain::{
    ParseTransferStatusError, PersistedTransferPlanData, PersistedTransferTaskData, PlanCounters,
    PlanStatus, TransferPlan, TransferPlanId, TransferTask, TransferTaskId, TransferTaskStatus,
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;
use thiserror::Error;

/// Failure converting between rows and domain records.
#[derive(Debug, Error)]
pub enum RowConversionError {
    /// A numeric column does not fit the domain type.
    #[error("column {0} is out of range")]
    OutOfRange(&'static str),
    /// An aquarium status column holds an unknown value.
    #[error(transparent)]
    AquariumStatus(#[from] ParseAquariumStatusError),
    /// A plan or task status column holds an unknown value.
    #[error(transparent)]
    TransferStatus(#[from] ParseTransferStatusError),
    /// A checklist status column holds an unknown value.
    #[error(transparent)]
    ChecklistStatus(#[from] ParseChecklistStatusError),
    /// A block reason column holds an unknown value.
    #[error(transparent)]
    BlockReason(#[from] ParseEscalationError),
    /// A fish descriptor failed validation.
    #[error(transparent)]
    Descriptor(#[from] InventoryDomainError),
    /// A JSON column could not be encoded or decoded.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

type ConversionResult<T> = Result<T, RowConversionError>;

fn to_i32(value: u32, column: &'static str) -> ConversionResult<i32> {
    i32::try_from(value).map_err(|_| RowConversionError::OutOfRange(column))
}

fn to_u32(value: i32, column: &'static str) -> ConversionResult<u32> {
    u32::try_from(value).map_err(|_| RowConversionError::OutOfRange(column))
}

pub(super) fn revision_column(revision: Revision) -> ConversionResult<i64> {
    i64::try_from(revision.value()).map_err(|_| RowConversionError::OutOfRange("revision"))
}

fn revision_value(value: i64) -> ConversionResult<Revision> {
    u64::try_from(value)
        .map(Revision::new)
        .map_err(|_| RowConversionError::OutOfRange("revision"))
}

fn descriptor(
    name: String,
    scientific_name: Option<String>,
    size: Option<String>,
) -> ConversionResult<FishDescriptor> {
    let mut descriptor = FishDescriptor::new(name)?;
    if let Some(scientific_name) = scientific_name {
        descriptor = descriptor.with_scientific_name(scientific_name);
    }
    if let Some(size) = size {
        descriptor = descriptor.with_size(size);
    }
    Ok(descriptor)
}

fn blockage(reason: Option<String>, notes: Option<String>) -> ConversionResult<Option<Blockage>> {
    reason
        .map(|reason| Ok(Blockage::new(BlockReason::try_from(reason.as_str())?, notes)))
        .transpose()
}

fn blockage_columns(blockage: Option<&Blockage>) -> (Option<String>, Option<String>) {
    blockage.map_or((None, None), |blockage| {
        (
            Some(blockage.reason().as_str().to_owned()),
            blockage.notes().map(str::to_owned),
        )
    })
}

/// Aquarium row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = aquariums)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct AquariumRow {
    /// Aquarium identifier.
    pub id: uuid::Uuid,
    /// Owning farm.
    pub farm_id: uuid::Uuid,
    /// Display number.
    pub number: String,
    /// Room name.
    pub room: String,
    /// Water volume in litres.
    pub volume_litres: i32,
    /// Aquarium status.
    pub status: String,
    /// Derived fish count.
    pub total_fish: i32,
    /// Stored revision.
    pub revision: i64,
}

impl AquariumRow {
    /// Builds the row stored for `aquarium` at `revision`.
    pub fn from_domain(aquarium: &Aquarium, revision: Revision) -> ConversionResult<Self> {
        Ok(Self {
            id: aquarium.id().into_inner(),
            farm_id: aquarium.farm_id().into_inner(),
            number: aquarium.number().to_owned(),
            room: aquarium.room().to_owned(),
            volume_litres: to_i32(aquarium.volume_litres(), "volume_litres")?,
            status: aquarium.status().as_str().to_owned(),
            total_fish: to_i32(aquarium.total_fish(), "total_fish")?,
            revision: revision_column(revision)?,
        })
    }

    /// Converts the row back into an aquarium.
    pub fn into_domain(self) -> ConversionResult<Aquarium> {
        Ok(Aquarium::from_persisted(PersistedAquariumData {
            id: AquariumId::from_uuid(self.id),
            farm_id: FarmId::from_uuid(self.farm_id),
            number: self.number,
            room: self.room,
            volume_litres: to_u32(self.volume_litres, "volume_litres")?,
            status: AquariumStatus::try_from(self.status.as_str())?,
            total_fish: to_u32(self.total_fish, "total_fish")?,
            revision: revision_value(self.revision)?,
        }))
    }
}

/// Catalog lot row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = catalog_lots)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct CatalogLotRow {
    /// Lot identifier.
    pub id: uuid::Uuid,
    /// Owning farm.
    pub farm_id: uuid::Uuid,
    /// Common fish name.
    pub name: String,
    /// Scientific name.
    pub scientific_name: Option<String>,
    /// Size class.
    pub size: Option<String>,
    /// Fish count.
    pub quantity: i32,
    /// Assigned aquarium.
    pub aquarium_id: Option<uuid::Uuid>,
    /// Stored revision.
    pub revision: i64,
}

impl CatalogLotRow {
    /// Builds the row stored for `lot` at `revision`.
    pub fn from_domain(lot: &CatalogLot, revision: Revision) -> ConversionResult<Self> {
        let descriptor = lot.descriptor();
        Ok(Self {
            id: lot.id().into_inner(),
            farm_id: lot.farm_id().into_inner(),
            name: descriptor.name().to_owned(),
            scientific_name: descriptor.scientific_name().map(str::to_owned),
            size: descriptor.size().map(str::to_owned),
            quantity: to_i32(lot.quantity(), "quantity")?,
            aquarium_id: lot.aquarium_id().map(AquariumId::into_inner),
            revision: revision_column(revision)?,
        })
    }

    /// Converts the row back into a lot.
    pub fn into_domain(self) -> ConversionResult<CatalogLot> {
        Ok(CatalogLot::from_persisted(PersistedCatalogLotData {
            id: LotId::from_uuid(self.id),
            farm_id: FarmId::from_uuid(self.farm_id),
            descriptor: descriptor(self.name, self.scientific_name, self.size)?,
            quantity: to_u32(self.quantity, "quantity")?,
            aquarium_id: self.aquarium_id.map(AquariumId::from_uuid),
            revision: revision_value(self.revision)?,
        }))
    }
}

/// Reception instance row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = reception_instances)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct ReceptionInstanceRow {
    /// Instance identifier.
    pub id: uuid::Uuid,
    /// Reception the instance was admitted with.
    pub reception_id: uuid::Uuid,
    /// Owning farm.
    pub farm_id: uuid::Uuid,
    /// Common fish name.
    pub name: String,
    /// Scientific name.
    pub scientific_name: Option<String>,
    /// Size class.
    pub size: Option<String>,
    /// Fish count.
    pub current_quantity: i32,
    /// Assigned aquarium.
    pub aquarium_id: Option<uuid::Uuid>,
    /// Stored revision.
    pub revision: i64,
}

impl ReceptionInstanceRow {
    /// Builds the row stored for `instance` at `revision`.
    pub fn from_domain(instance: &ReceptionInstance, revision: Revision) -> ConversionResult<Self> {
        let descriptor = instance.descriptor();
        Ok(Self {
            id: instance.id().into_inner(),
            reception_id: instance.reception_id().into_inner(),
            farm_id: instance.farm_id().into_inner(),
            name: descriptor.name().to_owned(),
            scientific_name: descriptor.scientific_name().map(str::to_owned),
            size: descriptor.size().map(str::to_owned),
            current_quantity: to_i32(instance.current_quantity(), "current_quantity")?,
            aquarium_id: instance.aquarium_id().map(AquariumId::into_inner),
            revision: revision_column(revision)?,
        })
    }

    /// Converts the row back into an instance.
    pub fn into_domain(self) -> ConversionResult<ReceptionInstance> {
        Ok(ReceptionInstance::from_persisted(PersistedReceptionInstanceData {
            id: ReceptionInstanceId::from_uuid(self.id),
            reception_id: ReceptionId::from_uuid(self.reception_id),
            farm_id: FarmId::from_uuid(self.farm_id),
            descriptor: descriptor(self.name, self.scientific_name, self.size)?,
            current_quantity: to_u32(self.current_quantity, "current_quantity")?,
            aquarium_id: self.aquarium_id.map(AquariumId::from_uuid),
            revision: revision_value(self.revision)?,
        }))
    }
}

/// Transfer plan row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = transfer_plans)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TransferPlanRow {
    /// Plan identifier.
    pub id: uuid::Uuid,
    /// Owning farm.
    pub farm_id: uuid::Uuid,
    /// Plan name.
    pub name: String,
    /// Plan status.
    pub status: String,
    /// Tasks ever added.
    pub task_count: i32,
    /// Executed tasks.
    pub completed_task_count: i32,
    /// Currently blocked tasks.
    pub blocked_task_count: i32,
    /// Cancelled tasks.
    pub cancelled_task_count: i32,
    /// Author.
    pub created_by: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Stored revision.
    pub revision: i64,
}

impl TransferPlanRow {
    /// Builds the row stored for `plan` at `revision`.
    pub fn from_domain(plan: &TransferPlan, revision: Revision) -> ConversionResult<Self> {
        let counters = plan.counters();
        Ok(Self {
            id: plan.id().into_inner(),
            farm_id: plan.farm_id().into_inner(),
            name: plan.name().to_owned(),
            status: plan.status().as_str().to_owned(),
            task_count: to_i32(counters.task_count(), "task_count")?,
            completed_task_count: to_i32(counters.completed_task_count(), "completed_task_count")?,
            blocked_task_count: to_i32(counters.blocked_task_count(), "blocked_task_count")?,
            cancelled_task_count: to_i32(counters.cancelled_task_count(), "cancelled_task_count")?,
            created_by: plan.created_by().to_owned(),
            created_at: plan.created_at(),
            updated_at: plan.updated_at(),
            revision: revision_column(revision)?,
        })
    }

    /// Converts the row back into a plan.
    pub fn into_domain(self) -> ConversionResult<TransferPlan> {
        Ok(TransferPlan::from_persisted(PersistedTransferPlanData {
            id: TransferPlanId::from_uuid(self.id),
            farm_id: FarmId::from_uuid(self.farm_id),
            name: self.name,
            status: PlanStatus::try_from(self.status.as_str())?,
            counters: PlanCounters::new(
                to_u32(self.task_count, "task_count")?,
                to_u32(self.completed_task_count, "completed_task_count")?,
                to_u32(self.blocked_task_count, "blocked_task_count")?,
                to_u32(self.cancelled_task_count, "cancelled_task_count")?,
            ),
            created_by: self.created_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
            revision: revision_value(self.revision)?,
        }))
    }
}

/// Transfer task row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = transfer_tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct TransferTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning plan.
    pub plan_id: uuid::Uuid,
    /// Relocation payload.
    pub payload: Value,
    /// Advisory order.
    pub task_order: i32,
    /// Task status.
    pub status: String,
    /// Block reason.
    pub block_reason: Option<String>,
    /// Block notes.
    pub block_notes: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Execution timestamp.
    pub executed_at: Option<DateTime<Utc>>,
    /// Stored revision.
    pub revision: i64,
}

impl TransferTaskRow {
    /// Builds the row stored for `task` at `revision`.
    pub fn from_domain(task: &TransferTask, revision: Revision) -> ConversionResult<Self> {
        let (block_reason, block_notes) = blockage_columns(task.blockage());
        Ok(Self {
            id: task.id().into_inner(),
            plan_id: task.plan_id().into_inner(),
            payload: serde_json::to_value(task.payload())?,
            task_order: to_i32(task.order(), "task_order")?,
            status: task.status().as_str().to_owned(),
            block_reason,
            block_notes,
            created_at: task.created_at(),
            updated_at: task.updated_at(),
            executed_at: task.executed_at(),
            revision: revision_column(revision)?,
        })
    }

    /// Converts the row back into a task.
    pub fn into_domain(self) -> ConversionResult<TransferTask> {
        Ok(TransferTask::from_persisted(PersistedTransferTaskData {
            id: TransferTaskId::from_uuid(self.id),
            plan_id: TransferPlanId::from_uuid(self.plan_id),
            payload: serde_json::from_value(self.payload)?,
            order: to_u32(self.task_order, "task_order")?,
            status: TransferTaskStatus::try_from(self.status.as_str())?,
            blockage: blockage(self.block_reason, self.block_notes)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
            executed_at: self.executed_at,
            revision: revision_value(self.revision)?,
        }))
    }
}

/// Checklist task row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = checklist_tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct ChecklistTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning farm.
    pub farm_id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Task notes.
    pub notes: Option<String>,
    /// Task status.
    pub status: String,
    /// Block reason.
    pub block_reason: Option<String>,
    /// Block notes.
    pub block_notes: Option<String>,
    /// Embedded relocation payload.
    pub transfer: Option<Value>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Stored revision.
    pub revision: i64,
}

impl ChecklistTaskRow {
    /// Builds the row stored for `task` at `revision`.
    pub fn from_domain(task: &ChecklistTask, revision: Revision) -> ConversionResult<Self> {
        let (block_reason, block_notes) = blockage_columns(task.blockage());
        Ok(Self {
            id: task.id().into_inner(),
            farm_id: task.farm_id().into_inner(),
            title: task.title().to_owned(),
            notes: task.notes().map(str::to_owned),
            status: task.status().as_str().to_owned(),
            block_reason,
            block_notes,
            transfer: task.transfer().map(serde_json::to_value).transpose()?,
            created_at: task.created_at(),
            updated_at: task.updated_at(),
            completed_at: task.completed_at(),
            revision: revision_column(revision)?,
        })
    }

    /// Converts the row back into a task.
    pub fn into_domain(self) -> ConversionResult<ChecklistTask> {
        Ok(ChecklistTask::from_persisted(PersistedChecklistTaskData {
            id: ChecklistTaskId::from_uuid(self.id),
            farm_id: FarmId::from_uuid(self.farm_id),
            title: self.title,
            notes: self.notes,
            status: ChecklistStatus::try_from(self.status.as_str())?,
            blockage: blockage(self.block_reason, self.block_notes)?,
            transfer: self.transfer.map(serde_json::from_value).transpose()?,
            created_at: self.created_at,
            updated_at: self.updated_at,
            completed_at: self.completed_at,
            revision: revision_value(self.revision)?,
        }))
    }
}

/// Returns the revision a stored write of `record` receives.
pub(super) fn next_revision(record: &impl Revisioned) -> Revision {
    record.revision().next()
}
