//! Every record kind survives a write and read through the `PostgreSQL` store.

use crate::postgres::helpers::{BoxError, PreparedStore, prepared_store};
use aquaroute::checklist::{
    domain::{ChecklistTask, NewChecklistTask},
    ports::ChecklistRepository,
};
use aquaroute::config::PlanningConfig;
use aquaroute::escalation::{BlockReason, Blockage};
use aquaroute::inventory::{
    domain::{
        Aquarium, AquariumStatus, CatalogLot, FarmId, FishDescriptor, FishRef, Quantity,
        ReceptionId, ReceptionInstance,
    },
    ports::InventoryRepository,
};
use aquaroute::relocation::{Destination, TransferDraft, TransferPayload};
use aquaroute::revision::{Revision, Revisioned};
use aquaroute::store::{BatchWriter, WriteBatch, WriteOp};
use aquaroute::transfer::{
    domain::{TransferPlan, TransferTask},
    ports::TransferRepository,
};
use mockable::DefaultClock;
use rstest::rstest;

fn saved<T: Revisioned + Clone>(record: &T) -> T {
    let mut copy = record.clone();
    copy.advance_revision();
    copy
}

fn discus() -> Result<FishDescriptor, BoxError> {
    Ok(FishDescriptor::new("Discus")?
        .with_scientific_name("Symphysodon aequifasciatus")
        .with_size("L"))
}

struct Records {
    tank: Aquarium,
    quarantine: Aquarium,
    lot: CatalogLot,
    instance: ReceptionInstance,
    plan: TransferPlan,
    task: TransferTask,
    checklist: ChecklistTask,
}

fn records() -> Result<Records, BoxError> {
    let clock = DefaultClock;
    let farm_id = FarmId::new();
    let mut tank = Aquarium::new(farm_id, "B7", "Hall 2", 320).with_occupancy(12);
    tank.set_status(AquariumStatus::Maintenance);
    let quarantine = Aquarium::new(farm_id, "Q1", "Quarantine", 90).with_occupancy(4);
    let lot = CatalogLot::new(farm_id, discus()?, Quantity::new(12)?, tank.id());
    let instance = ReceptionInstance::new(
        ReceptionId::new(),
        farm_id,
        FishDescriptor::new("Neon tetra")?,
        Quantity::new(4)?,
        quarantine.id(),
    );

    let plan = TransferPlan::new(farm_id, "Autumn regrade", "marta", 120, &clock)?;
    let draft = TransferDraft::new(
        FishRef::Catalog(lot.id()),
        5,
        tank.id(),
        Destination::Aquarium(quarantine.id()),
    )
    .allowing_mixing()
    .with_notes("net gently");
    let payload = TransferPayload::new(
        FishRef::Catalog(lot.id()),
        discus()?,
        Quantity::new(5)?,
        &draft,
    );
    let mut task = TransferTask::new(plan.id(), payload.clone(), 0, &clock);
    task.block(
        Blockage::new(BlockReason::Temperature, Some("31C in Q1".to_owned())),
        &clock,
    )?;

    let checklist = ChecklistTask::new(
        NewChecklistTask {
            farm_id,
            title: "Ship the surplus".to_owned(),
            notes: Some("before Friday".to_owned()),
            transfer: Some(payload),
        },
        &PlanningConfig::default(),
        &clock,
    )?;

    Ok(Records {
        tank,
        quarantine,
        lot,
        instance,
        plan,
        task,
        checklist,
    })
}

async fn commit_all(prepared: &PreparedStore, records: &Records) -> Result<(), BoxError> {
    prepared
        .store
        .commit(WriteBatch::from_iter([
            WriteOp::PutAquarium(records.tank.clone()),
            WriteOp::PutAquarium(records.quarantine.clone()),
            WriteOp::PutLot(records.lot.clone()),
            WriteOp::PutReceptionInstance(records.instance.clone()),
            WriteOp::PutPlan(records.plan.clone()),
            WriteOp::PutTransferTask(records.task.clone()),
            WriteOp::PutChecklistTask(records.checklist.clone()),
        ]))
        .await?;
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn inventory_records_round_trip(
    #[future] prepared_store: Result<Option<PreparedStore>, BoxError>,
) -> Result<(), BoxError> {
    let Some(prepared) = prepared_store.await? else {
        return Ok(());
    };
    let records = records()?;
    commit_all(&prepared, &records).await?;
    let store = &prepared.store;

    let tank = store.find_aquarium(records.tank.id()).await?;
    assert_eq!(tank, Some(saved(&records.tank)));
    assert_eq!(tank.map(|found| found.status()), Some(AquariumStatus::Maintenance));

    let lot = store.find_lot(records.lot.id()).await?;
    assert_eq!(lot, Some(saved(&records.lot)));
    assert_eq!(
        store.lots_in_aquarium(records.tank.id()).await?,
        vec![saved(&records.lot)]
    );

    let instance = store.find_reception_instance(records.instance.id()).await?;
    assert_eq!(instance, Some(saved(&records.instance)));
    assert_eq!(
        store
            .reception_instances_in_aquarium(records.quarantine.id())
            .await?,
        vec![saved(&records.instance)]
    );
    assert!(store.lots_in_aquarium(records.quarantine.id()).await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn plan_and_task_rows_round_trip(
    #[future] prepared_store: Result<Option<PreparedStore>, BoxError>,
) -> Result<(), BoxError> {
    let Some(prepared) = prepared_store.await? else {
        return Ok(());
    };
    let records = records()?;
    commit_all(&prepared, &records).await?;
    let store = &prepared.store;

    let plan = store
        .find_plan(records.plan.id())
        .await?
        .ok_or("plan missing after commit")?;
    assert_eq!(plan.farm_id(), records.plan.farm_id());
    assert_eq!(plan.name(), "Autumn regrade");
    assert_eq!(plan.created_by(), "marta");
    assert_eq!(plan.status(), records.plan.status());
    assert_eq!(plan.counters(), records.plan.counters());
    assert_eq!(plan.revision(), Revision::new(1));
    assert_eq!(
        plan.created_at().timestamp_micros(),
        records.plan.created_at().timestamp_micros()
    );
    assert_eq!(
        store
            .plans_for_farm(records.plan.farm_id())
            .await?
            .iter()
            .map(TransferPlan::id)
            .collect::<Vec<_>>(),
        vec![records.plan.id()]
    );

    let tasks = store.tasks_for_plan(records.plan.id()).await?;
    let [task] = tasks.as_slice() else {
        return Err(format!("expected one task, found {}", tasks.len()).into());
    };
    assert_eq!(task.id(), records.task.id());
    assert_eq!(task.payload(), records.task.payload());
    assert_eq!(task.payload().notes(), Some("net gently"));
    assert!(task.payload().allow_mixing());
    assert_eq!(task.order(), 0);
    assert_eq!(task.status(), records.task.status());
    assert_eq!(task.blockage(), records.task.blockage());
    assert_eq!(task.executed_at(), None);
    assert_eq!(task.revision(), Revision::new(1));
    assert_eq!(
        task.updated_at().timestamp_micros(),
        records.task.updated_at().timestamp_micros()
    );
    assert_eq!(store.find_task(records.task.id()).await?.as_ref(), Some(task));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn checklist_rows_round_trip(
    #[future] prepared_store: Result<Option<PreparedStore>, BoxError>,
) -> Result<(), BoxError> {
    let Some(prepared) = prepared_store.await? else {
        return Ok(());
    };
    let records = records()?;
    commit_all(&prepared, &records).await?;

    let found = prepared
        .store
        .find_checklist_task(records.checklist.id())
        .await?
        .ok_or("checklist task missing after commit")?;
    assert_eq!(found.title(), "Ship the surplus");
    assert_eq!(found.notes(), Some("before Friday"));
    assert_eq!(found.status(), records.checklist.status());
    assert_eq!(found.blockage(), None);
    assert_eq!(found.transfer(), records.checklist.transfer());
    assert_eq!(found.completed_at(), None);
    assert_eq!(found.revision(), Revision::new(1));
    assert_eq!(
        found.created_at().timestamp_micros(),
        records.checklist.created_at().timestamp_micros()
    );

    let listed = prepared
        .store
        .checklist_tasks_for_farm(records.checklist.farm_id())
        .await?;
    assert_eq!(listed, vec![found]);
    Ok(())
}
