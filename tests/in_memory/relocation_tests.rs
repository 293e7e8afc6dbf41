//! Inventory effects of executed transfer tasks.

use super::helpers::{Farm, move_lot, ship_lot};
use aquaroute::config::{CancelledTaskPolicy, PlanningConfig};
use aquaroute::error::ErrorKind;
use aquaroute::escalation::{BlockReason, UnblockAction};
use aquaroute::inventory::domain::{FishRef, LotId};
use aquaroute::relocation::{Destination, RelocationKind, TransferDraft};
use aquaroute::transfer::domain::{PlanStatus, TransferTaskStatus};
use aquaroute::transfer::services::TransferPlanService;
use eyre::{bail, ensure};
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use std::sync::Arc;

#[fixture]
fn farm() -> Farm {
    Farm::default()
}

async fn lot_quantity(farm: &Farm, lot: LotId) -> eyre::Result<Option<u32>> {
    Ok(farm.lot_state(lot).await?.map(|row| row.quantity()))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn each_added_task_increments_the_count(farm: Farm) -> eyre::Result<()> {
    let a1 = farm.aquarium("A1").await?;
    let a2 = farm.aquarium("A2").await?;
    let lot = farm.lot(a1, "Guppy", 30).await?;
    let plan = farm.plan("Many small moves").await?;

    for expected in 1..=4_u32 {
        let task = farm.add_task(plan.id(), move_lot(lot, 1, a1, a2)).await?;
        ensure!(task.order() == expected - 1);
        let stored = farm.transfers.get_plan(plan.id()).await?;
        ensure!(stored.counters().task_count() == expected);
    }
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_task_executes_at_most_once(farm: Farm) -> eyre::Result<()> {
    let a1 = farm.aquarium("A1").await?;
    let a2 = farm.aquarium("A2").await?;
    let lot = farm.lot(a1, "Guppy", 30).await?;
    let plan = farm.plan("Once only").await?;
    let task = farm.add_task(plan.id(), move_lot(lot, 10, a1, a2)).await?;

    farm.transfers.finalize_plan(plan.id()).await?;
    farm.transfers.execute_task(task.id()).await?;
    let Err(err) = farm.transfers.execute_task(task.id()).await else {
        bail!("second execution succeeded");
    };
    ensure!(err.kind() == ErrorKind::State);
    ensure!(farm.aquarium_state(a1).await?.total_fish() == 20);
    ensure!(farm.aquarium_state(a2).await?.total_fish() == 10);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn block_then_continue_returns_to_pending(farm: Farm) -> eyre::Result<()> {
    let a1 = farm.aquarium("A1").await?;
    let a2 = farm.aquarium("A2").await?;
    let lot = farm.lot(a1, "Guppy", 8).await?;
    let plan = farm.plan("Blocked move").await?;
    let task = farm.add_task(plan.id(), move_lot(lot, 8, a1, a2)).await?;

    let blocked = farm
        .transfers
        .block_task(task.id(), BlockReason::Leak, Some("A2 drips".to_owned()))
        .await?;
    ensure!(blocked.status() == TransferTaskStatus::Blocked);
    ensure!(farm.transfers.get_plan(plan.id()).await?.counters().blocked_task_count() == 1);

    let resumed = farm.transfers.unblock_task(task.id(), UnblockAction::Continue).await?;
    ensure!(resumed.status() == TransferTaskStatus::Pending);
    ensure!(resumed.blockage().is_none());
    ensure!(farm.transfers.get_plan(plan.id()).await?.counters().blocked_task_count() == 0);

    farm.transfers.finalize_plan(plan.id()).await?;
    farm.transfers.execute_task(task.id()).await?;
    ensure!(farm.aquarium_state(a2).await?.total_fish() == 8);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn shipping_the_whole_lot_deletes_it(farm: Farm) -> eyre::Result<()> {
    let a1 = farm.aquarium("A1").await?;
    let lot = farm.lot(a1, "Guppy", 12).await?;
    let plan = farm.plan("Ship out").await?;
    let task = farm.add_task(plan.id(), ship_lot(lot, 12, a1)).await?;

    farm.transfers.finalize_plan(plan.id()).await?;
    let report = farm.transfers.execute_task(task.id()).await?;
    ensure!(report.relocation == RelocationKind::Shipped { record_deleted: true });
    ensure!(farm.lot_state(lot).await?.is_none());
    ensure!(farm.aquarium_state(a1).await?.total_fish() == 0);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn partial_shipment_keeps_the_remainder(farm: Farm) -> eyre::Result<()> {
    let a1 = farm.aquarium("A1").await?;
    let lot = farm.lot(a1, "Guppy", 12).await?;
    let plan = farm.plan("Ship some").await?;
    let task = farm.add_task(plan.id(), ship_lot(lot, 5, a1)).await?;

    farm.transfers.finalize_plan(plan.id()).await?;
    let report = farm.transfers.execute_task(task.id()).await?;
    ensure!(report.relocation == RelocationKind::Shipped { record_deleted: false });
    ensure!(lot_quantity(&farm, lot).await? == Some(7));
    ensure!(farm.aquarium_state(a1).await?.total_fish() == 7);
    Ok(())
}

#[rstest]
#[case::one(1)]
#[case::half(10)]
#[case::all_but_one(19)]
#[tokio::test(flavor = "multi_thread")]
async fn split_quantities_sum_to_the_original(
    farm: Farm,
    #[case] moved: u32,
) -> eyre::Result<()> {
    let a1 = farm.aquarium("A1").await?;
    let a2 = farm.aquarium("A2").await?;
    let lot = farm.lot(a1, "Guppy", 20).await?;
    let plan = farm.plan("Split").await?;
    let task = farm.add_task(plan.id(), move_lot(lot, moved, a1, a2)).await?;

    farm.transfers.finalize_plan(plan.id()).await?;
    let report = farm.transfers.execute_task(task.id()).await?;
    let RelocationKind::Split { new_lot } = report.relocation else {
        bail!("expected a split, got {:?}", report.relocation);
    };
    let remainder = lot_quantity(&farm, lot).await?.unwrap_or_default();
    let split = lot_quantity(&farm, new_lot).await?.unwrap_or_default();
    ensure!(remainder + split == 20);
    ensure!(split == moved);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reception_instance_moves_whole(farm: Farm) -> eyre::Result<()> {
    let a1 = farm.aquarium("Q1").await?;
    let a2 = farm.aquarium("A2").await?;
    let instance = farm.reception_instance(a1, "Discus", 6).await?;
    let plan = farm.plan("Out of quarantine").await?;

    let partial = TransferDraft::new(
        FishRef::Reception(instance),
        2,
        a1,
        Destination::Aquarium(a2),
    );
    let Err(err) = farm.transfers.validate_task_warnings(plan.id(), &partial).await else {
        bail!("partial reception move was accepted");
    };
    ensure!(err.kind() == ErrorKind::Validation);

    let whole = TransferDraft::new(instance.into_inner(), 6, a1, Destination::Aquarium(a2));
    let task = farm.add_task(plan.id(), whole).await?;
    farm.transfers.finalize_plan(plan.id()).await?;
    let report = farm.transfers.execute_task(task.id()).await?;
    ensure!(report.relocation == RelocationKind::Reassigned);
    ensure!(farm.aquarium_state(a2).await?.total_fish() == 6);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn block_completion_policy_keeps_plan_open(farm: Farm) -> eyre::Result<()> {
    let config = PlanningConfig {
        cancelled_tasks: CancelledTaskPolicy::BlockCompletion,
        ..PlanningConfig::default()
    };
    let service = TransferPlanService::new(
        Arc::clone(&farm.store),
        Arc::clone(&farm.store),
        Arc::clone(&farm.store),
        Arc::new(DefaultClock),
    )
    .with_config(config);

    let a1 = farm.aquarium("A1").await?;
    let a2 = farm.aquarium("A2").await?;
    let lot = farm.lot(a1, "Guppy", 20).await?;
    let plan = farm.plan("Strict plan").await?;
    let kept = farm.add_task(plan.id(), move_lot(lot, 5, a1, a2)).await?;
    let dropped = farm.add_task(plan.id(), move_lot(lot, 5, a1, a2)).await?;

    service.block_task(dropped.id(), BlockReason::Size, None).await?;
    service.unblock_task(dropped.id(), UnblockAction::Cancel).await?;
    service.finalize_plan(plan.id()).await?;
    let report = service.execute_task(kept.id()).await?;

    ensure!(report.plan.status() == PlanStatus::InProgress);
    ensure!(report.plan.counters().completed_task_count() == 1);
    ensure!(report.plan.counters().cancelled_task_count() == 1);
    Ok(())
}
