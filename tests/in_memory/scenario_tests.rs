//! End-to-end transfer plans against seeded inventory.

use super::helpers::{Farm, move_lot};
use aquaroute::inventory::domain::AquariumStatus;
use aquaroute::relocation::RelocationKind;
use aquaroute::transfer::domain::{PlanStatus, TransferTaskStatus, WarningKind};
use aquaroute::transfer::services::{AddTaskOutcome, AddTransferTaskRequest};
use eyre::{bail, ensure};
use rstest::{fixture, rstest};

#[fixture]
fn farm() -> Farm {
    Farm::default()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn whole_lot_move_empties_the_source_and_completes_the_plan(farm: Farm) -> eyre::Result<()> {
    let a1 = farm.aquarium("A1").await?;
    let a2 = farm.aquarium("A2").await?;
    let lot = farm.lot(a1, "Neon tetra", 10).await?;

    let plan = farm.plan("Move tetras").await?;
    let task = farm.add_task(plan.id(), move_lot(lot, 10, a1, a2)).await?;
    farm.transfers.finalize_plan(plan.id()).await?;
    let report = farm.transfers.execute_task(task.id()).await?;

    ensure!(report.relocation == RelocationKind::Reassigned);
    ensure!(report.task.status() == TransferTaskStatus::Completed);
    ensure!(report.task.executed_at().is_some());

    let source = farm.aquarium_state(a1).await?;
    let target = farm.aquarium_state(a2).await?;
    ensure!(source.total_fish() == 0 && source.status() == AquariumStatus::Empty);
    ensure!(target.total_fish() == 10 && target.status() == AquariumStatus::Occupied);

    let stored_lot = farm.lot_state(lot).await?;
    ensure!(stored_lot.and_then(|row| row.aquarium_id()) == Some(a2));

    let stored_plan = farm.transfers.get_plan(plan.id()).await?;
    ensure!(stored_plan.status() == PlanStatus::Completed);
    ensure!(stored_plan.counters().completed_task_count() == 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn partial_move_into_occupied_tank_warns_then_splits(farm: Farm) -> eyre::Result<()> {
    let a1 = farm.aquarium("A1").await?;
    let a2 = farm.aquarium("A2").await?;
    let lot = farm.lot(a1, "Guppy", 20).await?;
    farm.lot(a2, "Platy", 3).await?;

    let plan = farm.plan("Thin out A1").await?;
    let first = farm
        .transfers
        .add_task(AddTransferTaskRequest::new(plan.id(), move_lot(lot, 5, a1, a2)))
        .await?;
    let AddTaskOutcome::ConfirmationRequired { warnings } = first else {
        bail!("expected a confirmation request, got {first:?}");
    };
    ensure!(warnings.iter().any(|warning| warning.kind == WarningKind::TargetOccupied));
    ensure!(farm.transfers.get_tasks(plan.id()).await?.is_empty());

    let task = farm.add_task(plan.id(), move_lot(lot, 5, a1, a2)).await?;
    farm.transfers.finalize_plan(plan.id()).await?;
    let report = farm.transfers.execute_task(task.id()).await?;
    let RelocationKind::Split { new_lot } = report.relocation else {
        bail!("expected a split, got {:?}", report.relocation);
    };

    let remainder = farm.lot_state(lot).await?;
    ensure!(remainder.as_ref().map(|row| row.quantity()) == Some(15));
    ensure!(remainder.and_then(|row| row.aquarium_id()) == Some(a1));

    let split = farm.lot_state(new_lot).await?;
    ensure!(split.as_ref().map(|row| row.quantity()) == Some(5));
    ensure!(split.as_ref().and_then(|row| row.aquarium_id()) == Some(a2));
    ensure!(split.is_some_and(|row| row.descriptor().name() == "Guppy"));

    ensure!(farm.aquarium_state(a1).await?.total_fish() == 15);
    ensure!(farm.aquarium_state(a2).await?.total_fish() == 8);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn multi_task_plan_moves_through_progress_to_completion(farm: Farm) -> eyre::Result<()> {
    let a1 = farm.aquarium("A1").await?;
    let a2 = farm.aquarium("A2").await?;
    let a3 = farm.aquarium("A3").await?;
    let guppies = farm.lot(a1, "Guppy", 12).await?;
    let tetras = farm.lot(a2, "Neon tetra", 6).await?;

    let plan = farm.plan("Rotate tanks").await?;
    let first = farm.add_task(plan.id(), move_lot(guppies, 12, a1, a3)).await?;
    let second = farm.add_task(plan.id(), move_lot(tetras, 6, a2, a1)).await?;
    ensure!(first.order() == 0 && second.order() == 1);

    farm.transfers.finalize_plan(plan.id()).await?;
    farm.transfers.start_task(first.id()).await?;
    ensure!(farm.transfers.get_plan(plan.id()).await?.status() == PlanStatus::InProgress);

    let after_first = farm.transfers.execute_task(first.id()).await?;
    ensure!(after_first.plan.status() == PlanStatus::InProgress);
    let after_second = farm.transfers.execute_task(second.id()).await?;
    ensure!(after_second.plan.status() == PlanStatus::Completed);

    ensure!(farm.aquarium_state(a1).await?.total_fish() == 6);
    ensure!(farm.aquarium_state(a2).await?.status() == AquariumStatus::Empty);
    ensure!(farm.aquarium_state(a3).await?.total_fish() == 12);
    Ok(())
}
