//! Pure computation of the writes a relocation performs.

use super::{Destination, RelocationError, StockLedger, TransferPayload};
use crate::inventory::domain::{Aquarium, FishRef, FishStock, LotId};
use crate::revision::Revisioned;
use crate::store::WriteOp;

/// What a relocation did to the moved stock record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelocationKind {
    /// Fish left the farm.
    Shipped {
        /// Whether the record was deleted because no fish remained.
        record_deleted: bool,
    },
    /// The whole record was reassigned to the target aquarium.
    Reassigned,
    /// Part of a catalog lot was split into a new lot at the target.
    Split {
        /// Lot created at the target aquarium.
        new_lot: LotId,
    },
}

/// Fresh reads a relocation is computed from.
#[derive(Debug, Clone)]
pub struct RelocationSnapshot {
    /// The stock record being moved.
    pub stock: FishStock,
    /// The source aquarium.
    pub source: Aquarium,
    /// The target aquarium; `None` for shipments.
    pub target: Option<Aquarium>,
    /// Every stock record assigned to the source or target aquarium.
    pub resident_stock: Vec<FishStock>,
}

/// Writes and outcome of a planned relocation.
#[derive(Debug, Clone)]
pub struct RelocationEffects {
    kind: RelocationKind,
    ops: Vec<WriteOp>,
    source_total: u32,
    target_total: Option<u32>,
}

impl RelocationEffects {
    /// Returns what happened to the moved record.
    #[must_use]
    pub const fn kind(&self) -> RelocationKind {
        self.kind
    }

    /// Returns the write operations in application order.
    #[must_use]
    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    /// Consumes the effects, yielding the write operations.
    #[must_use]
    pub fn into_ops(self) -> Vec<WriteOp> {
        self.ops
    }

    /// Returns the source aquarium's recomputed fish count.
    #[must_use]
    pub const fn source_total(&self) -> u32 {
        self.source_total
    }

    /// Returns the target aquarium's recomputed fish count, if any.
    #[must_use]
    pub const fn target_total(&self) -> Option<u32> {
        self.target_total
    }
}

/// Computes the writes that carry out `payload` against `snapshot`.
///
/// # Errors
///
/// Returns [`RelocationError`] when the snapshot no longer satisfies the
/// payload: the fish moved away from the source, hold fewer fish than
/// requested, or a reception instance would have to be split.
pub fn plan_relocation(
    payload: &TransferPayload,
    snapshot: RelocationSnapshot,
) -> Result<RelocationEffects, RelocationError> {
    let RelocationSnapshot {
        stock,
        source,
        target,
        resident_stock,
    } = snapshot;
    let fish = stock.fish_ref();
    let requested = payload.quantity();

    if stock.aquarium_id() != Some(source.id()) {
        return Err(RelocationError::FishNotInSource {
            fish,
            source_aquarium: source.id(),
        });
    }
    if stock.quantity() < requested.get() {
        return Err(RelocationError::InsufficientQuantity {
            fish,
            requested,
            available: stock.quantity(),
        });
    }

    let mut ledger = StockLedger::from_stock(resident_stock.iter().chain([&stock]));
    let mut ops = Vec::with_capacity(4);

    let kind = match (payload.destination(), stock) {
        (Destination::Shipment, FishStock::Catalog(mut lot)) => {
            let remaining = lot.deduct(requested)?;
            if remaining == 0 {
                ops.push(WriteOp::DeleteLot {
                    id: lot.id(),
                    revision: lot.revision(),
                });
                ledger.remove(fish);
            } else {
                ledger.record(fish, lot.aquarium_id(), remaining);
                ops.push(WriteOp::PutLot(lot));
            }
            RelocationKind::Shipped {
                record_deleted: remaining == 0,
            }
        }
        (Destination::Shipment, FishStock::Reception(mut instance)) => {
            let remaining = instance.deduct(requested)?;
            if remaining == 0 {
                ops.push(WriteOp::DeleteReceptionInstance {
                    id: instance.id(),
                    revision: instance.revision(),
                });
                ledger.remove(fish);
            } else {
                ledger.record(fish, instance.aquarium_id(), remaining);
                ops.push(WriteOp::PutReceptionInstance(instance));
            }
            RelocationKind::Shipped {
                record_deleted: remaining == 0,
            }
        }
        (Destination::Aquarium(target_id), _) if target_id == source.id() => {
            return Err(RelocationError::SameSourceAndTarget(target_id));
        }
        (Destination::Aquarium(target_id), FishStock::Reception(mut instance)) => {
            if instance.current_quantity() != requested.get() {
                return Err(RelocationError::ReceptionInstanceNotSplittable {
                    fish,
                    requested,
                    available: instance.current_quantity(),
                });
            }
            instance.reassign(target_id);
            ledger.record(fish, Some(target_id), instance.current_quantity());
            ops.push(WriteOp::PutReceptionInstance(instance));
            RelocationKind::Reassigned
        }
        (Destination::Aquarium(target_id), FishStock::Catalog(mut lot)) => {
            if lot.quantity() == requested.get() {
                lot.reassign(target_id);
                ledger.record(fish, Some(target_id), lot.quantity());
                ops.push(WriteOp::PutLot(lot));
                RelocationKind::Reassigned
            } else {
                let split = lot.split_off(requested, target_id)?;
                let new_lot = split.id();
                ledger.record(fish, lot.aquarium_id(), lot.quantity());
                ledger.record(FishRef::Catalog(new_lot), Some(target_id), split.quantity());
                ops.push(WriteOp::PutLot(lot));
                ops.push(WriteOp::PutLot(split));
                RelocationKind::Split { new_lot }
            }
        }
    };

    let source_total = ledger.total_in(source.id());
    ops.push(WriteOp::PutAquarium(source.with_occupancy(source_total)));

    let target_total = match (payload.destination(), target) {
        (Destination::Aquarium(target_id), Some(target_aquarium))
            if target_aquarium.id() == target_id =>
        {
            let total = ledger.total_in(target_id);
            ops.push(WriteOp::PutAquarium(target_aquarium.with_occupancy(total)));
            Some(total)
        }
        (Destination::Aquarium(target_id), _) => {
            return Err(RelocationError::AquariumNotFound(target_id));
        }
        (Destination::Shipment, _) => None,
    };

    Ok(RelocationEffects {
        kind,
        ops,
        source_total,
        target_total,
    })
}
