//! Pure bookkeeping of where fish are assigned during a relocation.

use crate::inventory::domain::{AquariumId, FishRef, FishStock};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Position {
    aquarium_id: Option<AquariumId>,
    quantity: u32,
}

/// Stock positions for the aquariums a relocation touches.
///
/// The ledger is seeded with the stock currently assigned to those
/// aquariums, receives the relocation's changes, and then answers the
/// recomputed occupancy of each aquarium.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockLedger {
    positions: HashMap<FishRef, Position>,
}

impl StockLedger {
    /// Seeds a ledger from stock records; later duplicates replace earlier
    /// ones.
    #[must_use]
    pub fn from_stock<'a>(stock: impl IntoIterator<Item = &'a FishStock>) -> Self {
        let mut ledger = Self::default();
        for record in stock {
            ledger.record(record.fish_ref(), record.aquarium_id(), record.quantity());
        }
        ledger
    }

    /// Sets the position of a stock record.
    pub fn record(&mut self, fish: FishRef, aquarium_id: Option<AquariumId>, quantity: u32) {
        self.positions.insert(
            fish,
            Position {
                aquarium_id,
                quantity,
            },
        );
    }

    /// Drops a deleted stock record.
    pub fn remove(&mut self, fish: FishRef) {
        self.positions.remove(&fish);
    }

    /// Returns the number of fish assigned to an aquarium.
    #[must_use]
    pub fn total_in(&self, aquarium_id: AquariumId) -> u32 {
        let total: u64 = self
            .positions
            .values()
            .filter(|position| position.aquarium_id == Some(aquarium_id))
            .map(|position| u64::from(position.quantity))
            .sum();
        u32::try_from(total).unwrap_or(u32::MAX)
    }
}
