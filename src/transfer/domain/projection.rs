//! Speculative net-flow occupancy computed from a plan's active tasks.

use super::TransferTask;
use crate::inventory::domain::AquariumId;
use std::collections::HashMap;

/// Projected flows for one aquarium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AquariumProjection {
    /// Fish that active tasks will take out of the aquarium.
    pub pending_removals: u64,
    /// Fish that active tasks will bring into the aquarium.
    pub pending_additions: u64,
}

impl AquariumProjection {
    /// Returns whether any active task removes fish from the aquarium.
    ///
    /// Deliberately conservative: a single removed fish trips the flag
    /// whatever the aquarium's remaining stock.
    #[must_use]
    pub const fn will_be_empty(self) -> bool {
        self.pending_removals > 0
    }

    /// Returns whether any active task brings fish into the aquarium.
    #[must_use]
    pub const fn will_be_occupied(self) -> bool {
        self.pending_additions > 0
    }
}

/// Per-aquarium projection over pending and in-progress tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OccupancyProjection {
    aquariums: HashMap<AquariumId, AquariumProjection>,
}

impl OccupancyProjection {
    /// Sums the flows of every pending or in-progress task.
    ///
    /// Shipments only count as removals from their source.
    #[must_use]
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a TransferTask>) -> Self {
        let mut projection = Self::default();
        for task in tasks.into_iter().filter(|task| task.status().is_active()) {
            let payload = task.payload();
            let quantity = u64::from(payload.quantity().get());
            projection
                .aquariums
                .entry(payload.source())
                .or_default()
                .pending_removals += quantity;
            if let Some(target) = payload.destination().aquarium() {
                projection.aquariums.entry(target).or_default().pending_additions += quantity;
            }
        }
        projection
    }

    /// Returns the projection for an aquarium; untouched aquariums project
    /// no flow.
    #[must_use]
    pub fn aquarium(&self, id: AquariumId) -> AquariumProjection {
        self.aquariums.get(&id).copied().unwrap_or_default()
    }

    /// Returns the number of aquariums with projected flow.
    #[must_use]
    pub fn len(&self) -> usize {
        self.aquariums.len()
    }

    /// Returns whether no aquarium has projected flow.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.aquariums.is_empty()
    }
}
