//! Aquarium records and occupancy recomputation.

use super::{AquariumId, FarmId, ParseAquariumStatusError};
use crate::revision::{Revision, Revisioned};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operational status of an aquarium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AquariumStatus {
    /// No fish are assigned to the aquarium.
    Empty,
    /// At least one fish is assigned to the aquarium.
    Occupied,
    /// The aquarium is out of service for maintenance.
    Maintenance,
    /// The aquarium isolates fish under observation.
    Quarantine,
}

impl AquariumStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Occupied => "occupied",
            Self::Maintenance => "maintenance",
            Self::Quarantine => "quarantine",
        }
    }

    /// Returns whether the status is derived purely from the fish count.
    #[must_use]
    pub const fn is_occupancy_derived(self) -> bool {
        matches!(self, Self::Empty | Self::Occupied)
    }
}

impl fmt::Display for AquariumStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for AquariumStatus {
    type Error = ParseAquariumStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "empty" => Ok(Self::Empty),
            "occupied" => Ok(Self::Occupied),
            "maintenance" => Ok(Self::Maintenance),
            "quarantine" => Ok(Self::Quarantine),
            _ => Err(ParseAquariumStatusError(value.to_owned())),
        }
    }
}

/// An aquarium and its derived occupancy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aquarium {
    id: AquariumId,
    farm_id: FarmId,
    number: String,
    room: String,
    volume_litres: u32,
    status: AquariumStatus,
    total_fish: u32,
    revision: Revision,
}

/// Parameter object for reconstructing a persisted aquarium.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedAquariumData {
    /// Persisted aquarium identifier.
    pub id: AquariumId,
    /// Owning farm.
    pub farm_id: FarmId,
    /// Display number painted on the tank.
    pub number: String,
    /// Room the tank stands in.
    pub room: String,
    /// Water volume in litres.
    pub volume_litres: u32,
    /// Persisted status.
    pub status: AquariumStatus,
    /// Persisted derived fish count.
    pub total_fish: u32,
    /// Persisted revision.
    pub revision: Revision,
}

impl Aquarium {
    /// Creates an empty aquarium that has not been stored yet.
    #[must_use]
    pub fn new(
        farm_id: FarmId,
        number: impl Into<String>,
        room: impl Into<String>,
        volume_litres: u32,
    ) -> Self {
        Self {
            id: AquariumId::new(),
            farm_id,
            number: number.into(),
            room: room.into(),
            volume_litres,
            status: AquariumStatus::Empty,
            total_fish: 0,
            revision: Revision::UNSAVED,
        }
    }

    /// Reconstructs an aquarium from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedAquariumData) -> Self {
        Self {
            id: data.id,
            farm_id: data.farm_id,
            number: data.number,
            room: data.room,
            volume_litres: data.volume_litres,
            status: data.status,
            total_fish: data.total_fish,
            revision: data.revision,
        }
    }

    /// Returns the aquarium identifier.
    #[must_use]
    pub const fn id(&self) -> AquariumId {
        self.id
    }

    /// Returns the owning farm.
    #[must_use]
    pub const fn farm_id(&self) -> FarmId {
        self.farm_id
    }

    /// Returns the display number.
    #[must_use]
    pub fn number(&self) -> &str {
        &self.number
    }

    /// Returns the room name.
    #[must_use]
    pub fn room(&self) -> &str {
        &self.room
    }

    /// Returns the water volume in litres.
    #[must_use]
    pub const fn volume_litres(&self) -> u32 {
        self.volume_litres
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> AquariumStatus {
        self.status
    }

    /// Returns the derived number of fish assigned to the aquarium.
    #[must_use]
    pub const fn total_fish(&self) -> u32 {
        self.total_fish
    }

    /// Returns whether fish are currently assigned to the aquarium.
    #[must_use]
    pub const fn holds_fish(&self) -> bool {
        self.total_fish > 0
    }

    /// Places the aquarium in a non-derived status such as maintenance.
    pub const fn set_status(&mut self, status: AquariumStatus) {
        self.status = status;
    }

    /// Returns a copy carrying `total_fish` as its occupancy.
    ///
    /// The status flips between `empty` and `occupied` only while it is one
    /// of those two; maintenance and quarantine are left alone.
    #[must_use]
    pub fn with_occupancy(&self, total_fish: u32) -> Self {
        let status = if self.status.is_occupancy_derived() {
            if total_fish > 0 {
                AquariumStatus::Occupied
            } else {
                AquariumStatus::Empty
            }
        } else {
            self.status
        };

        Self {
            total_fish,
            status,
            ..self.clone()
        }
    }
}

impl Revisioned for Aquarium {
    fn revision(&self) -> Revision {
        self.revision
    }

    fn stamp_revision(&mut self, revision: Revision) {
        self.revision = revision;
    }
}
