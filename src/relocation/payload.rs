//! Transfer payloads shared by transfer tasks and checklist tasks.

use crate::inventory::domain::{AquariumId, FishDescriptor, FishRef, Quantity};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// String form of [`Destination::Shipment`].
pub const SHIPMENT_SENTINEL: &str = "shipment";

/// Where transferred fish end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "aquarium_id", rename_all = "snake_case")]
pub enum Destination {
    /// Another aquarium on the farm.
    Aquarium(AquariumId),
    /// The fish leave the farm.
    Shipment,
}

impl Destination {
    /// Returns the target aquarium, or `None` for shipments.
    #[must_use]
    pub const fn aquarium(self) -> Option<AquariumId> {
        match self {
            Self::Aquarium(id) => Some(id),
            Self::Shipment => None,
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Aquarium(id) => write!(f, "{id}"),
            Self::Shipment => f.write_str(SHIPMENT_SENTINEL),
        }
    }
}

impl TryFrom<&str> for Destination {
    type Error = uuid::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case(SHIPMENT_SENTINEL) {
            return Ok(Self::Shipment);
        }
        Uuid::parse_str(trimmed).map(|uuid| Self::Aquarium(AquariumId::from_uuid(uuid)))
    }
}

/// How a caller identifies the fish to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FishSelector {
    /// The record kind is already known.
    Tagged(FishRef),
    /// Only the raw identifier is known; the catalog is tried first, then
    /// reception instances.
    Untagged(Uuid),
}

impl From<FishRef> for FishSelector {
    fn from(fish: FishRef) -> Self {
        Self::Tagged(fish)
    }
}

impl From<Uuid> for FishSelector {
    fn from(raw: Uuid) -> Self {
        Self::Untagged(raw)
    }
}

/// Caller input describing a relocation before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferDraft {
    /// Fish to move.
    pub fish: FishSelector,
    /// Number of fish to move.
    pub quantity: u32,
    /// Aquarium the fish currently live in.
    pub source: AquariumId,
    /// Target aquarium or shipment.
    pub destination: Destination,
    /// Whether the operator accepts mixing with fish already at the target.
    pub allow_mixing: bool,
    /// Free-form notes.
    pub notes: Option<String>,
}

impl TransferDraft {
    /// Creates a draft that does not allow mixing.
    #[must_use]
    pub fn new(
        fish: impl Into<FishSelector>,
        quantity: u32,
        source: AquariumId,
        destination: Destination,
    ) -> Self {
        Self {
            fish: fish.into(),
            quantity,
            source,
            destination,
            allow_mixing: false,
            notes: None,
        }
    }

    /// Allows the fish to share the target aquarium with other stock.
    #[must_use]
    pub const fn allowing_mixing(mut self) -> Self {
        self.allow_mixing = true;
        self
    }

    /// Sets the notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Validated relocation stored on a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferPayload {
    fish: FishRef,
    descriptor: FishDescriptor,
    quantity: Quantity,
    source: AquariumId,
    destination: Destination,
    allow_mixing: bool,
    notes: Option<String>,
}

impl TransferPayload {
    pub(crate) fn new(
        fish: FishRef,
        descriptor: FishDescriptor,
        quantity: Quantity,
        draft: &TransferDraft,
    ) -> Self {
        let notes = draft
            .notes
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_owned);
        Self {
            fish,
            descriptor,
            quantity,
            source: draft.source,
            destination: draft.destination,
            allow_mixing: draft.allow_mixing,
            notes,
        }
    }

    /// Returns the tagged fish reference.
    #[must_use]
    pub const fn fish(&self) -> FishRef {
        self.fish
    }

    /// Returns the fish display fields captured at creation time.
    #[must_use]
    pub const fn descriptor(&self) -> &FishDescriptor {
        &self.descriptor
    }

    /// Returns the number of fish to move.
    #[must_use]
    pub const fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// Returns the source aquarium.
    #[must_use]
    pub const fn source(&self) -> AquariumId {
        self.source
    }

    /// Returns the destination.
    #[must_use]
    pub const fn destination(&self) -> Destination {
        self.destination
    }

    /// Returns whether mixing at the target was accepted.
    #[must_use]
    pub const fn allow_mixing(&self) -> bool {
        self.allow_mixing
    }

    /// Returns the notes, if any.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}
