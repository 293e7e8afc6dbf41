//! Fish stock records: catalog lots and reception instances.

use super::{AquariumId, FarmId, InventoryDomainError, LotId, Quantity, ReceptionId, ReceptionInstanceId};
use crate::revision::{Revision, Revisioned};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Display fields describing the fish held by a stock record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FishDescriptor {
    name: String,
    scientific_name: Option<String>,
    size: Option<String>,
}

impl FishDescriptor {
    /// Creates a descriptor from the common name.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryDomainError::EmptyFishName`] when the name is blank.
    pub fn new(name: impl Into<String>) -> Result<Self, InventoryDomainError> {
        let raw = name.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(InventoryDomainError::EmptyFishName);
        }
        Ok(Self {
            name: trimmed.to_owned(),
            scientific_name: None,
            size: None,
        })
    }

    /// Sets the scientific name.
    #[must_use]
    pub fn with_scientific_name(mut self, scientific_name: impl Into<String>) -> Self {
        self.scientific_name = Some(scientific_name.into());
        self
    }

    /// Sets the size grade.
    #[must_use]
    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    /// Returns the common name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the scientific name, if known.
    #[must_use]
    pub fn scientific_name(&self) -> Option<&str> {
        self.scientific_name.as_deref()
    }

    /// Returns the size grade, if known.
    #[must_use]
    pub fn size(&self) -> Option<&str> {
        self.size.as_deref()
    }
}

/// Which kind of stock record a fish reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FishKind {
    /// A locally-owned, splittable catalog lot.
    Catalog,
    /// A single-assignment instance admitted from a shipment.
    Reception,
}

impl FishKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Catalog => "catalog",
            Self::Reception => "reception",
        }
    }
}

/// Tagged reference to exactly one stock record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum FishRef {
    /// Reference to a catalog lot.
    Catalog(LotId),
    /// Reference to a reception instance.
    Reception(ReceptionInstanceId),
}

impl FishRef {
    /// Returns the referenced record kind.
    #[must_use]
    pub const fn kind(self) -> FishKind {
        match self {
            Self::Catalog(_) => FishKind::Catalog,
            Self::Reception(_) => FishKind::Reception,
        }
    }

    /// Returns the raw identifier regardless of kind.
    #[must_use]
    pub const fn raw_id(self) -> Uuid {
        match self {
            Self::Catalog(id) => id.into_inner(),
            Self::Reception(id) => id.into_inner(),
        }
    }
}

impl fmt::Display for FishRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind().as_str(), self.raw_id())
    }
}

/// A locally-owned quantity of one fish type and size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogLot {
    id: LotId,
    farm_id: FarmId,
    descriptor: FishDescriptor,
    quantity: u32,
    aquarium_id: Option<AquariumId>,
    revision: Revision,
}

/// Parameter object for reconstructing a persisted catalog lot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedCatalogLotData {
    /// Persisted lot identifier.
    pub id: LotId,
    /// Owning farm.
    pub farm_id: FarmId,
    /// Persisted display fields.
    pub descriptor: FishDescriptor,
    /// Persisted fish count.
    pub quantity: u32,
    /// Aquarium the lot is assigned to, if any.
    pub aquarium_id: Option<AquariumId>,
    /// Persisted revision.
    pub revision: Revision,
}

impl CatalogLot {
    /// Creates a lot assigned to `aquarium_id`.
    #[must_use]
    pub fn new(
        farm_id: FarmId,
        descriptor: FishDescriptor,
        quantity: Quantity,
        aquarium_id: AquariumId,
    ) -> Self {
        Self {
            id: LotId::new(),
            farm_id,
            descriptor,
            quantity: quantity.get(),
            aquarium_id: Some(aquarium_id),
            revision: Revision::UNSAVED,
        }
    }

    /// Reconstructs a lot from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedCatalogLotData) -> Self {
        Self {
            id: data.id,
            farm_id: data.farm_id,
            descriptor: data.descriptor,
            quantity: data.quantity,
            aquarium_id: data.aquarium_id,
            revision: data.revision,
        }
    }

    /// Returns the lot identifier.
    #[must_use]
    pub const fn id(&self) -> LotId {
        self.id
    }

    /// Returns the owning farm.
    #[must_use]
    pub const fn farm_id(&self) -> FarmId {
        self.farm_id
    }

    /// Returns the display fields.
    #[must_use]
    pub const fn descriptor(&self) -> &FishDescriptor {
        &self.descriptor
    }

    /// Returns the fish count.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Returns the assigned aquarium, if any.
    #[must_use]
    pub const fn aquarium_id(&self) -> Option<AquariumId> {
        self.aquarium_id
    }

    /// Moves the whole lot to another aquarium.
    pub const fn reassign(&mut self, aquarium_id: AquariumId) {
        self.aquarium_id = Some(aquarium_id);
    }

    /// Removes `amount` fish and returns how many remain.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryDomainError::InsufficientQuantity`] when the lot
    /// holds fewer than `amount` fish.
    pub fn deduct(&mut self, amount: Quantity) -> Result<u32, InventoryDomainError> {
        self.quantity = deduct_from(self.quantity, amount)?;
        Ok(self.quantity)
    }

    /// Splits `amount` fish off into a new lot assigned to `destination`.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryDomainError::InsufficientQuantity`] when the lot is
    /// too small and [`InventoryDomainError::SplitWouldEmptyLot`] when the
    /// split would take every fish.
    pub fn split_off(
        &mut self,
        amount: Quantity,
        destination: AquariumId,
    ) -> Result<Self, InventoryDomainError> {
        if amount.get() == self.quantity {
            return Err(InventoryDomainError::SplitWouldEmptyLot {
                lot_id: self.id,
                requested: amount,
            });
        }
        self.quantity = deduct_from(self.quantity, amount)?;
        Ok(Self::new(
            self.farm_id,
            self.descriptor.clone(),
            amount,
            destination,
        ))
    }
}

impl Revisioned for CatalogLot {
    fn revision(&self) -> Revision {
        self.revision
    }

    fn stamp_revision(&mut self, revision: Revision) {
        self.revision = revision;
    }
}

/// Fish admitted from an external shipment; never split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceptionInstance {
    id: ReceptionInstanceId,
    reception_id: ReceptionId,
    farm_id: FarmId,
    descriptor: FishDescriptor,
    current_quantity: u32,
    aquarium_id: Option<AquariumId>,
    revision: Revision,
}

/// Parameter object for reconstructing a persisted reception instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedReceptionInstanceData {
    /// Persisted instance identifier.
    pub id: ReceptionInstanceId,
    /// Reception the instance was admitted with.
    pub reception_id: ReceptionId,
    /// Owning farm.
    pub farm_id: FarmId,
    /// Persisted display fields.
    pub descriptor: FishDescriptor,
    /// Persisted live fish count.
    pub current_quantity: u32,
    /// Aquarium the instance is assigned to, if any.
    pub aquarium_id: Option<AquariumId>,
    /// Persisted revision.
    pub revision: Revision,
}

impl ReceptionInstance {
    /// Creates an instance admitted into `aquarium_id`.
    #[must_use]
    pub fn new(
        reception_id: ReceptionId,
        farm_id: FarmId,
        descriptor: FishDescriptor,
        quantity: Quantity,
        aquarium_id: AquariumId,
    ) -> Self {
        Self {
            id: ReceptionInstanceId::new(),
            reception_id,
            farm_id,
            descriptor,
            current_quantity: quantity.get(),
            aquarium_id: Some(aquarium_id),
            revision: Revision::UNSAVED,
        }
    }

    /// Reconstructs an instance from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedReceptionInstanceData) -> Self {
        Self {
            id: data.id,
            reception_id: data.reception_id,
            farm_id: data.farm_id,
            descriptor: data.descriptor,
            current_quantity: data.current_quantity,
            aquarium_id: data.aquarium_id,
            revision: data.revision,
        }
    }

    /// Returns the instance identifier.
    #[must_use]
    pub const fn id(&self) -> ReceptionInstanceId {
        self.id
    }

    /// Returns the reception the instance arrived with.
    #[must_use]
    pub const fn reception_id(&self) -> ReceptionId {
        self.reception_id
    }

    /// Returns the owning farm.
    #[must_use]
    pub const fn farm_id(&self) -> FarmId {
        self.farm_id
    }

    /// Returns the display fields.
    #[must_use]
    pub const fn descriptor(&self) -> &FishDescriptor {
        &self.descriptor
    }

    /// Returns the live fish count.
    #[must_use]
    pub const fn current_quantity(&self) -> u32 {
        self.current_quantity
    }

    /// Returns the assigned aquarium, if any.
    #[must_use]
    pub const fn aquarium_id(&self) -> Option<AquariumId> {
        self.aquarium_id
    }

    /// Moves the instance to another aquarium.
    pub const fn reassign(&mut self, aquarium_id: AquariumId) {
        self.aquarium_id = Some(aquarium_id);
    }

    /// Removes `amount` fish and returns how many remain.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryDomainError::InsufficientQuantity`] when the
    /// instance holds fewer than `amount` fish.
    pub fn deduct(&mut self, amount: Quantity) -> Result<u32, InventoryDomainError> {
        self.current_quantity = deduct_from(self.current_quantity, amount)?;
        Ok(self.current_quantity)
    }
}

impl Revisioned for ReceptionInstance {
    fn revision(&self) -> Revision {
        self.revision
    }

    fn stamp_revision(&mut self, revision: Revision) {
        self.revision = revision;
    }
}

/// A resolved stock record of either kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FishStock {
    /// A catalog lot.
    Catalog(CatalogLot),
    /// A reception instance.
    Reception(ReceptionInstance),
}

impl FishStock {
    /// Returns the tagged reference to this record.
    #[must_use]
    pub const fn fish_ref(&self) -> FishRef {
        match self {
            Self::Catalog(lot) => FishRef::Catalog(lot.id()),
            Self::Reception(instance) => FishRef::Reception(instance.id()),
        }
    }

    /// Returns the live fish count.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        match self {
            Self::Catalog(lot) => lot.quantity(),
            Self::Reception(instance) => instance.current_quantity(),
        }
    }

    /// Returns the assigned aquarium, if any.
    #[must_use]
    pub const fn aquarium_id(&self) -> Option<AquariumId> {
        match self {
            Self::Catalog(lot) => lot.aquarium_id(),
            Self::Reception(instance) => instance.aquarium_id(),
        }
    }

    /// Returns the display fields.
    #[must_use]
    pub const fn descriptor(&self) -> &FishDescriptor {
        match self {
            Self::Catalog(lot) => lot.descriptor(),
            Self::Reception(instance) => instance.descriptor(),
        }
    }

    /// Returns the owning farm.
    #[must_use]
    pub const fn farm_id(&self) -> FarmId {
        match self {
            Self::Catalog(lot) => lot.farm_id(),
            Self::Reception(instance) => instance.farm_id(),
        }
    }
}

fn deduct_from(available: u32, amount: Quantity) -> Result<u32, InventoryDomainError> {
    available
        .checked_sub(amount.get())
        .ok_or(InventoryDomainError::InsufficientQuantity {
            requested: amount,
            available,
        })
}
