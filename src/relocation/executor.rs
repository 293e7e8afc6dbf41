//! Inventory reads behind relocation preparation and execution.

use super::{
    Destination, FishSelector, RelocationEffects, RelocationError, RelocationSnapshot,
    TransferDraft, TransferPayload, plan_relocation,
};
use crate::inventory::{
    domain::{Aquarium, AquariumId, FishRef, FishStock, LotId, Quantity, ReceptionInstanceId},
    ports::{InventoryRepository, InventoryRepositoryError},
};
use std::sync::Arc;
use tracing::debug;

/// Resolves fish references and computes relocation writes.
#[derive(Clone)]
pub struct RelocationExecutor<I>
where
    I: InventoryRepository,
{
    inventory: Arc<I>,
}

impl<I> RelocationExecutor<I>
where
    I: InventoryRepository,
{
    /// Creates an executor reading from `inventory`.
    #[must_use]
    pub const fn new(inventory: Arc<I>) -> Self {
        Self { inventory }
    }

    /// Resolves a selector to the stock record it names.
    ///
    /// Untagged identifiers are looked up as catalog lots first; a missing
    /// lot or a denied catalog read falls back to reception instances.
    ///
    /// # Errors
    ///
    /// Returns [`RelocationError::FishNotFound`] when no record matches, or
    /// repository errors other than a denied catalog read.
    pub async fn resolve(&self, selector: FishSelector) -> Result<FishStock, RelocationError> {
        match selector {
            FishSelector::Tagged(fish) => self.load(fish).await,
            FishSelector::Untagged(raw) => {
                match self.inventory.find_lot(LotId::from_uuid(raw)).await {
                    Ok(Some(lot)) => return Ok(FishStock::Catalog(lot)),
                    Ok(None) => debug!(fish_id = %raw, "no catalog lot, probing reception instances"),
                    Err(InventoryRepositoryError::AccessDenied(scope)) => {
                        debug!(fish_id = %raw, %scope, "catalog read denied, probing reception instances");
                    }
                    Err(err) => return Err(err.into()),
                }
                self.inventory
                    .find_reception_instance(ReceptionInstanceId::from_uuid(raw))
                    .await?
                    .map(FishStock::Reception)
                    .ok_or(RelocationError::FishNotFound(raw))
            }
        }
    }

    /// Loads the record behind a tagged reference.
    ///
    /// # Errors
    ///
    /// Returns [`RelocationError::FishNotFound`] when the record is gone.
    pub async fn load(&self, fish: FishRef) -> Result<FishStock, RelocationError> {
        let stock = match fish {
            FishRef::Catalog(id) => self.inventory.find_lot(id).await?.map(FishStock::Catalog),
            FishRef::Reception(id) => self
                .inventory
                .find_reception_instance(id)
                .await?
                .map(FishStock::Reception),
        };
        stock.ok_or_else(|| RelocationError::FishNotFound(fish.raw_id()))
    }

    /// Validates a draft against live inventory and tags its fish reference.
    ///
    /// # Errors
    ///
    /// Returns [`RelocationError`] when the quantity is zero, source and
    /// target coincide, a record is missing, the fish are not in the source
    /// aquarium, the quantity exceeds what is available, or a reception
    /// instance would be split.
    pub async fn prepare(&self, draft: &TransferDraft) -> Result<TransferPayload, RelocationError> {
        let quantity = Quantity::new(draft.quantity)?;
        if draft.destination == Destination::Aquarium(draft.source) {
            return Err(RelocationError::SameSourceAndTarget(draft.source));
        }
        self.require_aquarium(draft.source).await?;
        if let Some(target_id) = draft.destination.aquarium() {
            self.require_aquarium(target_id).await?;
        }

        let stock = self.resolve(draft.fish).await?;
        let fish = stock.fish_ref();
        if stock.aquarium_id() != Some(draft.source) {
            return Err(RelocationError::FishNotInSource {
                fish,
                source_aquarium: draft.source,
            });
        }
        if stock.quantity() < quantity.get() {
            return Err(RelocationError::InsufficientQuantity {
                fish,
                requested: quantity,
                available: stock.quantity(),
            });
        }
        if let (FishStock::Reception(instance), Destination::Aquarium(_)) =
            (&stock, draft.destination)
            && instance.current_quantity() != quantity.get()
        {
            return Err(RelocationError::ReceptionInstanceNotSplittable {
                fish,
                requested: quantity,
                available: instance.current_quantity(),
            });
        }

        Ok(TransferPayload::new(
            fish,
            stock.descriptor().clone(),
            quantity,
            draft,
        ))
    }

    /// Re-reads inventory and computes the writes that carry out `payload`.
    ///
    /// # Errors
    ///
    /// Returns [`RelocationError`] when a record is missing or inventory
    /// changed since the payload was prepared so that it no longer applies.
    pub async fn relocate(
        &self,
        payload: &TransferPayload,
    ) -> Result<RelocationEffects, RelocationError> {
        let stock = self.load(payload.fish()).await?;
        let source = self.require_aquarium(payload.source()).await?;
        let mut resident_stock = self.inventory.stock_in_aquarium(source.id()).await?;

        let target = match payload.destination().aquarium() {
            Some(target_id) => {
                let target = self.require_aquarium(target_id).await?;
                resident_stock.extend(self.inventory.stock_in_aquarium(target_id).await?);
                Some(target)
            }
            None => None,
        };

        let effects = plan_relocation(
            payload,
            RelocationSnapshot {
                stock,
                source,
                target,
                resident_stock,
            },
        )?;
        debug!(
            fish = %payload.fish(),
            kind = ?effects.kind(),
            source_total = effects.source_total(),
            target_total = ?effects.target_total(),
            "relocation planned"
        );
        Ok(effects)
    }

    async fn require_aquarium(&self, id: AquariumId) -> Result<Aquarium, RelocationError> {
        self.inventory
            .find_aquarium(id)
            .await?
            .ok_or(RelocationError::AquariumNotFound(id))
    }
}
