//! Read port for aquariums and the stock assigned to them.

use crate::inventory::domain::{
    Aquarium, AquariumId, CatalogLot, FishStock, LotId, ReceptionInstance, ReceptionInstanceId,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for inventory repository operations.
pub type InventoryRepositoryResult<T> = Result<T, InventoryRepositoryError>;

/// Inventory lookup contract.
///
/// Listing methods are indexed by aquarium; implementations must not load
/// the whole inventory to answer them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    /// Finds an aquarium by identifier.
    async fn find_aquarium(&self, id: AquariumId) -> InventoryRepositoryResult<Option<Aquarium>>;

    /// Finds a catalog lot by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryRepositoryError::AccessDenied`] when the caller may
    /// not read the lot collection.
    async fn find_lot(&self, id: LotId) -> InventoryRepositoryResult<Option<CatalogLot>>;

    /// Finds a reception instance by identifier.
    async fn find_reception_instance(
        &self,
        id: ReceptionInstanceId,
    ) -> InventoryRepositoryResult<Option<ReceptionInstance>>;

    /// Returns every catalog lot assigned to the aquarium.
    async fn lots_in_aquarium(&self, id: AquariumId) -> InventoryRepositoryResult<Vec<CatalogLot>>;

    /// Returns every reception instance assigned to the aquarium.
    async fn reception_instances_in_aquarium(
        &self,
        id: AquariumId,
    ) -> InventoryRepositoryResult<Vec<ReceptionInstance>>;

    /// Returns all stock of both kinds assigned to the aquarium.
    async fn stock_in_aquarium(&self, id: AquariumId) -> InventoryRepositoryResult<Vec<FishStock>> {
        let lots = self.lots_in_aquarium(id).await?;
        let instances = self.reception_instances_in_aquarium(id).await?;
        Ok(lots
            .into_iter()
            .map(FishStock::Catalog)
            .chain(instances.into_iter().map(FishStock::Reception))
            .collect())
    }
}

/// Errors returned by inventory repository implementations.
#[derive(Debug, Clone, Error)]
pub enum InventoryRepositoryError {
    /// The backing store refused the read.
    #[error("access denied to {0}")]
    AccessDenied(String),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted inventory data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl InventoryRepositoryError {
    /// Wraps persisted-data decoding or validation failures.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
