//! Domain model for aquariums and the fish stock assigned to them.

mod aquarium;
mod error;
mod ids;
mod quantity;
mod stock;

pub use aquarium::{Aquarium, AquariumStatus, PersistedAquariumData};
pub use error::{InventoryDomainError, ParseAquariumStatusError};
pub use ids::{AquariumId, FarmId, LotId, ReceptionId, ReceptionInstanceId};
pub use quantity::Quantity;
pub use stock::{
    CatalogLot, FishDescriptor, FishKind, FishRef, FishStock, PersistedCatalogLotData,
    PersistedReceptionInstanceData, ReceptionInstance,
};
