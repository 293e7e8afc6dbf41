//! Errors raised while preparing or executing a relocation.

use crate::error::ErrorKind;
use crate::inventory::{
    domain::{AquariumId, FishRef, InventoryDomainError, Quantity},
    ports::InventoryRepositoryError,
};
use thiserror::Error;
use uuid::Uuid;

/// Errors returned by the relocation executor.
#[derive(Debug, Clone, Error)]
pub enum RelocationError {
    /// A quantity or descriptor failed domain validation.
    #[error(transparent)]
    Inventory(#[from] InventoryDomainError),

    /// The source and target aquariums are the same.
    #[error("source and target aquarium are both {0}")]
    SameSourceAndTarget(AquariumId),

    /// No catalog lot or reception instance has the identifier.
    #[error("fish record {0} not found")]
    FishNotFound(Uuid),

    /// The aquarium does not exist.
    #[error("aquarium {0} not found")]
    AquariumNotFound(AquariumId),

    /// The fish are not assigned to the source aquarium.
    #[error("fish {fish} is not in aquarium {source_aquarium}")]
    FishNotInSource {
        /// Fish being moved.
        fish: FishRef,
        /// Source aquarium named by the transfer.
        source_aquarium: AquariumId,
    },

    /// The record holds fewer fish than the transfer requests.
    #[error("fish {fish} holds {available} fish, fewer than the {requested} requested")]
    InsufficientQuantity {
        /// Fish being moved.
        fish: FishRef,
        /// Requested quantity.
        requested: Quantity,
        /// Quantity currently held.
        available: u32,
    },

    /// Reception instances move whole between aquariums.
    #[error(
        "reception instance {fish} holds {available} fish and cannot be split; move all of them or ship the partial quantity"
    )]
    ReceptionInstanceNotSplittable {
        /// Instance being moved.
        fish: FishRef,
        /// Requested quantity.
        requested: Quantity,
        /// Quantity currently held.
        available: u32,
    },

    /// Inventory lookup failed.
    #[error(transparent)]
    Repository(#[from] InventoryRepositoryError),
}

impl RelocationError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Inventory(_)
            | Self::SameSourceAndTarget(_)
            | Self::FishNotInSource { .. }
            | Self::InsufficientQuantity { .. }
            | Self::ReceptionInstanceNotSplittable { .. } => ErrorKind::Validation,
            Self::FishNotFound(_) | Self::AquariumNotFound(_) => ErrorKind::NotFound,
            Self::Repository(_) => ErrorKind::Persistence,
        }
    }
}
