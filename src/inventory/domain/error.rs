//! Error types for inventory domain validation and parsing.

use super::{LotId, Quantity};
use thiserror::Error;

/// Errors returned while constructing or mutating inventory values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InventoryDomainError {
    /// Quantities moved between records must be positive.
    #[error("quantity must be a positive integer")]
    ZeroQuantity,

    /// The fish common name is empty after trimming.
    #[error("fish name must not be empty")]
    EmptyFishName,

    /// A record holds fewer fish than an operation requires.
    #[error("requested {requested} fish but only {available} are available")]
    InsufficientQuantity {
        /// Quantity the operation asked for.
        requested: Quantity,
        /// Quantity held by the record.
        available: u32,
    },

    /// Splitting a lot must leave fish behind; moving everything is a
    /// reassignment.
    #[error("splitting lot {lot_id} by {requested} would leave it empty")]
    SplitWouldEmptyLot {
        /// Lot being split.
        lot_id: LotId,
        /// Quantity requested for the new lot.
        requested: Quantity,
    },
}

/// Error returned while parsing aquarium statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown aquarium status: {0}")]
pub struct ParseAquariumStatusError(pub String);
