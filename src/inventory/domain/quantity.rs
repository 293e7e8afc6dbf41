//! Positive fish counts.

use super::InventoryDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A strictly positive number of fish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    /// Creates a validated quantity.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryDomainError::ZeroQuantity`] when `value` is zero.
    pub const fn new(value: u32) -> Result<Self, InventoryDomainError> {
        if value == 0 {
            return Err(InventoryDomainError::ZeroQuantity);
        }
        Ok(Self(value))
    }

    /// Returns the underlying count.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for Quantity {
    type Error = InventoryDomainError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
