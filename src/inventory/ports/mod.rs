//! Port contracts for inventory lookups.

pub mod repository;

pub use repository::{InventoryRepository, InventoryRepositoryError, InventoryRepositoryResult};

#[cfg(test)]
pub use repository::MockInventoryRepository;
