//! Port definitions for transfer plan and task lookup.

mod repository;

pub use repository::{TransferRepository, TransferRepositoryError, TransferRepositoryResult};
