//! Port definitions for checklist task lookup.

mod repository;

pub use repository::{ChecklistRepository, ChecklistRepositoryError, ChecklistRepositoryResult};
