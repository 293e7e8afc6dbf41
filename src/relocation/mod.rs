//! Relocation of fish stock between aquariums or out of the farm.
//!
//! The executor turns a [`TransferPayload`] into the write operations that
//! move, split or remove stock and recompute the occupancy of every touched
//! aquarium. It performs reads only; callers commit the returned operations
//! together with their own status changes in a single
//! [`crate::store::WriteBatch`], so a failed relocation writes nothing.

mod error;
mod executor;
mod ledger;
mod payload;
mod planner;

pub use error::RelocationError;
pub use executor::RelocationExecutor;
pub use ledger::StockLedger;
pub use payload::{Destination, FishSelector, SHIPMENT_SENTINEL, TransferDraft, TransferPayload};
pub use planner::{RelocationEffects, RelocationKind, RelocationSnapshot, plan_relocation};
