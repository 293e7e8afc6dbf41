//! Aquarium registry and fish inventory contracts.
//!
//! Aquariums, catalog lots and reception instances are owned by external
//! collaborators. This module models the records the transfer engine reads
//! and rewrites, and the read port it queries them through:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//!
//! Writes never go through this module's port; they are expressed as
//! [`crate::store::WriteBatch`] operations so that inventory changes commit
//! atomically with task and plan updates.

pub mod domain;
pub mod ports;
