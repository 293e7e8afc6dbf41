//! Aquaroute: fish transfer planning and execution for aquaculture farms.
//!
//! Operators group relocations of fish between aquariums into transfer
//! plans, review conflict warnings computed from pending work, and execute
//! each task as one atomic inventory update. Checklist tasks can carry the
//! same relocation payload and run it on completion.
//!
//! # Architecture
//!
//! Aquaroute follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for stored records
//! - **Adapters**: In-memory and `PostgreSQL` stores behind those ports
//!
//! # Modules
//!
//! - [`inventory`]: Aquariums, catalog lots and reception instances
//! - [`relocation`]: Validating and executing a single fish move
//! - [`transfer`]: Transfer plans, tasks and conflict projection
//! - [`checklist`]: Free-form tasks with optional relocation payloads
//! - [`store`]: Revision-checked batch writes and storage adapters

pub mod checklist;
pub mod config;
pub mod error;
pub mod escalation;
pub mod inventory;
mod ids;
pub mod relocation;
pub mod revision;
pub mod store;
pub mod transfer;
