//! Transfer planning and execution.
//!
//! A transfer plan groups ordered relocation tasks for one farm. Adding a
//! task first runs the conflict validator against a speculative occupancy
//! projection of the plan's outstanding tasks; executing a task runs the
//! relocation executor and commits the inventory changes, the task status
//! and the plan counters in one atomic batch. Blocked tasks wait for a
//! manager to continue or cancel them. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Orchestration services in [`services`]

pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
