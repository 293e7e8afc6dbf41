//! Free-form checklist tasks.
//!
//! Checklist tasks share the transfer tasks' block/unblock protocol but have
//! no in-progress state and belong to no plan. A task may embed a relocation
//! payload; completing such a task runs the relocation executor and commits
//! its inventory changes together with the status flip.

pub mod domain;
pub mod ports;
pub mod services;
