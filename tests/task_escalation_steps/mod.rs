//! Step definitions for transfer task escalation scenarios.

pub mod world;
