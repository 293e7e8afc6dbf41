//! Store adapters implementing every read port plus [`super::BatchWriter`].

pub mod memory;
pub mod postgres;
