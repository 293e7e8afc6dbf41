//! Atomic, revision-checked write batches and the stores that apply them.
//!
//! Services never write records one by one. They collect every change an
//! operation makes into a [`WriteBatch`] and hand it to a [`BatchWriter`],
//! which applies all of it or none of it.

pub mod adapters;
mod batch;
mod ports;

pub use batch::{RecordKey, WriteBatch, WriteOp};
pub use ports::{BatchWriter, StoreError, StoreResult};

#[cfg(test)]
pub use ports::MockBatchWriter;
