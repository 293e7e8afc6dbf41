//! Optimistic-concurrency revision stamps shared by every stored record.
//!
//! A record that has never been persisted carries [`Revision::UNSAVED`].
//! Stores accept a write only when the stored revision matches the revision
//! carried by the record being written, then persist the next revision.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Monotonic per-record revision counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Revision(u64);

impl Revision {
    /// Revision of a record that has not been stored yet.
    pub const UNSAVED: Self = Self(0);

    /// Creates a revision from its raw value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw revision value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Returns whether the record has never been stored.
    #[must_use]
    pub const fn is_unsaved(self) -> bool {
        self.0 == 0
    }

    /// Returns the revision a store assigns after accepting a write.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl Default for Revision {
    fn default() -> Self {
        Self::UNSAVED
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// Records whose writes are guarded by a [`Revision`].
pub trait Revisioned {
    /// Returns the revision the record was read at.
    fn revision(&self) -> Revision;

    /// Replaces the revision after a store accepted a write.
    fn stamp_revision(&mut self, revision: Revision);

    /// Advances to the revision a store assigns when it accepts this record.
    fn advance_revision(&mut self) {
        let next = self.revision().next();
        self.stamp_revision(next);
    }
}
