//! Crate-wide error classification.

use std::fmt;

/// Coarse category of a service failure.
///
/// Every service error maps onto one of these so callers can react without
/// matching on nested error types. None of them is retried by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Input is missing or invalid, or exceeds what inventory allows.
    Validation,
    /// A plan, task, fish record or aquarium does not exist.
    NotFound,
    /// A status transition is not legal from the current state.
    State,
    /// A plan with no tasks cannot be finalized.
    EmptyPlan,
    /// A concurrent writer changed a record since it was read.
    Conflict,
    /// The backing store failed.
    Persistence,
}

impl ErrorKind {
    /// Returns a stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::State => "state",
            Self::EmptyPlan => "empty_plan",
            Self::Conflict => "conflict",
            Self::Persistence => "persistence",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
