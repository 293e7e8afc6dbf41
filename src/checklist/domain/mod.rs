//! Domain model for checklist tasks.

mod error;
mod task;

use crate::ids::uuid_identifier;

pub use error::{ChecklistDomainError, ParseChecklistStatusError};
pub use task::{ChecklistStatus, ChecklistTask, NewChecklistTask, PersistedChecklistTaskData};

uuid_identifier! {
    /// Identifier of a checklist task.
    ChecklistTaskId
}
