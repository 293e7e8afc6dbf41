//! Identifier types for the transfer domain.

use crate::ids::uuid_identifier;

uuid_identifier! {
    /// Unique identifier for a transfer plan.
    TransferPlanId
}

uuid_identifier! {
    /// Unique identifier for a transfer task.
    TransferTaskId
}
