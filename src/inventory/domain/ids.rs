//! Identifier types for the inventory domain.

use crate::ids::uuid_identifier;

uuid_identifier! {
    /// Identifier of the farm that owns aquariums, stock and plans.
    FarmId
}

uuid_identifier! {
    /// Identifier of an aquarium record.
    AquariumId
}

uuid_identifier! {
    /// Identifier of a locally-owned catalog lot.
    LotId
}

uuid_identifier! {
    /// Identifier of a fish instance admitted from an external shipment.
    ReceptionInstanceId
}

uuid_identifier! {
    /// Identifier of the shipment reception an instance was admitted with.
    ReceptionId
}
