//! Write operations collected into an all-or-nothing batch.

use crate::checklist::domain::{ChecklistTask, ChecklistTaskId};
use crate::inventory::domain::{
    Aquarium, AquariumId, CatalogLot, LotId, ReceptionInstance, ReceptionInstanceId,
};
use crate::revision::{Revision, Revisioned};
use crate::transfer::domain::{TransferPlan, TransferPlanId, TransferTask, TransferTaskId};
use std::collections::HashSet;
use std::fmt;

/// Identifies one stored record across every collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKey {
    /// An aquarium.
    Aquarium(AquariumId),
    /// A catalog lot.
    Lot(LotId),
    /// A reception instance.
    ReceptionInstance(ReceptionInstanceId),
    /// A transfer plan.
    Plan(TransferPlanId),
    /// A transfer task.
    TransferTask(TransferTaskId),
    /// A checklist task.
    ChecklistTask(ChecklistTaskId),
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Aquarium(id) => write!(f, "aquarium:{id}"),
            Self::Lot(id) => write!(f, "lot:{id}"),
            Self::ReceptionInstance(id) => write!(f, "reception_instance:{id}"),
            Self::Plan(id) => write!(f, "transfer_plan:{id}"),
            Self::TransferTask(id) => write!(f, "transfer_task:{id}"),
            Self::ChecklistTask(id) => write!(f, "checklist_task:{id}"),
        }
    }
}

/// One revision-checked write.
///
/// A put carries the record as last read; its revision is the one the store
/// must still hold, and [`Revision::UNSAVED`] requires the record to be
/// absent. A delete names the revision it expects to remove.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    /// Insert or update an aquarium.
    PutAquarium(Aquarium),
    /// Insert or update a catalog lot.
    PutLot(CatalogLot),
    /// Delete a catalog lot.
    DeleteLot {
        /// Lot identifier.
        id: LotId,
        /// Expected stored revision.
        revision: Revision,
    },
    /// Insert or update a reception instance.
    PutReceptionInstance(ReceptionInstance),
    /// Delete a reception instance.
    DeleteReceptionInstance {
        /// Instance identifier.
        id: ReceptionInstanceId,
        /// Expected stored revision.
        revision: Revision,
    },
    /// Insert or update a transfer plan.
    PutPlan(TransferPlan),
    /// Delete a transfer plan.
    DeletePlan {
        /// Plan identifier.
        id: TransferPlanId,
        /// Expected stored revision.
        revision: Revision,
    },
    /// Insert or update a transfer task.
    PutTransferTask(TransferTask),
    /// Delete a transfer task.
    DeleteTransferTask {
        /// Task identifier.
        id: TransferTaskId,
        /// Expected stored revision.
        revision: Revision,
    },
    /// Insert or update a checklist task.
    PutChecklistTask(ChecklistTask),
    /// Delete a checklist task.
    DeleteChecklistTask {
        /// Task identifier.
        id: ChecklistTaskId,
        /// Expected stored revision.
        revision: Revision,
    },
}

impl WriteOp {
    /// Returns the record the operation touches.
    #[must_use]
    pub const fn key(&self) -> RecordKey {
        match self {
            Self::PutAquarium(aquarium) => RecordKey::Aquarium(aquarium.id()),
            Self::PutLot(lot) => RecordKey::Lot(lot.id()),
            Self::DeleteLot { id, .. } => RecordKey::Lot(*id),
            Self::PutReceptionInstance(instance) => RecordKey::ReceptionInstance(instance.id()),
            Self::DeleteReceptionInstance { id, .. } => RecordKey::ReceptionInstance(*id),
            Self::PutPlan(plan) => RecordKey::Plan(plan.id()),
            Self::DeletePlan { id, .. } => RecordKey::Plan(*id),
            Self::PutTransferTask(task) => RecordKey::TransferTask(task.id()),
            Self::DeleteTransferTask { id, .. } => RecordKey::TransferTask(*id),
            Self::PutChecklistTask(task) => RecordKey::ChecklistTask(task.id()),
            Self::DeleteChecklistTask { id, .. } => RecordKey::ChecklistTask(*id),
        }
    }

    /// Returns the revision the store must hold for the record.
    #[must_use]
    pub fn expected_revision(&self) -> Revision {
        match self {
            Self::PutAquarium(aquarium) => aquarium.revision(),
            Self::PutLot(lot) => lot.revision(),
            Self::PutReceptionInstance(instance) => instance.revision(),
            Self::PutPlan(plan) => plan.revision(),
            Self::PutTransferTask(task) => task.revision(),
            Self::PutChecklistTask(task) => task.revision(),
            Self::DeleteLot { revision, .. }
            | Self::DeleteReceptionInstance { revision, .. }
            | Self::DeletePlan { revision, .. }
            | Self::DeleteTransferTask { revision, .. }
            | Self::DeleteChecklistTask { revision, .. } => *revision,
        }
    }

    /// Returns whether the operation removes its record.
    #[must_use]
    pub const fn is_delete(&self) -> bool {
        matches!(
            self,
            Self::DeleteLot { .. }
                | Self::DeleteReceptionInstance { .. }
                | Self::DeletePlan { .. }
                | Self::DeleteTransferTask { .. }
                | Self::DeleteChecklistTask { .. }
        )
    }
}

/// Ordered set of writes applied atomically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    /// Creates an empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an operation.
    pub fn push(&mut self, op: WriteOp) {
        self.ops.push(op);
    }

    /// Returns the number of operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Returns whether the batch holds no operations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Returns the operations in application order.
    #[must_use]
    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    /// Returns the first record the batch touches more than once.
    #[must_use]
    pub fn first_duplicate(&self) -> Option<RecordKey> {
        let mut seen = HashSet::with_capacity(self.ops.len());
        self.ops.iter().map(WriteOp::key).find(|key| !seen.insert(*key))
    }

    /// Consumes the batch, yielding its operations.
    #[must_use]
    pub fn into_ops(self) -> Vec<WriteOp> {
        self.ops
    }
}

impl Extend<WriteOp> for WriteBatch {
    fn extend<T: IntoIterator<Item = WriteOp>>(&mut self, iter: T) {
        self.ops.extend(iter);
    }
}

impl IntoIterator for WriteBatch {
    type Item = WriteOp;
    type IntoIter = std::vec::IntoIter<WriteOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}

impl FromIterator<WriteOp> for WriteBatch {
    fn from_iter<T: IntoIterator<Item = WriteOp>>(iter: T) -> Self {
        Self {
            ops: iter.into_iter().collect(),
        }
    }
}
