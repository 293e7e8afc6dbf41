//! Advisory conflict warnings for proposed transfer tasks.

use super::OccupancyProjection;
use crate::inventory::domain::Aquarium;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of advisory warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// Other tasks in the plan are projected to empty the target.
    TargetHasPendingRemovals,
    /// Other tasks in the plan are projected to fill the source.
    SourceHasPendingAdditions,
    /// The target currently holds fish and mixing was not allowed.
    TargetOccupied,
}

impl WarningKind {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TargetHasPendingRemovals => "target_has_pending_removals",
            Self::SourceHasPendingAdditions => "source_has_pending_additions",
            Self::TargetOccupied => "target_occupied",
        }
    }
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Warning severity. Warnings never block an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningSeverity {
    /// Requires a second confirmation from the caller.
    #[default]
    Warning,
}

/// One advisory warning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictWarning {
    /// Warning kind.
    #[serde(rename = "type")]
    pub kind: WarningKind,
    /// Human-readable explanation.
    pub message: String,
    /// Always [`WarningSeverity::Warning`].
    pub severity: WarningSeverity,
}

impl ConflictWarning {
    fn new(kind: WarningKind, message: String) -> Self {
        Self {
            kind,
            message,
            severity: WarningSeverity::Warning,
        }
    }
}

/// Live state of the aquariums a proposed task touches.
#[derive(Debug, Clone, Copy)]
pub struct ProposedTransfer<'a> {
    /// Source aquarium.
    pub source: &'a Aquarium,
    /// Target aquarium; `None` for shipments.
    pub target: Option<&'a Aquarium>,
    /// Whether the caller accepts mixing at the target.
    pub allow_mixing: bool,
}

/// Turns projected and live occupancy into advisory warnings.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConflictValidator;

impl ConflictValidator {
    /// Evaluates a proposal against the plan's projection.
    #[must_use]
    pub fn evaluate(
        projection: &OccupancyProjection,
        proposal: &ProposedTransfer<'_>,
    ) -> Vec<ConflictWarning> {
        let mut warnings = Vec::new();

        if let Some(target) = proposal.target {
            let projected = projection.aquarium(target.id());
            if projected.will_be_empty() {
                warnings.push(ConflictWarning::new(
                    WarningKind::TargetHasPendingRemovals,
                    format!(
                        "aquarium {} is scheduled to lose {} fish in other tasks of this plan",
                        target.number(),
                        projected.pending_removals
                    ),
                ));
            }
        }

        let source = projection.aquarium(proposal.source.id());
        if source.will_be_occupied() {
            warnings.push(ConflictWarning::new(
                WarningKind::SourceHasPendingAdditions,
                format!(
                    "aquarium {} is scheduled to receive {} fish in other tasks of this plan",
                    proposal.source.number(),
                    source.pending_additions
                ),
            ));
        }

        if let Some(target) = proposal.target
            && target.total_fish() > 0
            && !proposal.allow_mixing
        {
            warnings.push(ConflictWarning::new(
                WarningKind::TargetOccupied,
                format!(
                    "aquarium {} already holds {} fish; allow mixing to combine them",
                    target.number(),
                    target.total_fish()
                ),
            ));
        }

        warnings
    }
}
