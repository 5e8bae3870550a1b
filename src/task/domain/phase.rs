//! Lifecycle phase taxonomy used to key the template catalogue.

use crate::dossier::domain::DossierStatus;
use serde::{Deserialize, Serialize};

/// Coarse lifecycle phase of a dossier.
///
/// Phases are deliberately independent of the raw status enum: several
/// statuses may share a phase, so re-entering a phase (for example a
/// review round-trip) never re-seeds tasks that were already satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecyclePhase {
    /// First contact with the bereaved family.
    Onboarding,
    /// Collecting certificates, permits, and claims.
    Intake,
    /// Verifying collected facts before settlement.
    Verify,
    /// Invoicing and aftercare.
    Settlement,
    /// Archival; no tasks are seeded here.
    Closure,
}

impl LifecyclePhase {
    /// Maps a workflow status onto its lifecycle phase.
    #[must_use]
    pub const fn for_status(status: DossierStatus) -> Self {
        match status {
            DossierStatus::Created => Self::Onboarding,
            DossierStatus::InProgress => Self::Intake,
            DossierStatus::UnderReview => Self::Verify,
            DossierStatus::Completed => Self::Settlement,
            DossierStatus::Closed => Self::Closure,
        }
    }

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Onboarding => "onboarding",
            Self::Intake => "intake",
            Self::Verify => "verify",
            Self::Settlement => "settlement",
            Self::Closure => "closure",
        }
    }
}
