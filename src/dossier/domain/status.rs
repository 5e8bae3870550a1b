//! Dossier workflow status and the allowed-transition graph.

use super::ParseStatusError;
use serde::{Deserialize, Serialize};

/// Workflow status of a dossier.
///
/// This is the canonical five-value status model; a legal hold is a
/// separate flag on the dossier, never a status of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DossierStatus {
    /// The case has been registered but handling has not started.
    Created,
    /// The case is being worked.
    InProgress,
    /// The case is awaiting verification of collected facts.
    UnderReview,
    /// All casework is finished; only settlement remains.
    Completed,
    /// The case is archived. Terminal.
    Closed,
}

/// Edges manually permitted for non-privileged actors.
///
/// Privileged actors may bypass this graph; nobody leaves `Closed`.
const ALLOWED_TRANSITIONS: [(DossierStatus, DossierStatus); 5] = [
    (DossierStatus::Created, DossierStatus::InProgress),
    (DossierStatus::InProgress, DossierStatus::UnderReview),
    (DossierStatus::UnderReview, DossierStatus::InProgress),
    (DossierStatus::UnderReview, DossierStatus::Completed),
    (DossierStatus::Completed, DossierStatus::Closed),
];

impl DossierStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::InProgress => "in_progress",
            Self::UnderReview => "under_review",
            Self::Completed => "completed",
            Self::Closed => "closed",
        }
    }

    /// Returns whether the allowed-transition graph contains an edge from
    /// `self` to `target`.
    #[must_use]
    pub fn permits_transition_to(self, target: Self) -> bool {
        ALLOWED_TRANSITIONS
            .iter()
            .any(|&(from, to)| from == self && to == target)
    }

    /// Returns whether the status has no outgoing edges for any actor.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl TryFrom<&str> for DossierStatus {
    type Error = ParseStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "created" => Ok(Self::Created),
            "in_progress" => Ok(Self::InProgress),
            "under_review" => Ok(Self::UnderReview),
            "completed" => Ok(Self::Completed),
            "closed" => Ok(Self::Closed),
            _ => Err(ParseStatusError(value.to_owned())),
        }
    }
}
