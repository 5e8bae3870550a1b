//! Error types for dossier domain validation, parsing, and gating.

use super::{DossierId, DossierStatus};
use thiserror::Error;

/// Reasons the Transition Gatekeeper refuses a status change.
///
/// Gate errors are surfaced to the requesting actor verbatim; they are
/// never downgraded or silently absorbed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GateError {
    /// The edge is not in the allowed-transition graph and the actor is not
    /// privileged.
    #[error("transition from {from:?} to {to:?} is not permitted")]
    InvalidTransition {
        /// Current dossier status.
        from: DossierStatus,
        /// Requested target status.
        to: DossierStatus,
    },

    /// A legal hold is active on the dossier; no actor may transition it.
    #[error("dossier is under legal hold{}", reason_suffix(.reason))]
    LegalHold {
        /// The reason recorded when the hold was placed.
        reason: Option<String>,
    },

    /// The dossier still has tasks outside the Done column.
    #[error("{0} open task(s) block the transition")]
    OpenTasks(usize),

    /// The requested target equals the current status.
    #[error("dossier is already in status {0:?}")]
    NoChange(DossierStatus),

    /// A privileged override was requested without a reason.
    #[error("a reason is required for a privileged override")]
    ReasonRequired,
}

/// Errors returned while constructing or mutating dossier domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DossierDomainError {
    /// The case reference is empty or contains whitespace.
    #[error("invalid case reference '{0}'")]
    InvalidCaseReference(String),

    /// The actor identifier is empty.
    #[error("invalid actor identifier '{0}'")]
    InvalidActorId(String),

    /// The flow is already decided and cannot be changed.
    #[error("flow is already set for dossier {0}")]
    FlowAlreadySet(DossierId),

    /// A legal hold is already active.
    #[error("legal hold already placed on dossier {0}")]
    HoldAlreadyPlaced(DossierId),

    /// There is no legal hold to clear.
    #[error("no active legal hold on dossier {0}")]
    NoActiveHold(DossierId),

    /// A hold operation was requested without a reason.
    #[error("legal hold operations require a reason")]
    HoldReasonRequired,
}

fn reason_suffix(reason: &Option<String>) -> String {
    reason
        .as_deref()
        .map(|text| format!(": {text}"))
        .unwrap_or_default()
}

/// Error returned while parsing dossier statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown dossier status: {0}")]
pub struct ParseStatusError(pub String);

/// Error returned while parsing flow kinds from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown flow kind: {0}")]
pub struct ParseFlowKindError(pub String);
