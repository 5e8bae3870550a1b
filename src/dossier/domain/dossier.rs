//! Dossier aggregate root: the case record and its transition gates.

use super::{
    Actor, CaseReference, DossierDomainError, DossierId, DossierStatus, FlowKind, GateError,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Dossier aggregate root.
///
/// A dossier is never physically deleted; archiving happens by moving it
/// to the terminal [`DossierStatus::Closed`] status. All status changes go
/// through the Transition Gatekeeper, which consults
/// [`Dossier::check_transition`] before committing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dossier {
    id: DossierId,
    reference: CaseReference,
    flow: FlowKind,
    status: DossierStatus,
    legal_hold: bool,
    legal_hold_reason: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted dossier aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedDossierData {
    /// Persisted dossier identifier.
    pub id: DossierId,
    /// Persisted case reference.
    pub reference: CaseReference,
    /// Persisted flow kind.
    pub flow: FlowKind,
    /// Persisted workflow status.
    pub status: DossierStatus,
    /// Persisted legal-hold flag.
    pub legal_hold: bool,
    /// Persisted legal-hold reason, if any.
    pub legal_hold_reason: Option<String>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Dossier {
    /// Opens a new dossier in the initial [`DossierStatus::Created`] status.
    #[must_use]
    pub fn open(reference: CaseReference, flow: FlowKind, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: DossierId::new(),
            reference,
            flow,
            status: DossierStatus::Created,
            legal_hold: false,
            legal_hold_reason: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a dossier from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedDossierData) -> Self {
        Self {
            id: data.id,
            reference: data.reference,
            flow: data.flow,
            status: data.status,
            legal_hold: data.legal_hold,
            legal_hold_reason: data.legal_hold_reason,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the dossier identifier.
    #[must_use]
    pub const fn id(&self) -> DossierId {
        self.id
    }

    /// Returns the human-facing case reference.
    #[must_use]
    pub const fn reference(&self) -> &CaseReference {
        &self.reference
    }

    /// Returns the flow kind.
    #[must_use]
    pub const fn flow(&self) -> FlowKind {
        self.flow
    }

    /// Returns the current workflow status.
    #[must_use]
    pub const fn status(&self) -> DossierStatus {
        self.status
    }

    /// Returns whether a legal hold is active.
    #[must_use]
    pub const fn is_on_legal_hold(&self) -> bool {
        self.legal_hold
    }

    /// Returns the reason recorded with the active legal hold, if any.
    #[must_use]
    pub fn legal_hold_reason(&self) -> Option<&str> {
        self.legal_hold_reason.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Decides a dossier's flow once intake has established it.
    ///
    /// # Errors
    ///
    /// Returns [`DossierDomainError::FlowAlreadySet`] when the flow is
    /// already `Local` or `Repatriation`.
    pub fn decide_flow(
        &mut self,
        flow: FlowKind,
        clock: &impl Clock,
    ) -> Result<(), DossierDomainError> {
        if self.flow != FlowKind::Unset {
            return Err(DossierDomainError::FlowAlreadySet(self.id));
        }
        self.flow = flow;
        self.touch(clock);
        Ok(())
    }

    /// Evaluates every transition gate for a requested status change.
    ///
    /// Gate order: no-op rejection, legal hold, allowed-transition graph,
    /// open-task count, override reason. Privileged actors bypass the graph
    /// and the open-task count but must then supply a reason; no privilege
    /// bypasses a legal hold or the terminal status.
    ///
    /// # Errors
    ///
    /// Returns the first failing [`GateError`].
    pub fn check_transition(
        &self,
        target: DossierStatus,
        actor: &Actor,
        open_tasks: usize,
        reason: Option<&str>,
    ) -> Result<(), GateError> {
        if target == self.status {
            return Err(GateError::NoChange(self.status));
        }
        if self.legal_hold {
            return Err(GateError::LegalHold {
                reason: self.legal_hold_reason.clone(),
            });
        }

        let edge_allowed =
            !self.status.is_terminal() && self.status.permits_transition_to(target);
        if !edge_allowed && !actor.is_privileged() {
            return Err(GateError::InvalidTransition {
                from: self.status,
                to: target,
            });
        }
        if self.status.is_terminal() {
            // Closed has no outgoing edges for anyone.
            return Err(GateError::InvalidTransition {
                from: self.status,
                to: target,
            });
        }

        let tasks_bypassed = open_tasks > 0;
        if tasks_bypassed && !actor.is_privileged() {
            return Err(GateError::OpenTasks(open_tasks));
        }

        let overriding = !edge_allowed || tasks_bypassed;
        if actor.is_privileged() && overriding && reason.map_or(true, str::is_empty) {
            return Err(GateError::ReasonRequired);
        }

        Ok(())
    }

    /// Applies an already-gated status change.
    ///
    /// Callers must have passed [`Self::check_transition`] first; this
    /// method performs no gating of its own.
    pub fn apply_status(&mut self, target: DossierStatus, clock: &impl Clock) {
        self.status = target;
        self.touch(clock);
    }

    /// Places a legal hold on the dossier.
    ///
    /// # Errors
    ///
    /// Returns [`DossierDomainError::HoldAlreadyPlaced`] when a hold is
    /// active, or [`DossierDomainError::HoldReasonRequired`] when the reason
    /// is empty.
    pub fn place_legal_hold(
        &mut self,
        reason: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), DossierDomainError> {
        if self.legal_hold {
            return Err(DossierDomainError::HoldAlreadyPlaced(self.id));
        }
        let reason = reason.into();
        if reason.trim().is_empty() {
            return Err(DossierDomainError::HoldReasonRequired);
        }
        self.legal_hold = true;
        self.legal_hold_reason = Some(reason);
        self.touch(clock);
        Ok(())
    }

    /// Clears the active legal hold.
    ///
    /// # Errors
    ///
    /// Returns [`DossierDomainError::NoActiveHold`] when no hold is active.
    pub fn clear_legal_hold(&mut self, clock: &impl Clock) -> Result<(), DossierDomainError> {
        if !self.legal_hold {
            return Err(DossierDomainError::NoActiveHold(self.id));
        }
        self.legal_hold = false;
        self.legal_hold_reason = None;
        self.touch(clock);
        Ok(())
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
