//! Service layer gating dossier status transitions.

use crate::dossier::{
    domain::{
        Actor, AuditAction, AuditEntry, CaseReference, Dossier, DossierDomainError, DossierId,
        DossierStatus, FlowKind, GateError, StatusHistoryEvent,
    },
    ports::{AuditLog, DossierRepository, DossierRepositoryError},
};
use crate::task::{
    ports::{TaskRepository, TaskRepositoryError},
    services::TaskSeeder,
};
use mockable::Clock;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for a dossier status transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionRequest {
    dossier_id: DossierId,
    target: DossierStatus,
    actor: Actor,
    reason: Option<String>,
}

impl TransitionRequest {
    /// Creates a transition request without a reason.
    #[must_use]
    pub const fn new(dossier_id: DossierId, target: DossierStatus, actor: Actor) -> Self {
        Self {
            dossier_id,
            target,
            actor,
            reason: None,
        }
    }

    /// Attaches a free-text reason, mandatory for privileged overrides.
    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// Service-level errors for gatekeeper operations.
#[derive(Debug, Error)]
pub enum GatekeeperError {
    /// A transition gate refused the request.
    #[error(transparent)]
    Gate(#[from] GateError),
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] DossierDomainError),
    /// Dossier repository operation failed.
    #[error(transparent)]
    Dossier(#[from] DossierRepositoryError),
    /// Task repository operation failed while counting open tasks.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),
}

/// Result type for gatekeeper operations.
pub type GatekeeperResult<T> = Result<T, GatekeeperError>;

/// Orchestrates gated status transitions, legal holds, and phase-entry
/// seeding.
///
/// The gatekeeper is the only writer of dossier status: it evaluates the
/// domain gates against fresh reads, commits the status change atomically
/// with its history event, and then seeds the new phase's tasks. Seeding
/// is deliberately post-commit: it is idempotent and retryable, so its
/// failure never rolls back a committed transition.
#[derive(Clone)]
pub struct TransitionGatekeeper<D, T, A, C>
where
    D: DossierRepository,
    T: TaskRepository,
    A: AuditLog,
    C: Clock + Send + Sync,
{
    dossiers: Arc<D>,
    tasks: Arc<T>,
    audit: Arc<A>,
    seeder: TaskSeeder<T, C>,
    clock: Arc<C>,
}

impl<D, T, A, C> TransitionGatekeeper<D, T, A, C>
where
    D: DossierRepository,
    T: TaskRepository,
    A: AuditLog,
    C: Clock + Send + Sync,
{
    /// Creates a new gatekeeper.
    #[must_use]
    pub const fn new(
        dossiers: Arc<D>,
        tasks: Arc<T>,
        audit: Arc<A>,
        seeder: TaskSeeder<T, C>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            dossiers,
            tasks,
            audit,
            seeder,
            clock,
        }
    }

    /// Opens a new dossier and seeds its initial phase.
    ///
    /// # Errors
    ///
    /// Returns [`GatekeeperError::Dossier`] when persistence rejects the
    /// new dossier.
    pub async fn open_dossier(
        &self,
        reference: CaseReference,
        flow: FlowKind,
    ) -> GatekeeperResult<Dossier> {
        let dossier = Dossier::open(reference, flow, &*self.clock);
        self.dossiers.insert(&dossier).await?;
        self.seed_post_commit(&dossier).await;
        Ok(dossier)
    }

    /// Applies a gated status transition.
    ///
    /// On success the returned history event has already been committed
    /// atomically with the status change, and the new phase's tasks have
    /// been seeded (or the seeding failure has been logged for an
    /// out-of-band retry).
    ///
    /// # Errors
    ///
    /// Returns [`GatekeeperError::Gate`] with the specific failing gate,
    /// or a repository error when the dossier is missing or the commit
    /// loses a concurrent race.
    pub async fn transition(
        &self,
        request: TransitionRequest,
    ) -> GatekeeperResult<StatusHistoryEvent> {
        let dossier = self.load(request.dossier_id).await?;
        let open_tasks = self.tasks.count_open_for_dossier(dossier.id()).await?;

        dossier.check_transition(
            request.target,
            &request.actor,
            open_tasks,
            request.reason.as_deref(),
        )?;

        let event = StatusHistoryEvent::record(
            dossier.id(),
            dossier.status(),
            request.target,
            &request.actor,
            request.reason.clone(),
            &*self.clock,
        );
        let mut updated = dossier.clone();
        updated.apply_status(request.target, &*self.clock);
        self.dossiers.commit_transition(&updated, &event).await?;

        tracing::info!(
            dossier = %updated.id(),
            from = event.from().as_str(),
            to = event.to().as_str(),
            actor = %request.actor.id(),
            "dossier transitioned"
        );

        let overrode_gates = !dossier.status().permits_transition_to(request.target)
            || (request.actor.is_privileged() && open_tasks > 0);
        self.record_audit(
            transition_audit(&request, &dossier, open_tasks, overrode_gates, &*self.clock),
        )
        .await;
        self.seed_post_commit(&updated).await;

        Ok(event)
    }

    /// Places a legal hold, blocking all transitions until cleared.
    ///
    /// # Errors
    ///
    /// Returns [`GatekeeperError::Domain`] when a hold is already active
    /// or the reason is empty.
    pub async fn place_legal_hold(
        &self,
        dossier_id: DossierId,
        actor: &Actor,
        reason: impl Into<String>,
    ) -> GatekeeperResult<Dossier> {
        let mut dossier = self.load(dossier_id).await?;
        let reason = reason.into();
        dossier.place_legal_hold(reason.clone(), &*self.clock)?;
        self.dossiers.update_legal_hold(&dossier).await?;
        self.record_audit(
            AuditEntry::new(
                actor.id().clone(),
                AuditAction::LegalHoldPlaced,
                dossier_id.to_string(),
                &*self.clock,
            )
            .with_reason(reason),
        )
        .await;
        Ok(dossier)
    }

    /// Clears the active legal hold.
    ///
    /// # Errors
    ///
    /// Returns [`GatekeeperError::Domain`] when no hold is active or the
    /// reason is empty.
    pub async fn clear_legal_hold(
        &self,
        dossier_id: DossierId,
        actor: &Actor,
        reason: impl Into<String>,
    ) -> GatekeeperResult<Dossier> {
        let reason = reason.into();
        if reason.trim().is_empty() {
            return Err(DossierDomainError::HoldReasonRequired.into());
        }
        let mut dossier = self.load(dossier_id).await?;
        dossier.clear_legal_hold(&*self.clock)?;
        self.dossiers.update_legal_hold(&dossier).await?;
        self.record_audit(
            AuditEntry::new(
                actor.id().clone(),
                AuditAction::LegalHoldCleared,
                dossier_id.to_string(),
                &*self.clock,
            )
            .with_reason(reason),
        )
        .await;
        Ok(dossier)
    }

    /// Returns the dossier's full status history, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`GatekeeperError::Dossier`] when the lookup fails.
    pub async fn history(&self, dossier_id: DossierId) -> GatekeeperResult<Vec<StatusHistoryEvent>> {
        Ok(self.dossiers.history_for(dossier_id).await?)
    }

    async fn load(&self, dossier_id: DossierId) -> GatekeeperResult<Dossier> {
        self.dossiers
            .find_by_id(dossier_id)
            .await?
            .ok_or_else(|| DossierRepositoryError::NotFound(dossier_id).into())
    }

    /// Audit entries are best-effort telemetry next to the authoritative
    /// history table; a write failure is logged, not surfaced.
    async fn record_audit(&self, entry: AuditEntry) {
        if let Err(error) = self.audit.record(&entry).await {
            tracing::warn!(
                action = entry.action.as_str(),
                target = entry.target.as_str(),
                error = %error,
                "audit write failed"
            );
        }
    }

    /// Post-commit seeding: idempotent, so a failure is retried once
    /// in-process and otherwise left to the out-of-band sweep instead of
    /// surfacing to the caller.
    async fn seed_post_commit(&self, dossier: &Dossier) {
        let Err(first) = self.seeder.seed(dossier).await else {
            return;
        };
        tracing::warn!(
            dossier = %dossier.id(),
            status = dossier.status().as_str(),
            error = %first,
            "post-commit task seeding failed, retrying"
        );
        if let Err(second) = self.seeder.seed(dossier).await {
            tracing::warn!(
                dossier = %dossier.id(),
                status = dossier.status().as_str(),
                error = %second,
                "post-commit task seeding failed again, deferred to next sweep"
            );
        }
    }
}

fn transition_audit(
    request: &TransitionRequest,
    dossier: &Dossier,
    open_tasks: usize,
    overrode_gates: bool,
    clock: &impl Clock,
) -> AuditEntry {
    let action = if overrode_gates {
        AuditAction::GateOverride
    } else {
        AuditAction::StatusTransition
    };
    let mut entry = AuditEntry::new(
        request.actor.id().clone(),
        action,
        request.dossier_id.to_string(),
        clock,
    )
    .with_metadata(json!({
        "from": dossier.status().as_str(),
        "to": request.target.as_str(),
        "privileged": request.actor.is_privileged(),
        "open_tasks": open_tasks,
    }));
    if let Some(reason) = &request.reason {
        entry = entry.with_reason(reason.clone());
    }
    entry
}
