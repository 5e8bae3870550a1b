//! Append-only status change history.

use super::{Actor, ActorId, DossierId, DossierStatus, HistoryEventId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Immutable record of one successful status transition.
///
/// Exactly one event exists per committed transition; events are never
/// mutated or deleted. The initial `Created` status has no event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusHistoryEvent {
    id: HistoryEventId,
    dossier_id: DossierId,
    from: DossierStatus,
    to: DossierStatus,
    actor_id: ActorId,
    privileged: bool,
    reason: Option<String>,
    recorded_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted history event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedHistoryData {
    /// Persisted event identifier.
    pub id: HistoryEventId,
    /// Persisted dossier reference.
    pub dossier_id: DossierId,
    /// Persisted source status.
    pub from: DossierStatus,
    /// Persisted target status.
    pub to: DossierStatus,
    /// Persisted acting-user identifier.
    pub actor_id: ActorId,
    /// Whether the actor held override privileges.
    pub privileged: bool,
    /// Persisted free-text reason, if any.
    pub reason: Option<String>,
    /// Persisted event timestamp.
    pub recorded_at: DateTime<Utc>,
}

impl StatusHistoryEvent {
    /// Records a new transition event at the current clock time.
    #[must_use]
    pub fn record(
        dossier_id: DossierId,
        from: DossierStatus,
        to: DossierStatus,
        actor: &Actor,
        reason: Option<String>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: HistoryEventId::new(),
            dossier_id,
            from,
            to,
            actor_id: actor.id().clone(),
            privileged: actor.is_privileged(),
            reason,
            recorded_at: clock.utc(),
        }
    }

    /// Reconstructs an event from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedHistoryData) -> Self {
        Self {
            id: data.id,
            dossier_id: data.dossier_id,
            from: data.from,
            to: data.to,
            actor_id: data.actor_id,
            privileged: data.privileged,
            reason: data.reason,
            recorded_at: data.recorded_at,
        }
    }

    /// Returns the event identifier.
    #[must_use]
    pub const fn id(&self) -> HistoryEventId {
        self.id
    }

    /// Returns the dossier this event belongs to.
    #[must_use]
    pub const fn dossier_id(&self) -> DossierId {
        self.dossier_id
    }

    /// Returns the status the dossier left.
    #[must_use]
    pub const fn from(&self) -> DossierStatus {
        self.from
    }

    /// Returns the status the dossier entered.
    #[must_use]
    pub const fn to(&self) -> DossierStatus {
        self.to
    }

    /// Returns the acting-user identifier.
    #[must_use]
    pub const fn actor_id(&self) -> &ActorId {
        &self.actor_id
    }

    /// Returns whether the actor held override privileges.
    #[must_use]
    pub const fn privileged(&self) -> bool {
        self.privileged
    }

    /// Returns the free-text reason, if one was supplied.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// Returns the event timestamp.
    #[must_use]
    pub const fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}
