//! Generic audit-log entries for gated and privileged operations.

use super::{ActorId, HistoryEventId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Auditable actions recorded alongside domain state changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// A dossier status transition was committed.
    StatusTransition,
    /// A privileged actor overrode a transition gate.
    GateOverride,
    /// A legal hold was placed on a dossier.
    LegalHoldPlaced,
    /// A legal hold was cleared from a dossier.
    LegalHoldCleared,
    /// A task was moved between board columns.
    TaskMoved,
}

impl AuditAction {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StatusTransition => "status_transition",
            Self::GateOverride => "gate_override",
            Self::LegalHoldPlaced => "legal_hold_placed",
            Self::LegalHoldCleared => "legal_hold_cleared",
            Self::TaskMoved => "task_moved",
        }
    }
}

/// One append-only audit-log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Entry identifier.
    pub id: HistoryEventId,
    /// The acting user.
    pub actor_id: ActorId,
    /// What was done.
    pub action: AuditAction,
    /// The affected entity, e.g. a dossier or task identifier.
    pub target: String,
    /// Free-text reason, mandatory for overrides and hold operations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Structured action-specific metadata.
    pub metadata: Value,
    /// Entry timestamp.
    pub recorded_at: DateTime<Utc>,
}

impl AuditEntry {
    /// Creates a new audit entry at the current clock time.
    #[must_use]
    pub fn new(
        actor_id: ActorId,
        action: AuditAction,
        target: impl Into<String>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: HistoryEventId::new(),
            actor_id,
            action,
            target: target.into(),
            reason: None,
            metadata: Value::Null,
            recorded_at: clock.utc(),
        }
    }

    /// Attaches a free-text reason.
    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches structured metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = metadata;
        self
    }
}
