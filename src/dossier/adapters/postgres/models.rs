//! Diesel row models for dossier persistence.

use super::schema::{audit_logs, dossiers, status_history};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for dossier records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = dossiers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DossierRow {
    /// Dossier identifier.
    pub id: uuid::Uuid,
    /// Human-facing case reference.
    pub reference: String,
    /// Flow kind.
    pub flow: String,
    /// Workflow status.
    pub status: String,
    /// Legal-hold flag.
    pub legal_hold: bool,
    /// Reason recorded with the hold.
    pub legal_hold_reason: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for dossier records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = dossiers)]
pub struct NewDossierRow {
    /// Dossier identifier.
    pub id: uuid::Uuid,
    /// Human-facing case reference.
    pub reference: String,
    /// Flow kind.
    pub flow: String,
    /// Workflow status.
    pub status: String,
    /// Legal-hold flag.
    pub legal_hold: bool,
    /// Reason recorded with the hold.
    pub legal_hold_reason: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query result row for status history events.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = status_history)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct HistoryRow {
    /// Event identifier.
    pub id: uuid::Uuid,
    /// Owning dossier.
    pub dossier_id: uuid::Uuid,
    /// Status the dossier left.
    pub from_status: String,
    /// Status the dossier entered.
    pub to_status: String,
    /// Acting-user identifier.
    pub actor_id: String,
    /// Whether the actor held override privileges.
    pub privileged: bool,
    /// Optional free-text reason.
    pub reason: Option<String>,
    /// Event timestamp.
    pub recorded_at: DateTime<Utc>,
}

/// Insert model for status history events.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = status_history)]
pub struct NewHistoryRow {
    /// Event identifier.
    pub id: uuid::Uuid,
    /// Owning dossier.
    pub dossier_id: uuid::Uuid,
    /// Status the dossier left.
    pub from_status: String,
    /// Status the dossier entered.
    pub to_status: String,
    /// Acting-user identifier.
    pub actor_id: String,
    /// Whether the actor held override privileges.
    pub privileged: bool,
    /// Optional free-text reason.
    pub reason: Option<String>,
    /// Event timestamp.
    pub recorded_at: DateTime<Utc>,
}

/// Insert model for audit-log entries.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = audit_logs)]
pub struct NewAuditRow {
    /// Entry identifier.
    pub id: uuid::Uuid,
    /// Acting-user identifier.
    pub actor_id: String,
    /// Audited action code.
    pub action: String,
    /// Affected entity reference.
    pub target: String,
    /// Optional free-text reason.
    pub reason: Option<String>,
    /// Structured metadata payload.
    pub metadata: Value,
    /// Entry timestamp.
    pub recorded_at: DateTime<Utc>,
}
