//! Diesel schema for dossier lifecycle persistence.

diesel::table! {
    /// Dossier case records.
    dossiers (id) {
        /// Dossier identifier.
        id -> Uuid,
        /// Human-facing case reference, unique per organisation.
        #[max_length = 64]
        reference -> Varchar,
        /// Flow kind deciding the applicable template catalogue.
        #[max_length = 20]
        flow -> Varchar,
        /// Current workflow status.
        #[max_length = 20]
        status -> Varchar,
        /// Legal-hold flag; blocks every transition while set.
        legal_hold -> Bool,
        /// Reason recorded when the hold was placed.
        #[max_length = 255]
        legal_hold_reason -> Nullable<Varchar>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last mutation timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only status transition history.
    status_history (id) {
        /// Event identifier.
        id -> Uuid,
        /// Owning dossier.
        dossier_id -> Uuid,
        /// Status the dossier left.
        #[max_length = 20]
        from_status -> Varchar,
        /// Status the dossier entered.
        #[max_length = 20]
        to_status -> Varchar,
        /// Acting-user identifier.
        #[max_length = 128]
        actor_id -> Varchar,
        /// Whether the actor held override privileges.
        privileged -> Bool,
        /// Optional free-text reason.
        #[max_length = 255]
        reason -> Nullable<Varchar>,
        /// Event timestamp.
        recorded_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only generic audit trail.
    audit_logs (id) {
        /// Entry identifier.
        id -> Uuid,
        /// Acting-user identifier.
        #[max_length = 128]
        actor_id -> Varchar,
        /// Audited action code.
        #[max_length = 40]
        action -> Varchar,
        /// Affected entity reference.
        #[max_length = 128]
        target -> Varchar,
        /// Optional free-text reason.
        #[max_length = 255]
        reason -> Nullable<Varchar>,
        /// Structured action-specific metadata.
        metadata -> Jsonb,
        /// Entry timestamp.
        recorded_at -> Timestamptz,
    }
}
