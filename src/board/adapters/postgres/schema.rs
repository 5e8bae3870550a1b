//! Diesel schema for board activity persistence.

diesel::table! {
    /// Append-only record of task moves between board columns.
    task_activities (id) {
        /// Activity identifier.
        id -> Uuid,
        /// The moved task.
        task_id -> Uuid,
        /// The task's dossier, if any.
        dossier_id -> Nullable<Uuid>,
        /// Column the task left.
        #[max_length = 20]
        from_stage -> Varchar,
        /// Label of the column the task left.
        #[max_length = 40]
        from_label -> Varchar,
        /// Column the task entered.
        #[max_length = 20]
        to_stage -> Varchar,
        /// Label of the column the task entered.
        #[max_length = 40]
        to_label -> Varchar,
        /// When the move happened.
        recorded_at -> Timestamptz,
    }
}
