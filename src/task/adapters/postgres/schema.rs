//! Diesel schema for task persistence.

diesel::table! {
    /// Task records seeded from catalogue templates or created loose.
    ///
    /// The unique index `idx_tasks_dossier_task_type_unique` over
    /// (dossier_id, task_type) backs seeder idempotence; `NULL` dossier
    /// ids (loose tasks) are exempt per `PostgreSQL` null semantics.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Owning dossier; null for loose tasks.
        dossier_id -> Nullable<Uuid>,
        /// Task-type code from the template catalogue.
        #[max_length = 64]
        task_type -> Varchar,
        /// Rendered title.
        #[max_length = 255]
        title -> Varchar,
        /// Rendered description.
        description -> Nullable<Text>,
        /// Priority level.
        #[max_length = 20]
        priority -> Varchar,
        /// Board column the task occupies.
        #[max_length = 20]
        stage -> Varchar,
        /// Position within the column.
        position -> Int4,
        /// Assigned user, if any.
        #[max_length = 128]
        assignee -> Nullable<Varchar>,
        /// Label set as a JSON array.
        labels -> Jsonb,
        /// Due date, if any.
        due_date -> Nullable<Date>,
        /// Blocked flag.
        blocked -> Bool,
        /// Reason the task is blocked.
        #[max_length = 255]
        blocked_reason -> Nullable<Varchar>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Completion payload (timestamp and source), if completed.
        completion -> Nullable<Jsonb>,
    }
}
