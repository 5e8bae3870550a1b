//! Diesel row models for task persistence.

use super::schema::tasks;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning dossier; null for loose tasks.
    pub dossier_id: Option<uuid::Uuid>,
    /// Task-type code.
    pub task_type: String,
    /// Rendered title.
    pub title: String,
    /// Rendered description.
    pub description: Option<String>,
    /// Priority level.
    pub priority: String,
    /// Board column.
    pub stage: String,
    /// Position within the column.
    pub position: i32,
    /// Assigned user.
    pub assignee: Option<String>,
    /// Label set as a JSON array.
    pub labels: Value,
    /// Due date.
    pub due_date: Option<NaiveDate>,
    /// Blocked flag.
    pub blocked: bool,
    /// Blocked reason.
    pub blocked_reason: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Completion payload.
    pub completion: Option<Value>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning dossier; null for loose tasks.
    pub dossier_id: Option<uuid::Uuid>,
    /// Task-type code.
    pub task_type: String,
    /// Rendered title.
    pub title: String,
    /// Rendered description.
    pub description: Option<String>,
    /// Priority level.
    pub priority: String,
    /// Board column.
    pub stage: String,
    /// Position within the column.
    pub position: i32,
    /// Assigned user.
    pub assignee: Option<String>,
    /// Label set as a JSON array.
    pub labels: Value,
    /// Due date.
    pub due_date: Option<NaiveDate>,
    /// Blocked flag.
    pub blocked: bool,
    /// Blocked reason.
    pub blocked_reason: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Completion payload.
    pub completion: Option<Value>,
}
