//! Board activity records.

use crate::dossier::domain::DossierId;
use crate::task::domain::{BoardColumn, Task, TaskId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Record of one task move between board columns.
///
/// Column labels are captured at move time so the feed stays readable
/// even if labels are renamed later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskMovedActivity {
    /// Activity identifier.
    pub id: Uuid,
    /// The moved task.
    pub task_id: TaskId,
    /// The task's dossier, if it has one.
    pub dossier_id: Option<DossierId>,
    /// Column the task left.
    pub from: BoardColumn,
    /// Label of the column the task left.
    pub from_label: String,
    /// Column the task entered.
    pub to: BoardColumn,
    /// Label of the column the task entered.
    pub to_label: String,
    /// When the move happened.
    pub recorded_at: DateTime<Utc>,
}

impl TaskMovedActivity {
    /// Records a move of `task` from `from` to its current column.
    #[must_use]
    pub fn record(task: &Task, from: BoardColumn, clock: &impl Clock) -> Self {
        Self {
            id: Uuid::new_v4(),
            task_id: task.id(),
            dossier_id: task.dossier_id(),
            from,
            from_label: from.label().to_owned(),
            to: task.column(),
            to_label: task.column().label().to_owned(),
            recorded_at: clock.utc(),
        }
    }
}
