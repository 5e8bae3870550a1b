//! Error types for board operations.

use crate::task::domain::TaskId;
use crate::task::ports::TaskRepositoryError;
use thiserror::Error;

/// Errors returned by board operations.
#[derive(Debug, Error)]
pub enum BoardError {
    /// The task is not on this board.
    #[error("task not on board: {0}")]
    TaskNotFound(TaskId),

    /// Blocked tasks cannot be moved by drag interaction.
    #[error("task {task_id} is blocked{}", reason_suffix(.reason))]
    TaskBlocked {
        /// The blocked task.
        task_id: TaskId,
        /// The reason recorded when the task was blocked.
        reason: Option<String>,
    },

    /// Persisting the move failed; the optimistic local state has been
    /// rolled back.
    #[error(transparent)]
    Persistence(#[from] TaskRepositoryError),
}

fn reason_suffix(reason: &Option<String>) -> String {
    reason
        .as_deref()
        .map(|text| format!(": {text}"))
        .unwrap_or_default()
}
