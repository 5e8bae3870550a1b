//! Repository port for task persistence and board queries.

use crate::dossier::domain::DossierId;
use crate::task::domain::{BoardScope, Task, TaskId, TaskTypeCode};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
///
/// Implementations must enforce uniqueness of (dossier, task-type) at the
/// storage layer; the seeder's existence check alone is not atomic under
/// concurrent seeding.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a batch of new tasks atomically: either every task is
    /// inserted or none is.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when a task ID
    /// already exists or [`TaskRepositoryError::DuplicateTaskType`] when a
    /// (dossier, task-type) pair is already taken.
    async fn insert_batch(&self, tasks: &[Task]) -> TaskRepositoryResult<()>;

    /// Persists changes to an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn update(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns all tasks belonging to a dossier.
    async fn list_for_dossier(&self, dossier_id: DossierId) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns all tasks visible in a board scope.
    async fn list_for_scope(&self, scope: &BoardScope) -> TaskRepositoryResult<Vec<Task>>;

    /// Counts a dossier's tasks outside the Done column.
    async fn count_open_for_dossier(&self, dossier_id: DossierId) -> TaskRepositoryResult<usize>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// A task of this type already exists for the dossier.
    #[error("task type '{task_type}' already seeded for dossier {dossier_id}")]
    DuplicateTaskType {
        /// The owning dossier.
        dossier_id: DossierId,
        /// The already-taken task-type code.
        task_type: TaskTypeCode,
    },

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
