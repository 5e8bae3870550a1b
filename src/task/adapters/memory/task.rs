//! In-memory task repository for orchestration tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::dossier::domain::DossierId;
use crate::task::{
    domain::{BoardScope, Task, TaskId, TaskTypeCode},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
///
/// The single write lock plays the role of the database transaction:
/// `insert_batch` checks the (dossier, task-type) uniqueness and inserts
/// under one lock acquisition, so concurrent seeders observe the same
/// all-or-nothing behaviour as the unique index gives the `PostgreSQL`
/// adapter.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    type_index: HashMap<(DossierId, TaskTypeCode), TaskId>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn insert_batch(&self, tasks: &[Task]) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;

        for task in tasks {
            if state.tasks.contains_key(&task.id()) {
                return Err(TaskRepositoryError::DuplicateTask(task.id()));
            }
            if let Some(dossier_id) = task.dossier_id() {
                let key = (dossier_id, task.task_type().clone());
                if state.type_index.contains_key(&key) {
                    return Err(TaskRepositoryError::DuplicateTaskType {
                        dossier_id,
                        task_type: task.task_type().clone(),
                    });
                }
            }
        }

        for task in tasks {
            if let Some(dossier_id) = task.dossier_id() {
                state
                    .type_index
                    .insert((dossier_id, task.task_type().clone()), task.id());
            }
            state.tasks.insert(task.id(), task.clone());
        }
        Ok(())
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if !state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::NotFound(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn list_for_dossier(&self, dossier_id: DossierId) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| task.dossier_id() == Some(dossier_id))
            .cloned()
            .collect();
        tasks.sort_by_key(|task| (task.column(), task.position()));
        Ok(tasks)
    }

    async fn list_for_scope(&self, scope: &BoardScope) -> TaskRepositoryResult<Vec<Task>> {
        match scope {
            BoardScope::Dossier(dossier_id) => self.list_for_dossier(*dossier_id).await,
            BoardScope::All => {
                let state = self.state.read().map_err(lock_error)?;
                let mut tasks: Vec<Task> = state.tasks.values().cloned().collect();
                tasks.sort_by_key(|task| (task.column(), task.position()));
                Ok(tasks)
            }
        }
    }

    async fn count_open_for_dossier(
        &self,
        dossier_id: DossierId,
    ) -> TaskRepositoryResult<usize> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .tasks
            .values()
            .filter(|task| task.dossier_id() == Some(dossier_id) && task.is_open())
            .count())
    }
}
