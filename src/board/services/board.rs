//! Task board state with optimistic moves.

use crate::board::{
    domain::{BoardError, BoardFilter, TaskMovedActivity},
    ports::ActivityFeed,
};
use crate::task::{
    domain::{BoardColumn, BoardScope, Task, TaskId},
    ports::TaskRepository,
};
use mockable::Clock;
use std::sync::Arc;

/// The live task collection behind one Kanban view.
///
/// The board holds a locally-mutable copy of its scope's tasks. A move is
/// applied to the local copy first, then persisted; if persistence fails,
/// the pre-move snapshot is restored so the visible state never drifts
/// from storage. This is the explicit contract behind the UI's
/// optimistic-update-with-rollback behaviour: pre-image snapshot, apply,
/// commit or roll back.
pub struct TaskBoard<R, F, C>
where
    R: TaskRepository,
    F: ActivityFeed,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    activity: Arc<F>,
    clock: Arc<C>,
    scope: BoardScope,
    tasks: Vec<Task>,
}

impl<R, F, C> TaskBoard<R, F, C>
where
    R: TaskRepository,
    F: ActivityFeed,
    C: Clock + Send + Sync,
{
    /// Loads a board for the given scope.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Persistence`] when the task list cannot be
    /// loaded.
    pub async fn load(
        repository: Arc<R>,
        activity: Arc<F>,
        clock: Arc<C>,
        scope: BoardScope,
    ) -> Result<Self, BoardError> {
        let tasks = repository.list_for_scope(&scope).await?;
        Ok(Self {
            repository,
            activity,
            clock,
            scope,
            tasks,
        })
    }

    /// Returns the board's scope.
    #[must_use]
    pub const fn scope(&self) -> BoardScope {
        self.scope
    }

    /// Returns the locally-held task list.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Applies a filter as a pure projection over the current task list.
    #[must_use]
    pub fn filtered(&self, filter: &BoardFilter) -> Vec<&Task> {
        filter.apply(&self.tasks)
    }

    /// Re-reads the task list from storage, discarding local state.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Persistence`] when the task list cannot be
    /// loaded.
    pub async fn refresh(&mut self) -> Result<(), BoardError> {
        self.tasks = self.repository.list_for_scope(&self.scope).await?;
        Ok(())
    }

    /// Moves a task to the end of the target column.
    ///
    /// Returns the task's new position. Moving a task onto its current
    /// column is a silent no-op returning the current position. Blocked
    /// tasks are rejected here, at the interface boundary, before any
    /// state changes. Entering Done records a manual completion.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::TaskNotFound`] for unknown tasks,
    /// [`BoardError::TaskBlocked`] for blocked ones, and
    /// [`BoardError::Persistence`] when the write fails; in the latter
    /// case the local state has been rolled back to the pre-move
    /// snapshot.
    pub async fn move_task(
        &mut self,
        task_id: TaskId,
        target: BoardColumn,
    ) -> Result<i32, BoardError> {
        let index = self
            .tasks
            .iter()
            .position(|task| task.id() == task_id)
            .ok_or(BoardError::TaskNotFound(task_id))?;

        let Some(current) = self.tasks.get(index) else {
            return Err(BoardError::TaskNotFound(task_id));
        };
        if current.is_blocked() {
            return Err(BoardError::TaskBlocked {
                task_id,
                reason: current.blocked_reason().map(str::to_owned),
            });
        }
        if current.column() == target {
            return Ok(current.position());
        }

        // Append-only ordering: the task lands after everything already
        // in the target column; no other task shifts.
        let new_position = self
            .tasks
            .iter()
            .filter(|task| task.column() == target)
            .map(Task::position)
            .max()
            .map_or(0, |max| max.saturating_add(1));

        let snapshot = current.clone();
        let from = snapshot.column();

        let Some(task) = self.tasks.get_mut(index) else {
            return Err(BoardError::TaskNotFound(task_id));
        };
        task.place(target, new_position, &*self.clock);
        let moved = task.clone();

        if let Err(error) = self.repository.update(&moved).await {
            // Roll back the optimistic apply before surfacing the failure.
            if let Some(slot) = self.tasks.get_mut(index) {
                *slot = snapshot;
            }
            return Err(error.into());
        }

        let activity = TaskMovedActivity::record(&moved, from, &*self.clock);
        if let Err(error) = self.activity.record_move(&activity).await {
            tracing::warn!(
                task = %task_id,
                error = %error,
                "activity record failed after successful move"
            );
        }

        Ok(new_position)
    }
}
