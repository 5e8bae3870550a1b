//! `PostgreSQL` repository implementation for task storage.

use super::{
    models::{NewTaskRow, TaskRow},
    schema::tasks,
};
use crate::dossier::domain::DossierId;
use crate::task::{
    domain::{
        BoardColumn, BoardScope, PersistedTaskData, Task, TaskCompletion, TaskId, TaskPriority,
        TaskTypeCode,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use std::collections::BTreeSet;

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn insert_batch(&self, batch: &[Task]) -> TaskRepositoryResult<()> {
        if batch.is_empty() {
            return Ok(());
        }
        let rows: Vec<NewTaskRow> = batch
            .iter()
            .map(to_new_row)
            .collect::<TaskRepositoryResult<Vec<NewTaskRow>>>()?;
        let keys: Vec<(Option<DossierId>, TaskTypeCode)> = batch
            .iter()
            .map(|task| (task.dossier_id(), task.task_type().clone()))
            .collect();
        let first_id = batch.first().map(Task::id);

        self.run_blocking(move |connection| {
            // Single multi-row INSERT: atomic without an explicit transaction.
            diesel::insert_into(tasks::table)
                .values(&rows)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if is_task_type_unique_violation(info.as_ref()) =>
                    {
                        duplicate_type_error(&keys)
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        first_id.map_or_else(
                            || TaskRepositoryError::persistence(err),
                            TaskRepositoryError::DuplicateTask,
                        )
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let row = to_new_row(task)?;

        self.run_blocking(move |connection| {
            let affected = diesel::update(tasks::table.filter(tasks::id.eq(task_id.into_inner())))
                .set((
                    tasks::title.eq(&row.title),
                    tasks::description.eq(&row.description),
                    tasks::priority.eq(&row.priority),
                    tasks::stage.eq(&row.stage),
                    tasks::position.eq(row.position),
                    tasks::assignee.eq(&row.assignee),
                    tasks::labels.eq(&row.labels),
                    tasks::due_date.eq(row.due_date),
                    tasks::blocked.eq(row.blocked),
                    tasks::blocked_reason.eq(&row.blocked_reason),
                    tasks::completion.eq(&row.completion),
                ))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;

            if affected == 0 {
                return Err(TaskRepositoryError::NotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list_for_dossier(&self, dossier_id: DossierId) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::dossier_id.eq(dossier_id.into_inner()))
                .order((tasks::stage.asc(), tasks::position.asc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn list_for_scope(&self, scope: &BoardScope) -> TaskRepositoryResult<Vec<Task>> {
        match scope {
            BoardScope::Dossier(dossier_id) => self.list_for_dossier(*dossier_id).await,
            BoardScope::All => {
                self.run_blocking(move |connection| {
                    let rows = tasks::table
                        .order((tasks::stage.asc(), tasks::position.asc()))
                        .select(TaskRow::as_select())
                        .load::<TaskRow>(connection)
                        .map_err(TaskRepositoryError::persistence)?;
                    rows.into_iter().map(row_to_task).collect()
                })
                .await
            }
        }
    }

    async fn count_open_for_dossier(
        &self,
        dossier_id: DossierId,
    ) -> TaskRepositoryResult<usize> {
        self.run_blocking(move |connection| {
            let count: i64 = tasks::table
                .filter(tasks::dossier_id.eq(dossier_id.into_inner()))
                .filter(tasks::stage.ne(BoardColumn::Done.as_str()))
                .count()
                .get_result(connection)
                .map_err(TaskRepositoryError::persistence)?;
            usize::try_from(count).map_err(TaskRepositoryError::persistence)
        })
        .await
    }
}

fn to_new_row(task: &Task) -> TaskRepositoryResult<NewTaskRow> {
    let labels =
        serde_json::to_value(task.labels()).map_err(TaskRepositoryError::persistence)?;
    let completion = task
        .completion()
        .map(serde_json::to_value)
        .transpose()
        .map_err(TaskRepositoryError::persistence)?;

    Ok(NewTaskRow {
        id: task.id().into_inner(),
        dossier_id: task.dossier_id().map(DossierId::into_inner),
        task_type: task.task_type().as_str().to_owned(),
        title: task.title().to_owned(),
        description: task.description().map(str::to_owned),
        priority: task.priority().as_str().to_owned(),
        stage: task.column().as_str().to_owned(),
        position: task.position(),
        assignee: task.assignee().map(str::to_owned),
        labels,
        due_date: task.due_date(),
        blocked: task.is_blocked(),
        blocked_reason: task.blocked_reason().map(str::to_owned),
        created_at: task.created_at(),
        completion,
    })
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let task_type =
        TaskTypeCode::new(row.task_type).map_err(TaskRepositoryError::persistence)?;
    let priority = TaskPriority::try_from(row.priority.as_str())
        .map_err(TaskRepositoryError::persistence)?;
    let column =
        BoardColumn::try_from(row.stage.as_str()).map_err(TaskRepositoryError::persistence)?;
    let labels: BTreeSet<String> =
        serde_json::from_value(row.labels).map_err(TaskRepositoryError::persistence)?;
    let completion: Option<TaskCompletion> = row
        .completion
        .map(serde_json::from_value)
        .transpose()
        .map_err(TaskRepositoryError::persistence)?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(row.id),
        dossier_id: row.dossier_id.map(DossierId::from_uuid),
        task_type,
        title: row.title,
        description: row.description,
        priority,
        column,
        position: row.position,
        assignee: row.assignee,
        labels,
        due_date: row.due_date,
        blocked: row.blocked,
        blocked_reason: row.blocked_reason,
        created_at: row.created_at,
        completion,
    }))
}

fn is_task_type_unique_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == "idx_tasks_dossier_task_type_unique")
}

/// Picks the first dossier-owned key for the duplicate-type error detail.
fn duplicate_type_error(
    keys: &[(Option<DossierId>, TaskTypeCode)],
) -> TaskRepositoryError {
    keys.iter()
        .find_map(|(dossier_id, task_type)| {
            dossier_id.map(|id| TaskRepositoryError::DuplicateTaskType {
                dossier_id: id,
                task_type: task_type.clone(),
            })
        })
        .unwrap_or_else(|| {
            TaskRepositoryError::persistence(std::io::Error::other(
                "unique violation without dossier-owned task in batch",
            ))
        })
}
