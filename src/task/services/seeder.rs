//! Idempotent phase-entry task seeding.

use crate::dossier::domain::Dossier;
use crate::task::{
    domain::{BoardColumn, LifecyclePhase, Task, TaskDomainError, TaskTypeCode, TemplateCatalog},
    ports::{TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for task seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    /// A catalogue template failed to instantiate.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

/// Result type for seeding operations.
pub type SeedResult<T> = Result<T, SeedError>;

/// Seeds the catalogue's task set for a dossier's current phase.
///
/// Seeding is idempotent and safe to invoke repeatedly or concurrently:
/// the existing-type set check plus the storage-level uniqueness
/// constraint guarantee at most one task per (dossier, task-type), and a
/// duplicate-key rejection from a lost race is treated as a successful
/// no-op.
pub struct TaskSeeder<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    catalog: Arc<TemplateCatalog>,
    clock: Arc<C>,
}

impl<R, C> Clone for TaskSeeder<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            catalog: Arc::clone(&self.catalog),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R, C> TaskSeeder<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new seeder over a repository and catalogue.
    #[must_use]
    pub const fn new(repository: Arc<R>, catalog: Arc<TemplateCatalog>, clock: Arc<C>) -> Self {
        Self {
            repository,
            catalog,
            clock,
        }
    }

    /// Seeds the missing tasks for the dossier's current phase.
    ///
    /// Returns the number of tasks created; zero when the flow or phase
    /// has no templates, when every template is already instantiated, or
    /// when a concurrent caller seeded first. Never mutates dossier
    /// status.
    ///
    /// # Errors
    ///
    /// Returns [`SeedError`] when template rendering fails or the
    /// repository rejects the batch for a reason other than the
    /// uniqueness constraint.
    pub async fn seed(&self, dossier: &Dossier) -> SeedResult<usize> {
        let phase = LifecyclePhase::for_status(dossier.status());
        let templates = self.catalog.templates_for(dossier.flow(), phase);
        if templates.is_empty() {
            return Ok(0);
        }

        let existing = self.repository.list_for_dossier(dossier.id()).await?;
        let existing_types: BTreeSet<&TaskTypeCode> =
            existing.iter().map(Task::task_type).collect();
        let next_position = existing
            .iter()
            .filter(|task| task.column() == BoardColumn::Todo)
            .map(Task::position)
            .max()
            .map_or(0, |max| max.saturating_add(1));

        let missing: Vec<_> = templates
            .iter()
            .filter(|template| !existing_types.contains(template.task_type()))
            .collect();
        if missing.is_empty() {
            return Ok(0);
        }

        let mut batch = Vec::with_capacity(missing.len());
        for (offset, template) in missing.iter().enumerate() {
            let position = next_position.saturating_add(to_offset(offset));
            batch.push(template.instantiate(dossier, position, &*self.clock)?);
        }

        match self.repository.insert_batch(&batch).await {
            Ok(()) => {
                tracing::info!(
                    dossier = %dossier.id(),
                    phase = phase.as_str(),
                    created = batch.len(),
                    "seeded phase tasks"
                );
                Ok(batch.len())
            }
            // Another caller seeded between our existence check and the
            // insert; the constraint did its job.
            Err(TaskRepositoryError::DuplicateTaskType { .. }) => Ok(0),
            Err(err) => Err(err.into()),
        }
    }
}

fn to_offset(offset: usize) -> i32 {
    i32::try_from(offset).unwrap_or(i32::MAX)
}
