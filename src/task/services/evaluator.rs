//! Predicate-driven task auto-completion.

use crate::dossier::domain::Dossier;
use crate::task::{
    domain::{AutoCompleteRule, Task, TaskTypeCode, TemplateCatalog},
    ports::{FactStore, FactStoreError, TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Why one task could not be evaluated or persisted.
#[derive(Debug, Error)]
pub enum TaskEvaluationError {
    /// The fact source failed while answering a check.
    #[error(transparent)]
    Facts(#[from] FactStoreError),
    /// The completed task could not be persisted.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

/// One task whose evaluation failed; the batch continues past it.
#[derive(Debug)]
pub struct TaskEvaluationFailure {
    /// The task type that failed to evaluate.
    pub task_type: TaskTypeCode,
    /// The underlying error.
    pub error: TaskEvaluationError,
}

/// Result of one evaluation sweep over a dossier's open tasks.
#[derive(Debug, Default)]
pub struct EvaluationOutcome {
    /// Task types flipped to Done in this sweep.
    pub completed: Vec<TaskTypeCode>,
    /// Per-task failures collected without aborting the sweep.
    pub failures: Vec<TaskEvaluationFailure>,
}

/// Errors that abort an evaluation sweep before it can start.
#[derive(Debug, Error)]
pub enum EvaluatorError {
    /// The dossier's task list could not be loaded.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

/// Evaluates auto-completion predicates against the trigger-fact store.
///
/// Each sweep is short-lived and safely re-invocable; completion is
/// monotonic because Done tasks are filtered out before evaluation and
/// the domain refuses to complete a completed task.
#[derive(Clone)]
pub struct AutoCompletionEvaluator<R, F, C>
where
    R: TaskRepository,
    F: FactStore,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    facts: Arc<F>,
    catalog: Arc<TemplateCatalog>,
    clock: Arc<C>,
}

impl<R, F, C> AutoCompletionEvaluator<R, F, C>
where
    R: TaskRepository,
    F: FactStore,
    C: Clock + Send + Sync,
{
    /// Creates a new evaluator.
    #[must_use]
    pub const fn new(
        repository: Arc<R>,
        facts: Arc<F>,
        catalog: Arc<TemplateCatalog>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            repository,
            facts,
            catalog,
            clock,
        }
    }

    /// Sweeps the dossier's open tasks and completes those whose rule is
    /// fully satisfied.
    ///
    /// Tasks without a rule are skipped; they require manual completion
    /// on the board. A fact-source failure for one task is collected in
    /// the outcome and does not abort evaluation of the others.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluatorError::Repository`] only when the task list
    /// itself cannot be loaded.
    pub async fn evaluate(&self, dossier: &Dossier) -> Result<EvaluationOutcome, EvaluatorError> {
        let tasks = self.repository.list_for_dossier(dossier.id()).await?;
        let mut outcome = EvaluationOutcome::default();

        for task in tasks {
            if !task.is_open() {
                continue;
            }
            let Some(rule) = self.catalog.rule_for(dossier.flow(), task.task_type()) else {
                continue;
            };

            match self.try_complete(dossier, task, rule.clone()).await {
                Ok(Some(task_type)) => outcome.completed.push(task_type),
                Ok(None) => {}
                Err((task_type, error)) => {
                    tracing::warn!(
                        dossier = %dossier.id(),
                        task_type = %task_type,
                        error = %error,
                        "task evaluation failed"
                    );
                    outcome.failures.push(TaskEvaluationFailure { task_type, error });
                }
            }
        }

        Ok(outcome)
    }

    /// Evaluates one task's rule; completes and persists it when every
    /// check holds.
    async fn try_complete(
        &self,
        dossier: &Dossier,
        mut task: Task,
        rule: AutoCompleteRule,
    ) -> Result<Option<TaskTypeCode>, (TaskTypeCode, TaskEvaluationError)> {
        let task_type = task.task_type().clone();

        for check in rule.checks() {
            let satisfied = self
                .facts
                .is_satisfied(dossier.id(), check)
                .await
                .map_err(|err| (task_type.clone(), TaskEvaluationError::from(err)))?;
            if !satisfied {
                return Ok(None);
            }
        }

        // The domain guards monotonicity; an open task cannot already be
        // completed, so this only fails on misuse.
        if task.complete_via_rule(rule.describe(), &*self.clock).is_err() {
            return Ok(None);
        }
        self.repository
            .update(&task)
            .await
            .map_err(|err| (task_type.clone(), TaskEvaluationError::from(err)))?;
        Ok(Some(task_type))
    }
}
