//! Task aggregate root and board-facing task types.

use super::{ParseColumnError, ParsePriorityError, TaskDomainError, TaskId, TaskTypeCode};
use crate::dossier::domain::DossierId;
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Kanban column a task occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardColumn {
    /// Work not yet started.
    Todo,
    /// Work in progress.
    Doing,
    /// Work finished.
    Done,
}

impl BoardColumn {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::Doing => "doing",
            Self::Done => "done",
        }
    }

    /// Returns the label shown on the board.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Todo => "To do",
            Self::Doing => "In progress",
            Self::Done => "Done",
        }
    }
}

impl TryFrom<&str> for BoardColumn {
    type Error = ParseColumnError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "todo" => Ok(Self::Todo),
            "doing" => Ok(Self::Doing),
            "done" => Ok(Self::Done),
            _ => Err(ParseColumnError(value.to_owned())),
        }
    }
}

/// Task urgency level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    /// Can wait.
    Low,
    /// Default priority.
    Medium,
    /// Should be picked up next.
    High,
    /// Blocks the case until handled.
    Urgent,
}

impl TaskPriority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl TryFrom<&str> for TaskPriority {
    type Error = ParsePriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            _ => Err(ParsePriorityError(value.to_owned())),
        }
    }
}

/// How a task reached the Done column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CompletionSource {
    /// Completed by hand on the task board.
    Manual,
    /// Completed by the auto-completion evaluator; carries the fired
    /// predicate's description for auditability.
    Predicate {
        /// Description of the rule that fired.
        rule: String,
    },
}

/// Completion metadata set when a task reaches Done.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCompletion {
    /// When the task was completed.
    pub completed_at: DateTime<Utc>,
    /// What completed it.
    pub source: CompletionSource,
}

/// Which tasks a board view loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardScope {
    /// Only tasks belonging to one dossier.
    Dossier(DossierId),
    /// Every task, including loose tasks with no dossier.
    All,
}

/// Task aggregate root.
///
/// Tasks are instantiated from catalogue templates by the seeder, or
/// created loose (without a dossier). At most one task exists per
/// (dossier, task-type) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    dossier_id: Option<DossierId>,
    task_type: TaskTypeCode,
    title: String,
    description: Option<String>,
    priority: TaskPriority,
    column: BoardColumn,
    position: i32,
    assignee: Option<String>,
    labels: BTreeSet<String>,
    due_date: Option<NaiveDate>,
    blocked: bool,
    blocked_reason: Option<String>,
    created_at: DateTime<Utc>,
    completion: Option<TaskCompletion>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted owning dossier, if any.
    pub dossier_id: Option<DossierId>,
    /// Persisted task-type code.
    pub task_type: TaskTypeCode,
    /// Persisted rendered title.
    pub title: String,
    /// Persisted rendered description, if any.
    pub description: Option<String>,
    /// Persisted priority.
    pub priority: TaskPriority,
    /// Persisted board column.
    pub column: BoardColumn,
    /// Persisted position within the column.
    pub position: i32,
    /// Persisted assignee, if any.
    pub assignee: Option<String>,
    /// Persisted label set.
    pub labels: BTreeSet<String>,
    /// Persisted due date, if any.
    pub due_date: Option<NaiveDate>,
    /// Persisted blocked flag.
    pub blocked: bool,
    /// Persisted blocked reason, if any.
    pub blocked_reason: Option<String>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted completion metadata, if any.
    pub completion: Option<TaskCompletion>,
}

impl Task {
    /// Creates a task seeded from a catalogue template.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the rendered title is
    /// empty.
    pub fn seeded(
        dossier_id: DossierId,
        task_type: TaskTypeCode,
        title: impl Into<String>,
        description: Option<String>,
        priority: TaskPriority,
        position: i32,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }
        Ok(Self {
            id: TaskId::new(),
            dossier_id: Some(dossier_id),
            task_type,
            title,
            description,
            priority,
            column: BoardColumn::Todo,
            position,
            assignee: None,
            labels: BTreeSet::new(),
            due_date: None,
            blocked: false,
            blocked_reason: None,
            created_at: clock.utc(),
            completion: None,
        })
    }

    /// Creates a loose task with no owning dossier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the title is empty.
    pub fn loose(
        task_type: TaskTypeCode,
        title: impl Into<String>,
        priority: TaskPriority,
        position: i32,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }
        Ok(Self {
            id: TaskId::new(),
            dossier_id: None,
            task_type,
            title,
            description: None,
            priority,
            column: BoardColumn::Todo,
            position,
            assignee: None,
            labels: BTreeSet::new(),
            due_date: None,
            blocked: false,
            blocked_reason: None,
            created_at: clock.utc(),
            completion: None,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            dossier_id: data.dossier_id,
            task_type: data.task_type,
            title: data.title,
            description: data.description,
            priority: data.priority,
            column: data.column,
            position: data.position,
            assignee: data.assignee,
            labels: data.labels,
            due_date: data.due_date,
            blocked: data.blocked,
            blocked_reason: data.blocked_reason,
            created_at: data.created_at,
            completion: data.completion,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning dossier, if any.
    #[must_use]
    pub const fn dossier_id(&self) -> Option<DossierId> {
        self.dossier_id
    }

    /// Returns the task-type code.
    #[must_use]
    pub const fn task_type(&self) -> &TaskTypeCode {
        &self.task_type
    }

    /// Returns the rendered title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the rendered description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the board column.
    #[must_use]
    pub const fn column(&self) -> BoardColumn {
        self.column
    }

    /// Returns the position within the column.
    #[must_use]
    pub const fn position(&self) -> i32 {
        self.position
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub fn assignee(&self) -> Option<&str> {
        self.assignee.as_deref()
    }

    /// Returns the label set.
    #[must_use]
    pub const fn labels(&self) -> &BTreeSet<String> {
        &self.labels
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Returns whether the task is blocked.
    #[must_use]
    pub const fn is_blocked(&self) -> bool {
        self.blocked
    }

    /// Returns the blocked reason, if any.
    #[must_use]
    pub fn blocked_reason(&self) -> Option<&str> {
        self.blocked_reason.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the completion metadata, if any.
    #[must_use]
    pub const fn completion(&self) -> Option<&TaskCompletion> {
        self.completion.as_ref()
    }

    /// Returns whether the task counts as open for the transition gate.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.column != BoardColumn::Done
    }

    /// Assigns the task to a user.
    pub fn assign(&mut self, assignee: impl Into<String>) {
        self.assignee = Some(assignee.into());
    }

    /// Adds a label.
    pub fn add_label(&mut self, label: impl Into<String>) {
        self.labels.insert(label.into());
    }

    /// Sets the due date.
    pub const fn set_due_date(&mut self, due_date: NaiveDate) {
        self.due_date = Some(due_date);
    }

    /// Flags the task as blocked with a reason.
    pub fn block(&mut self, reason: impl Into<String>) {
        self.blocked = true;
        self.blocked_reason = Some(reason.into());
    }

    /// Clears the blocked flag.
    pub fn unblock(&mut self) {
        self.blocked = false;
        self.blocked_reason = None;
    }

    /// Places the task in a column at a position.
    ///
    /// Entering Done records a manual completion; leaving Done reopens the
    /// task and clears the completion metadata.
    pub fn place(&mut self, column: BoardColumn, position: i32, clock: &impl Clock) {
        self.column = column;
        self.position = position;
        match column {
            BoardColumn::Done => {
                if self.completion.is_none() {
                    self.completion = Some(TaskCompletion {
                        completed_at: clock.utc(),
                        source: CompletionSource::Manual,
                    });
                }
            }
            BoardColumn::Todo | BoardColumn::Doing => {
                self.completion = None;
            }
        }
    }

    /// Completes the task through a fired auto-completion rule.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::AlreadyCompleted`] when the task is
    /// already in the Done column; the evaluator never reverses a
    /// completion.
    pub fn complete_via_rule(
        &mut self,
        rule: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if self.column == BoardColumn::Done {
            return Err(TaskDomainError::AlreadyCompleted(self.id));
        }
        self.column = BoardColumn::Done;
        self.completion = Some(TaskCompletion {
            completed_at: clock.utc(),
            source: CompletionSource::Predicate { rule: rule.into() },
        });
        Ok(())
    }
}
