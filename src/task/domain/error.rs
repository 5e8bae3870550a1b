//! Error types for task domain validation and parsing.

use super::TaskId;
use thiserror::Error;

/// Errors returned while constructing or mutating task domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task-type code is empty or contains invalid characters.
    #[error("invalid task type code '{0}', expected lowercase kebab-case")]
    InvalidTaskTypeCode(String),

    /// The task title is empty after rendering.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// An auto-complete rule was built without any fact check.
    #[error("auto-complete rule must contain at least one fact check")]
    EmptyRule,

    /// The task is already completed and cannot be completed again.
    #[error("task {0} is already completed")]
    AlreadyCompleted(TaskId),

    /// A catalogue template failed to render.
    #[error("template '{task_type}' failed to render: {reason}")]
    TemplateRender {
        /// The task-type code of the failing template.
        task_type: String,
        /// The renderer's error message.
        reason: String,
    },
}

/// Error returned while parsing board columns from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown board column: {0}")]
pub struct ParseColumnError(pub String);

/// Error returned while parsing task priorities from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task priority: {0}")]
pub struct ParsePriorityError(pub String);
