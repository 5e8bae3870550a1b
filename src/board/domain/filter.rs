//! Pure board filtering.

use crate::task::domain::{Task, TaskPriority};

/// Stateless projection over the board's task list.
///
/// Filtering never touches durable state; it is recomputed from the
/// current task set on every call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardFilter {
    search: Option<String>,
    priority: Option<TaskPriority>,
    assignee: Option<String>,
}

impl BoardFilter {
    /// Creates an empty filter matching every task.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Matches tasks whose title or description contains the text,
    /// case-insensitively.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Matches tasks of exactly this priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Matches tasks assigned to this user.
    #[must_use]
    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    /// Returns whether a single task passes every active criterion.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let in_title = task.title().to_lowercase().contains(&needle);
            let in_description = task
                .description()
                .is_some_and(|description| description.to_lowercase().contains(&needle));
            if !in_title && !in_description {
                return false;
            }
        }
        if let Some(priority) = self.priority {
            if task.priority() != priority {
                return false;
            }
        }
        if let Some(assignee) = &self.assignee {
            if task.assignee() != Some(assignee.as_str()) {
                return false;
            }
        }
        true
    }

    /// Projects the matching tasks out of a list, preserving order.
    #[must_use]
    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks.iter().filter(|task| self.matches(task)).collect()
    }
}
