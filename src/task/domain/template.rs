//! Catalogue task templates and their instantiation.

use super::{AutoCompleteRule, Task, TaskDomainError, TaskPriority, TaskTypeCode};
use crate::dossier::domain::Dossier;
use minijinja::Environment;
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One catalogue entry describing a task to seed.
///
/// Title and description are minijinja templates rendered against the
/// dossier's reference and flow at seeding time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskTemplate {
    task_type: TaskTypeCode,
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    priority: TaskPriority,
    #[serde(skip_serializing_if = "Option::is_none")]
    rule: Option<AutoCompleteRule>,
    order: u32,
}

impl TaskTemplate {
    /// Creates a template with the default Medium priority.
    #[must_use]
    pub fn new(task_type: TaskTypeCode, title: impl Into<String>, order: u32) -> Self {
        Self {
            task_type,
            title: title.into(),
            description: None,
            priority: TaskPriority::Medium,
            rule: None,
            order,
        }
    }

    /// Sets the description template.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Overrides the default priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Attaches an auto-completion rule.
    #[must_use]
    pub fn with_rule(mut self, rule: AutoCompleteRule) -> Self {
        self.rule = Some(rule);
        self
    }

    /// Returns the task-type code.
    #[must_use]
    pub const fn task_type(&self) -> &TaskTypeCode {
        &self.task_type
    }

    /// Returns the default priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the auto-completion rule, if any.
    #[must_use]
    pub const fn rule(&self) -> Option<&AutoCompleteRule> {
        self.rule.as_ref()
    }

    /// Returns the ordering index within the phase.
    #[must_use]
    pub const fn order(&self) -> u32 {
        self.order
    }

    /// Instantiates a concrete task for a dossier at the given position.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::TemplateRender`] when a template fails to
    /// render, or [`TaskDomainError::EmptyTitle`] when the rendered title is
    /// empty.
    pub fn instantiate(
        &self,
        dossier: &Dossier,
        position: i32,
        clock: &impl Clock,
    ) -> Result<Task, TaskDomainError> {
        let context = render_context(dossier);
        let title = self.render(&self.title, &context)?;
        let description = self
            .description
            .as_ref()
            .map(|template| self.render(template, &context))
            .transpose()?;

        Task::seeded(
            dossier.id(),
            self.task_type.clone(),
            title,
            description,
            self.priority,
            position,
            clock,
        )
    }

    fn render(&self, template: &str, context: &Map<String, Value>) -> Result<String, TaskDomainError> {
        let environment = Environment::new();
        environment
            .render_str(template, context)
            .map_err(|error| TaskDomainError::TemplateRender {
                task_type: self.task_type.as_str().to_owned(),
                reason: error.to_string(),
            })
    }
}

fn render_context(dossier: &Dossier) -> Map<String, Value> {
    let mut context = Map::new();
    context.insert(
        "reference".to_owned(),
        Value::String(dossier.reference().as_str().to_owned()),
    );
    context.insert(
        "flow".to_owned(),
        Value::String(dossier.flow().as_str().to_owned()),
    );
    context
}
