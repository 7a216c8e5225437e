use crate::{App, TaskFormError};
use taskflow_core::{CreateTaskData, Task, TaskPriority, TaskUpdate, parse_due_date};
use tracing::debug;

/// Raw form inputs, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    pub category: String,
    /// `YYYY-MM-DD`, or empty for no due date.
    pub due_date: String,
}

impl TaskForm {
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            priority: task.priority,
            category: task.category.clone(),
            due_date: task
                .due_date
                .map(|due| due.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> Result<CreateTaskData, TaskFormError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(TaskFormError::TitleRequired);
        }
        let category = self.category.trim();
        if category.is_empty() {
            return Err(TaskFormError::CategoryRequired);
        }

        let description = Some(self.description.trim())
            .filter(|d| !d.is_empty())
            .map(str::to_string);
        let due_date = match self.due_date.trim() {
            "" => None,
            raw => Some(parse_due_date(raw)?),
        };

        Ok(CreateTaskData {
            title: title.to_string(),
            description,
            priority: self.priority,
            category: category.to_string(),
            due_date,
        })
    }
}

/// Create/edit dialog for a single task.
pub struct TaskModal {
    app: App,
    editing: Option<Task>,
    form: TaskForm,
    open: bool,
}

impl TaskModal {
    pub fn create(app: &App) -> Self {
        Self {
            app: app.clone(),
            editing: None,
            form: TaskForm::default(),
            open: true,
        }
    }

    pub fn edit(app: &App, task: Task) -> Self {
        Self {
            app: app.clone(),
            form: TaskForm::from_task(&task),
            editing: Some(task),
            open: true,
        }
    }

    pub fn heading(&self) -> &'static str {
        if self.editing.is_some() {
            "Edit Task"
        } else {
            "Create New Task"
        }
    }

    pub fn editing(&self) -> Option<&Task> {
        self.editing.as_ref()
    }

    pub fn form(&self) -> &TaskForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut TaskForm {
        &mut self.form
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Save the form. On success the modal closes and the stored task is returned;
    /// otherwise the modal stays open with the form as it was.
    pub async fn submit(&mut self) -> Option<Task> {
        let data = match self.form.validate() {
            Ok(data) => data,
            Err(err) => {
                debug!("Task form rejected: {}", err);
                self.app.toaster().error(&err.to_string());
                return None;
            }
        };

        let tasks = self.app.tasks();
        let (result, saved_message) = match &self.editing {
            Some(task) => {
                // The form only holds the day; an untouched day keeps the stored time
                let due_date = if self.form.due_date.trim() == TaskForm::from_task(task).due_date {
                    task.due_date
                } else {
                    data.due_date
                };
                let changes = TaskUpdate::new()
                    .with_title(data.title)
                    .with_description(data.description)
                    .with_priority(data.priority)
                    .with_category(data.category)
                    .with_due_date(due_date);
                (
                    tasks.update_task(task.id, changes).await,
                    "Task updated successfully!",
                )
            }
            None => (tasks.create_task(data).await, "Task created successfully!"),
        };

        match result {
            Ok(task) => {
                self.app.toaster().success(saved_message);
                self.open = false;
                Some(task)
            }
            Err(_) => {
                self.app.toaster().error("Failed to save task");
                None
            }
        }
    }
}
