use crate::App;
use chrono::{DateTime, Utc};
use taskflow_core::{Task, TaskStatus, TaskUpdate};

const DELETE_PROMPT: &str = "Are you sure you want to delete this task?";

/// `Oct 19, 2026`
pub fn format_date(instant: DateTime<Utc>) -> String {
    instant.format("%b %d, %Y").to_string()
}

/// Display projection of a task card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskCardView {
    pub title: String,
    pub description: Option<String>,
    pub status_label: &'static str,
    pub priority_label: &'static str,
    pub category: String,
    pub completed: bool,
    pub overdue: bool,
    pub due_label: Option<String>,
    pub created_label: String,
    /// Present only once the task has been edited.
    pub updated_label: Option<String>,
}

pub struct TaskCard {
    app: App,
    task: Task,
    deleting: bool,
}

impl TaskCard {
    pub fn new(app: &App, task: Task) -> Self {
        Self {
            app: app.clone(),
            task,
            deleting: false,
        }
    }

    pub fn task(&self) -> &Task {
        &self.task
    }

    /// A delete is in flight; the host dims the card and ignores input.
    pub fn is_deleting(&self) -> bool {
        self.deleting
    }

    pub fn view_at(&self, now: DateTime<Utc>) -> TaskCardView {
        let task = &self.task;
        TaskCardView {
            title: task.title.clone(),
            description: task.description.clone().filter(|d| !d.is_empty()),
            status_label: task.status.label(),
            priority_label: task.priority.label(),
            category: task.category.clone(),
            completed: task.status == TaskStatus::Completed,
            overdue: task.is_overdue_at(now),
            due_label: task.due_date.map(format_date),
            created_label: format_date(task.created_at),
            updated_label: task.was_edited().then(|| format_date(task.updated_at)),
        }
    }

    pub fn view(&self) -> TaskCardView {
        self.view_at(Utc::now())
    }

    /// Advance the status one step around pending, in progress, completed.
    pub async fn cycle_status(&mut self) {
        let next = self.task.status.next();
        match self
            .app
            .tasks()
            .update_task(self.task.id, TaskUpdate::status(next))
            .await
        {
            Ok(updated) => {
                self.task = updated;
                self.app.toaster().success("Task status updated!");
            }
            Err(_) => self.app.toaster().error("Failed to update task status"),
        }
    }

    /// Delete after the user confirms. Returns whether the task is gone.
    pub async fn delete(&mut self) -> bool {
        if !self.app.browser().confirm(DELETE_PROMPT) {
            return false;
        }

        self.deleting = true;
        match self.app.tasks().delete_task(self.task.id).await {
            Ok(()) => {
                self.app.toaster().success("Task deleted successfully");
                true
            }
            Err(_) => {
                self.app.toaster().error("Failed to delete task");
                self.deleting = false;
                false
            }
        }
    }
}
