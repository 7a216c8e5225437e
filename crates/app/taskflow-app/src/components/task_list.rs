use crate::App;
use crate::components::{TaskCard, TaskModal};
use taskflow_core::Task;

#[derive(Debug, Clone, PartialEq)]
pub enum TaskListState {
    Loading,
    Empty,
    Tasks(Vec<Task>),
}

/// The filtered task list and the modal it opens.
pub struct TaskList {
    app: App,
    modal: Option<TaskModal>,
}

impl TaskList {
    pub fn new(app: &App) -> Self {
        Self {
            app: app.clone(),
            modal: None,
        }
    }

    pub fn state(&self) -> TaskListState {
        if self.app.tasks().loading() {
            return TaskListState::Loading;
        }
        let visible = self.app.tasks().filtered_tasks();
        if visible.is_empty() {
            TaskListState::Empty
        } else {
            TaskListState::Tasks(visible)
        }
    }

    pub fn heading(&self) -> String {
        format!("Tasks ({})", self.app.tasks().filtered_tasks().len())
    }

    pub fn cards(&self) -> Vec<TaskCard> {
        self.app
            .tasks()
            .filtered_tasks()
            .into_iter()
            .map(|task| TaskCard::new(&self.app, task))
            .collect()
    }

    pub fn open_create(&mut self) {
        self.modal = Some(TaskModal::create(&self.app));
    }

    pub fn open_edit(&mut self, task: Task) {
        self.modal = Some(TaskModal::edit(&self.app, task));
    }

    /// The open modal, if any. A modal closed by a successful save is discarded.
    pub fn modal_mut(&mut self) -> Option<&mut TaskModal> {
        if self.modal.as_ref().is_some_and(|modal| !modal.is_open()) {
            self.modal = None;
        }
        self.modal.as_mut()
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Harness, task};
    use taskflow_core::{FilterPatch, TaskStatus};

    #[tokio::test]
    async fn test_empty_state() {
        let harness = Harness::with_rows(Vec::new()).await;
        let list = TaskList::new(&harness.app);
        assert_eq!(list.state(), TaskListState::Empty);
        assert_eq!(list.heading(), "Tasks (0)");
        assert!(list.cards().is_empty());
    }

    #[tokio::test]
    async fn test_lists_filtered_tasks() {
        let harness = Harness::with_rows(vec![
            task("Write report", TaskStatus::Completed, "work"),
            task("Buy milk", TaskStatus::Pending, "home"),
        ])
        .await;
        harness
            .app
            .tasks()
            .set_filters(FilterPatch::new().status(Some(TaskStatus::Completed)));

        let list = TaskList::new(&harness.app);
        assert_eq!(list.heading(), "Tasks (1)");
        match list.state() {
            TaskListState::Tasks(tasks) => assert_eq!(tasks[0].title, "Write report"),
            other => panic!("unexpected state {other:?}"),
        }
        assert_eq!(list.cards()[0].task().title, "Write report");
    }

    #[tokio::test]
    async fn test_modal_lifecycle() {
        let row = task("Edit me", TaskStatus::Pending, "work");
        let harness = Harness::with_rows(vec![row.clone()]).await;
        let mut list = TaskList::new(&harness.app);
        assert!(list.modal_mut().is_none());

        list.open_edit(row);
        let modal = list.modal_mut().unwrap();
        assert_eq!(modal.heading(), "Edit Task");
        modal.form_mut().title = "Edited".to_string();
        modal.submit().await.unwrap();

        assert!(list.modal_mut().is_none());
        assert_eq!(harness.app.tasks().tasks()[0].title, "Edited");

        list.open_create();
        assert_eq!(list.modal_mut().unwrap().heading(), "Create New Task");
        list.close_modal();
        assert!(list.modal_mut().is_none());
    }
}
