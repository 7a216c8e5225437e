//! Task store: the caller's task collection, its loading flag and the active filters.
//!
//! Mutations wait for the backend and only then touch the local collection, so a
//! failed request leaves the collection exactly as it was.

use crate::error::StoreResult;
use chrono::Utc;
use futures_signals::map_ref;
use futures_signals::signal::{Mutable, MutableSignal, MutableSignalCloned, Signal};
use std::sync::Arc;
use taskflow_backend::TaskTable;
use taskflow_core::{CreateTaskData, FilterPatch, NewTask, Task, TaskFilters, TaskId, TaskUpdate};
use tracing::{debug, error};

#[derive(Clone)]
pub struct TaskStore {
    table: Arc<dyn TaskTable>,
    tasks: Mutable<Vec<Task>>,
    loading: Mutable<bool>,
    filters: Mutable<TaskFilters>,
}

impl TaskStore {
    pub fn new(table: Arc<dyn TaskTable>) -> Self {
        Self {
            table,
            tasks: Mutable::new(Vec::new()),
            loading: Mutable::new(false),
            filters: Mutable::new(TaskFilters::default()),
        }
    }

    /// Replace the collection with the caller's rows, newest first.
    ///
    /// Errors are logged and leave the collection untouched; `loading` is cleared
    /// either way.
    pub async fn fetch_tasks(&self) {
        self.loading.set(true);

        match self.table.select_all().await {
            Ok(tasks) => {
                debug!("Loaded {} tasks", tasks.len());
                self.tasks.set(tasks);
            }
            Err(err) => error!(error = %err, "Error fetching tasks"),
        }

        self.loading.set(false);
    }

    /// Insert a task as pending and put the stored row first.
    pub async fn create_task(&self, data: CreateTaskData) -> StoreResult<Task> {
        let task = self
            .table
            .insert(&NewTask::pending(data))
            .await
            .inspect_err(|err| error!(error = %err, "Error creating task"))?;

        self.tasks.lock_mut().insert(0, task.clone());
        Ok(task)
    }

    /// Send `changes` stamped with the current time and swap in the stored row.
    pub async fn update_task(&self, id: TaskId, changes: TaskUpdate) -> StoreResult<Task> {
        let changes = changes.stamped(Utc::now());
        let task = self
            .table
            .update(id, &changes)
            .await
            .inspect_err(|err| error!(error = %err, task_id = %id, "Error updating task"))?;

        let mut tasks = self.tasks.lock_mut();
        if let Some(slot) = tasks.iter_mut().find(|t| t.id == id) {
            *slot = task.clone();
        }
        Ok(task)
    }

    pub async fn delete_task(&self, id: TaskId) -> StoreResult<()> {
        self.table
            .delete(id)
            .await
            .inspect_err(|err| error!(error = %err, task_id = %id, "Error deleting task"))?;

        self.tasks.lock_mut().retain(|t| t.id != id);
        Ok(())
    }

    /// Merge `patch` into the active filters; keys it leaves out keep their values.
    pub fn set_filters(&self, patch: FilterPatch) {
        self.filters.lock_mut().merge(patch);
    }

    pub fn clear_filters(&self) {
        self.filters.set(TaskFilters::default());
    }

    /// Drop every task, e.g. after sign-out.
    pub fn clear_tasks(&self) {
        self.tasks.set(Vec::new());
    }

    /// Tasks passing every active filter, in collection order. Computed on each call.
    pub fn filtered_tasks(&self) -> Vec<Task> {
        let filters = self.filters.lock_ref();
        filters.apply(&self.tasks.lock_ref())
    }

    pub fn task(&self, id: TaskId) -> Option<Task> {
        self.tasks.lock_ref().iter().find(|t| t.id == id).cloned()
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.tasks.get_cloned()
    }

    pub fn loading(&self) -> bool {
        self.loading.get()
    }

    pub fn filters(&self) -> TaskFilters {
        self.filters.get_cloned()
    }

    pub fn tasks_signal(&self) -> MutableSignalCloned<Vec<Task>> {
        self.tasks.signal_cloned()
    }

    pub fn loading_signal(&self) -> MutableSignal<bool> {
        self.loading.signal()
    }

    pub fn filters_signal(&self) -> MutableSignalCloned<TaskFilters> {
        self.filters.signal_cloned()
    }

    /// Recomputes the filtered view whenever the collection or the filters change.
    pub fn filtered_tasks_signal(&self) -> impl Signal<Item = Vec<Task>> + use<> {
        map_ref! {
            let tasks = self.tasks.signal_cloned(),
            let filters = self.filters.signal_cloned() =>
            filters.apply(tasks)
        }
    }
}
