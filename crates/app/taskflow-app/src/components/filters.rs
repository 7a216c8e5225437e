use crate::App;
use std::collections::BTreeSet;
use taskflow_core::{DateRange, FilterPatch, TaskFilters, TaskPriority, TaskStatus};

/// Status, priority, category and due-date pickers.
pub struct FilterControls {
    app: App,
}

impl FilterControls {
    pub fn new(app: &App) -> Self {
        Self { app: app.clone() }
    }

    pub fn active(&self) -> TaskFilters {
        self.app.tasks().filters()
    }

    pub fn status_options(&self) -> [TaskStatus; 3] {
        TaskStatus::ALL
    }

    pub fn priority_options(&self) -> [TaskPriority; 3] {
        TaskPriority::ALL
    }

    /// Categories present in the collection, sorted and without duplicates.
    pub fn category_options(&self) -> Vec<String> {
        self.app
            .tasks()
            .tasks()
            .into_iter()
            .map(|task| task.category)
            .filter(|category| !category.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn set_status(&self, status: Option<TaskStatus>) {
        self.app.tasks().set_filters(FilterPatch::new().status(status));
    }

    pub fn set_priority(&self, priority: Option<TaskPriority>) {
        self.app
            .tasks()
            .set_filters(FilterPatch::new().priority(priority));
    }

    pub fn set_category(&self, category: Option<String>) {
        self.app
            .tasks()
            .set_filters(FilterPatch::new().category(category));
    }

    pub fn set_date_range(&self, date_range: Option<DateRange>) {
        self.app
            .tasks()
            .set_filters(FilterPatch::new().date_range(date_range));
    }

    pub fn clear(&self) {
        self.app.tasks().clear_filters();
    }
}
