//! Client-side filter predicates over the cached task collection.

use crate::types::{Task, TaskPriority, TaskStatus};
use chrono::{DateTime, Utc};

/// Inclusive bounds on a task's due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}

/// Active filter criteria. All present criteria must hold for a task to be shown.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilters {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub category: Option<String>,
    pub search: Option<String>,
    pub date_range: Option<DateRange>,
}

impl TaskFilters {
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.priority.is_none()
            && non_blank(&self.category).is_none()
            && non_blank(&self.search).is_none()
            && self.date_range.is_none()
    }

    pub fn matches(&self, task: &Task) -> bool {
        if self.status.is_some_and(|status| task.status != status) {
            return false;
        }
        if self.priority.is_some_and(|priority| task.priority != priority) {
            return false;
        }
        if let Some(category) = non_blank(&self.category) {
            if task.category != category {
                return false;
            }
        }
        if let Some(search) = non_blank(&self.search) {
            if !task.title.to_lowercase().contains(&search.to_lowercase()) {
                return false;
            }
        }
        if let Some(range) = &self.date_range {
            match task.due_date {
                Some(due) if range.contains(due) => {}
                _ => return false,
            }
        }
        true
    }

    /// The matching tasks, in collection order.
    pub fn apply(&self, tasks: &[Task]) -> Vec<Task> {
        tasks
            .iter()
            .filter(|task| self.matches(task))
            .cloned()
            .collect()
    }

    /// Shallow merge: every key present in `patch` replaces the current value.
    pub fn merge(&mut self, patch: FilterPatch) {
        let FilterPatch {
            status,
            priority,
            category,
            search,
            date_range,
        } = patch;

        if let Some(status) = status {
            self.status = status;
        }
        if let Some(priority) = priority {
            self.priority = priority;
        }
        if let Some(category) = category {
            self.category = category;
        }
        if let Some(search) = search {
            self.search = search;
        }
        if let Some(date_range) = date_range {
            self.date_range = date_range;
        }
    }
}

// An empty string constrains nothing, matching a falsy filter value in the UI.
fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Partial filter update. Per key: `None` keeps the current value, `Some(None)`
/// clears it and `Some(Some(v))` sets it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterPatch {
    pub status: Option<Option<TaskStatus>>,
    pub priority: Option<Option<TaskPriority>>,
    pub category: Option<Option<String>>,
    pub search: Option<Option<String>>,
    pub date_range: Option<Option<DateRange>>,
}

impl FilterPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: Option<TaskStatus>) -> Self {
        self.status = Some(status);
        self
    }

    pub fn priority(mut self, priority: Option<TaskPriority>) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn category(mut self, category: Option<String>) -> Self {
        self.category = Some(category);
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(Some(search.into()));
        self
    }

    pub fn date_range(mut self, date_range: Option<DateRange>) -> Self {
        self.date_range = Some(date_range);
        self
    }

    /// A patch that clears every key.
    pub fn clear_all() -> Self {
        Self {
            status: Some(None),
            priority: Some(None),
            category: Some(None),
            search: Some(None),
            date_range: Some(None),
        }
    }
}
