//! Dashboard summary derived from the task collection.

use crate::types::{Task, TaskStatus};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub overdue: usize,
    /// Completed share of all tasks, as a whole percentage.
    pub completion_rate: u8,
}

impl DashboardStats {
    pub fn compute(tasks: &[Task], now: DateTime<Utc>) -> Self {
        let mut stats = Self {
            total: tasks.len(),
            ..Self::default()
        };

        for task in tasks {
            match task.status {
                TaskStatus::Completed => stats.completed += 1,
                TaskStatus::Pending => stats.pending += 1,
                TaskStatus::InProgress => stats.in_progress += 1,
            }
            if task.is_overdue_at(now) {
                stats.overdue += 1;
            }
        }

        stats.completion_rate = completion_rate(stats.completed, stats.total);
        stats
    }
}

/// `round(100 * completed / total)` with halves rounded up; 0 for an empty collection.
pub fn completion_rate(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total) as u64;
    let total = total as u64;
    ((200 * completed + total) / (2 * total)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TaskPriority;
    use chrono::{Duration, TimeZone};
    use uuid::Uuid;

    fn task(status: TaskStatus, due_in_days: Option<i64>, now: DateTime<Utc>) -> Task {
        Task {
            id: Uuid::new_v4(),
            title: "t".to_string(),
            description: None,
            status,
            priority: TaskPriority::Medium,
            category: "general".to_string(),
            due_date: due_in_days.map(|days| now + Duration::days(days)),
            created_at: now,
            updated_at: now,
            user_id: Uuid::nil(),
            shared_with: None,
            assignee_id: None,
        }
    }

    #[test]
    fn test_completion_rate_rounding() {
        assert_eq!(completion_rate(0, 0), 0);
        assert_eq!(completion_rate(1, 3), 33);
        assert_eq!(completion_rate(2, 3), 67);
        assert_eq!(completion_rate(1, 8), 13);
        assert_eq!(completion_rate(1, 200), 1);
        assert_eq!(completion_rate(4, 4), 100);
    }

    #[test]
    fn test_empty_collection() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(DashboardStats::compute(&[], now), DashboardStats::default());
    }

    #[test]
    fn test_counts_and_overdue() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let tasks = vec![
            task(TaskStatus::Pending, Some(-2), now),
            task(TaskStatus::InProgress, Some(-1), now),
            task(TaskStatus::Completed, Some(-5), now),
            task(TaskStatus::Completed, None, now),
            task(TaskStatus::Pending, Some(3), now),
        ];

        let stats = DashboardStats::compute(&tasks, now);
        assert_eq!(stats.total, 5);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.in_progress, 1);
        assert_eq!(stats.overdue, 2);
        assert_eq!(stats.completion_rate, 40);
    }
}
