use crate::App;
use chrono::{DateTime, Utc};
use futures_signals::signal::{Signal, SignalExt};
use taskflow_core::DashboardStats;

/// One summary tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    pub title: &'static str,
    pub value: usize,
}

/// Summary tiles over the whole collection, ignoring the active filters.
pub struct Dashboard {
    app: App,
}

impl Dashboard {
    pub fn new(app: &App) -> Self {
        Self { app: app.clone() }
    }

    pub fn stats_at(&self, now: DateTime<Utc>) -> DashboardStats {
        DashboardStats::compute(&self.app.tasks().tasks(), now)
    }

    pub fn stats(&self) -> DashboardStats {
        self.stats_at(Utc::now())
    }

    pub fn stats_signal(&self) -> impl Signal<Item = DashboardStats> + use<> {
        self.app
            .tasks()
            .tasks_signal()
            .map(|tasks| DashboardStats::compute(&tasks, Utc::now()))
    }

    pub fn cards(stats: &DashboardStats) -> [StatCard; 4] {
        [
            StatCard {
                title: "Total Tasks",
                value: stats.total,
            },
            StatCard {
                title: "Completed",
                value: stats.completed,
            },
            StatCard {
                title: "In Progress",
                value: stats.in_progress,
            },
            StatCard {
                title: "Overdue",
                value: stats.overdue,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Harness, at, task};
    use taskflow_core::TaskStatus;

    #[tokio::test]
    async fn test_dashboard_projection() {
        let mut late = task("Late", TaskStatus::InProgress, "work");
        late.due_date = Some(at(10));
        let mut done_late = task("Done", TaskStatus::Completed, "work");
        done_late.due_date = Some(at(10));
        let harness = Harness::with_rows(vec![
            late,
            done_late,
            task("Fresh", TaskStatus::Pending, "home"),
        ])
        .await;

        let dashboard = Dashboard::new(&harness.app);
        let stats = dashboard.stats_at(at(19));
        assert_eq!(stats.total, 3);
        assert_eq!(stats.overdue, 1);
        assert_eq!(stats.completion_rate, 33);

        let cards = Dashboard::cards(&stats);
        assert_eq!(cards[0], StatCard { title: "Total Tasks", value: 3 });
        assert_eq!(cards[2].value, 1);
    }

    #[tokio::test]
    async fn test_empty_dashboard() {
        let harness = Harness::with_rows(Vec::new()).await;
        let stats = Dashboard::new(&harness.app).stats();
        assert_eq!(stats, DashboardStats::default());
    }
}
