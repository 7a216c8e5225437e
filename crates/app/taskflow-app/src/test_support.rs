use crate::{App, Browser, Toaster};
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::{Arc, Mutex};
use taskflow_backend::{InMemoryAuthApi, InMemoryTaskTable};
use taskflow_core::{Task, TaskPriority, TaskStatus};
use url::Url;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Toast {
    Success(String),
    Error(String),
}

#[derive(Default)]
pub struct RecordingToaster {
    toasts: Mutex<Vec<Toast>>,
}

impl RecordingToaster {
    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().unwrap().clone()
    }
}

impl Toaster for RecordingToaster {
    fn success(&self, message: &str) {
        self.toasts
            .lock()
            .unwrap()
            .push(Toast::Success(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.toasts
            .lock()
            .unwrap()
            .push(Toast::Error(message.to_string()));
    }
}

pub struct ScriptedBrowser {
    answer: Mutex<bool>,
    pub prompts: Mutex<Vec<String>>,
    pub visited: Mutex<Vec<Url>>,
}

impl ScriptedBrowser {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer: Mutex::new(answer),
            prompts: Mutex::default(),
            visited: Mutex::default(),
        }
    }
}

impl Browser for ScriptedBrowser {
    fn confirm(&self, message: &str) -> bool {
        self.prompts.lock().unwrap().push(message.to_string());
        *self.answer.lock().unwrap()
    }

    fn navigate(&self, url: &Url) {
        self.visited.lock().unwrap().push(url.clone());
    }
}

pub struct Harness {
    pub app: App,
    pub auth_api: InMemoryAuthApi,
    pub table: InMemoryTaskTable,
    pub toaster: Arc<RecordingToaster>,
    pub browser: Arc<ScriptedBrowser>,
}

impl Harness {
    pub async fn with_rows(rows: Vec<Task>) -> Self {
        Self::build(rows, true).await
    }

    pub async fn declining(rows: Vec<Task>) -> Self {
        Self::build(rows, false).await
    }

    async fn build(rows: Vec<Task>, confirm: bool) -> Self {
        let auth_api = InMemoryAuthApi::new();
        let table = InMemoryTaskTable::with_rows(Uuid::nil(), rows);
        let toaster = Arc::new(RecordingToaster::default());
        let browser = Arc::new(ScriptedBrowser::answering(confirm));
        let app = App::new(
            Arc::new(auth_api.clone()),
            Arc::new(table.clone()),
            "http://localhost:5173/auth/callback",
            toaster.clone(),
            browser.clone(),
        );
        app.tasks().fetch_tasks().await;

        Self {
            app,
            auth_api,
            table,
            toaster,
            browser,
        }
    }
}

pub fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, day, 12, 0, 0).unwrap()
}

pub fn task(title: &str, status: TaskStatus, category: &str) -> Task {
    Task {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: None,
        status,
        priority: TaskPriority::Medium,
        category: category.to_string(),
        due_date: Some(at(19) + Duration::days(1)),
        created_at: at(1),
        updated_at: at(1),
        user_id: Uuid::nil(),
        shared_with: None,
        assignee_id: None,
    }
}
