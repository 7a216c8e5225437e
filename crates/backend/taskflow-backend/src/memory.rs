//! In-process implementations of the backend surfaces.
//!
//! Both keep their state in memory and mirror the observable behaviour of the hosted
//! services closely enough to drive the stores offline: rows come back newest first,
//! updating an unknown row fails the way the row API does, and every session change is
//! announced to auth-state subscribers.

use crate::api::{AuthApi, TaskTable};
use crate::error::{BackendError, BackendResult};
use crate::events::{AuthEventBus, AuthStateHandler, AuthSubscription};
use crate::types::{AuthEvent, OAuthProvider, OAuthRedirect, Session};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use taskflow_core::{NewTask, Task, TaskId, TaskUpdate, UserId};
use tokio::sync::RwLock;
use tracing::debug;
use url::Url;
use uuid::Uuid;

const UNAVAILABLE_STATUS: u16 = 503;
const LOCAL_AUTHORIZE_URL: &str = "http://localhost/auth/v1/authorize";

fn unavailable() -> BackendError {
    BackendError::api(UNAVAILABLE_STATUS, None, "Backend unavailable")
}

/// Switch that makes every call fail with a 503, plus a count of calls made.
#[derive(Default)]
struct CallGate {
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl CallGate {
    fn enter(&self) -> BackendResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(())
    }
}

/// Tasks table held in memory.
#[derive(Clone, Default)]
pub struct InMemoryTaskTable {
    rows: Arc<RwLock<Vec<Task>>>,
    owner: UserId,
    gate: Arc<CallGate>,
}

impl InMemoryTaskTable {
    /// Empty table whose inserted rows belong to `owner`.
    pub fn new(owner: UserId) -> Self {
        Self {
            owner,
            ..Self::default()
        }
    }

    pub fn with_rows(owner: UserId, rows: Vec<Task>) -> Self {
        Self {
            rows: Arc::new(RwLock::new(rows)),
            owner,
            gate: Arc::default(),
        }
    }

    pub async fn rows(&self) -> Vec<Task> {
        self.rows.read().await.clone()
    }

    /// Make every following call fail until switched back.
    pub fn set_failing(&self, failing: bool) {
        self.gate.failing.store(failing, Ordering::SeqCst);
    }

    /// Calls made so far, failed ones included.
    pub fn request_count(&self) -> usize {
        self.gate.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TaskTable for InMemoryTaskTable {
    async fn select_all(&self) -> BackendResult<Vec<Task>> {
        self.gate.enter()?;
        let mut rows = self.rows.read().await.clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn insert(&self, row: &NewTask) -> BackendResult<Task> {
        self.gate.enter()?;
        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            title: row.data.title.clone(),
            description: row.data.description.clone(),
            status: row.status,
            priority: row.data.priority,
            category: row.data.category.clone(),
            due_date: row.data.due_date,
            created_at: now,
            updated_at: now,
            user_id: self.owner,
            shared_with: None,
            assignee_id: None,
        };
        self.rows.write().await.insert(0, task.clone());
        debug!("Inserted in-memory task {}", task.id);
        Ok(task)
    }

    async fn update(&self, id: TaskId, changes: &TaskUpdate) -> BackendResult<Task> {
        self.gate.enter()?;
        let mut rows = self.rows.write().await;
        let task = rows.iter_mut().find(|task| task.id == id).ok_or_else(|| {
            BackendError::api(
                406,
                Some("PGRST116".to_string()),
                "JSON object requested, multiple (or no) rows returned",
            )
        })?;
        changes.apply_to(task);
        Ok(task.clone())
    }

    async fn delete(&self, id: TaskId) -> BackendResult<()> {
        self.gate.enter()?;
        self.rows.write().await.retain(|task| task.id != id);
        Ok(())
    }
}

/// Auth service held in memory. Authorization codes are granted up front with
/// [`InMemoryAuthApi::grant_code`]; sessions never expire.
#[derive(Clone, Default)]
pub struct InMemoryAuthApi {
    session: Arc<RwLock<Option<Session>>>,
    grants: Arc<RwLock<HashMap<String, Session>>>,
    last_redirect: Arc<RwLock<Option<String>>>,
    events: AuthEventBus,
    gate: Arc<CallGate>,
}

impl InMemoryAuthApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Service that already holds `session`, as after a page reload.
    pub fn with_session(session: Session) -> Self {
        Self {
            session: Arc::new(RwLock::new(Some(session))),
            ..Self::default()
        }
    }

    /// Accept `code` once at the token endpoint, yielding `session`.
    pub async fn grant_code(&self, code: impl Into<String>, session: Session) {
        self.grants.write().await.insert(code.into(), session);
    }

    /// A sign-in completed elsewhere, e.g. in another tab.
    pub async fn sign_in_externally(&self, session: Session) {
        *self.session.write().await = Some(session.clone());
        self.events.emit(&AuthEvent::signed_in(session));
    }

    /// The session was replaced by a refreshed one.
    pub async fn refresh(&self, session: Session) {
        *self.session.write().await = Some(session.clone());
        self.events.emit(&AuthEvent::token_refreshed(session));
    }

    /// The session ended without a sign-out request, e.g. it was revoked.
    pub async fn expire(&self) {
        *self.session.write().await = None;
        self.events.emit(&AuthEvent::signed_out());
    }

    pub async fn current_session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    /// `redirect_to` of the most recent OAuth sign-in.
    pub async fn last_redirect(&self) -> Option<String> {
        self.last_redirect.read().await.clone()
    }

    pub fn events(&self) -> &AuthEventBus {
        &self.events
    }

    pub fn set_failing(&self, failing: bool) {
        self.gate.failing.store(failing, Ordering::SeqCst);
    }

    pub fn request_count(&self) -> usize {
        self.gate.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthApi for InMemoryAuthApi {
    async fn get_session(&self) -> BackendResult<Option<Session>> {
        self.gate.enter()?;
        Ok(self.session.read().await.clone())
    }

    async fn sign_in_with_oauth(
        &self,
        provider: OAuthProvider,
        redirect_to: &str,
    ) -> BackendResult<OAuthRedirect> {
        self.gate.enter()?;
        let url = Url::parse_with_params(
            LOCAL_AUTHORIZE_URL,
            &[("provider", provider.as_str()), ("redirect_to", redirect_to)],
        )?;
        *self.last_redirect.write().await = Some(redirect_to.to_string());
        Ok(OAuthRedirect { provider, url })
    }

    async fn exchange_code_for_session(&self, auth_code: &str) -> BackendResult<Session> {
        self.gate.enter()?;
        let session = self.grants.write().await.remove(auth_code).ok_or_else(|| {
            BackendError::api(
                400,
                Some("invalid_grant".to_string()),
                "Invalid authorization code",
            )
        })?;

        *self.session.write().await = Some(session.clone());
        self.events.emit(&AuthEvent::signed_in(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> BackendResult<()> {
        self.gate.enter()?;
        *self.session.write().await = None;
        self.events.emit(&AuthEvent::signed_out());
        Ok(())
    }

    fn on_auth_state_change(&self, handler: AuthStateHandler) -> AuthSubscription {
        self.events.subscribe(handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskflow_core::{CreateTaskData, TaskPriority, TaskStatus, User};

    fn data(title: &str) -> CreateTaskData {
        CreateTaskData {
            title: title.to_string(),
            description: None,
            priority: TaskPriority::Medium,
            category: "home".to_string(),
            due_date: None,
        }
    }

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "ada@example.com".to_string(),
            name: "Ada".to_string(),
            avatar_url: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_table_lists_newest_first() {
        let owner = Uuid::new_v4();
        let table = InMemoryTaskTable::new(owner);
        let first = table.insert(&NewTask::pending(data("first"))).await.unwrap();
        let second = table.insert(&NewTask::pending(data("second"))).await.unwrap();

        let rows = table.select_all().await.unwrap();
        assert_eq!(rows[0].id, second.id);
        assert_eq!(rows[1].id, first.id);
        assert!(rows.iter().all(|row| row.user_id == owner));
    }

    #[tokio::test]
    async fn test_table_update_and_delete() {
        let table = InMemoryTaskTable::new(Uuid::new_v4());
        let task = table.insert(&NewTask::pending(data("chores"))).await.unwrap();

        let updated = table
            .update(task.id, &TaskUpdate::status(TaskStatus::Completed))
            .await
            .unwrap();
        assert_eq!(updated.status, TaskStatus::Completed);

        let missing = table
            .update(Uuid::new_v4(), &TaskUpdate::status(TaskStatus::Completed))
            .await;
        assert_eq!(missing.unwrap_err().status(), Some(406));

        table.delete(task.id).await.unwrap();
        assert!(table.rows().await.is_empty());
    }

    #[tokio::test]
    async fn test_table_failure_switch() {
        let table = InMemoryTaskTable::new(Uuid::new_v4());
        table.set_failing(true);
        assert!(table.select_all().await.is_err());
        table.set_failing(false);
        assert!(table.select_all().await.is_ok());
        assert_eq!(table.request_count(), 2);
    }

    #[tokio::test]
    async fn test_auth_code_is_single_use() {
        let api = InMemoryAuthApi::new();
        let session = Session::issue(&user(), "token");
        api.grant_code("code", session.clone()).await;

        let kinds = Arc::new(std::sync::Mutex::new(Vec::new()));
        let _subscription = api.on_auth_state_change({
            let kinds = kinds.clone();
            Arc::new(move |event: &AuthEvent| kinds.lock().unwrap().push(event.kind))
        });

        assert_eq!(api.exchange_code_for_session("code").await.unwrap(), session);
        assert!(api.exchange_code_for_session("code").await.unwrap_err().is_auth_error());
        assert_eq!(api.get_session().await.unwrap(), Some(session));

        api.sign_out().await.unwrap();
        assert_eq!(api.get_session().await.unwrap(), None);
        assert_eq!(
            *kinds.lock().unwrap(),
            vec![
                crate::types::AuthEventKind::SignedIn,
                crate::types::AuthEventKind::SignedOut
            ]
        );
    }

    #[tokio::test]
    async fn test_oauth_redirect_records_callback() {
        let api = InMemoryAuthApi::new();
        let redirect = api
            .sign_in_with_oauth(OAuthProvider::Facebook, "http://localhost:5173/auth/callback")
            .await
            .unwrap();
        assert!(redirect.url.as_str().contains("provider=facebook"));
        assert_eq!(
            api.last_redirect().await.as_deref(),
            Some("http://localhost:5173/auth/callback")
        );
    }
}
