//! The two backend surfaces the stores depend on.

use crate::error::BackendResult;
use crate::events::{AuthStateHandler, AuthSubscription};
use crate::types::{OAuthProvider, OAuthRedirect, Session};
use async_trait::async_trait;
use taskflow_core::{NewTask, Task, TaskId, TaskUpdate};

/// Authentication API of the hosted backend.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Current session, restored from storage and refreshed when expired.
    async fn get_session(&self) -> BackendResult<Option<Session>>;

    /// Prepare an OAuth redirect to `provider`, returning to `redirect_to` afterwards.
    async fn sign_in_with_oauth(
        &self,
        provider: OAuthProvider,
        redirect_to: &str,
    ) -> BackendResult<OAuthRedirect>;

    /// Finish the redirect flow with the `code` the provider sent back.
    async fn exchange_code_for_session(&self, auth_code: &str) -> BackendResult<Session>;

    async fn sign_out(&self) -> BackendResult<()>;

    /// Register a handler for every later auth-state change.
    fn on_auth_state_change(&self, handler: AuthStateHandler) -> AuthSubscription;
}

/// Row API over the tasks table. Rows are scoped to the caller by the backend.
#[async_trait]
pub trait TaskTable: Send + Sync {
    /// All rows, newest first.
    async fn select_all(&self) -> BackendResult<Vec<Task>>;

    /// Insert one row and return it as stored.
    async fn insert(&self, row: &NewTask) -> BackendResult<Task>;

    /// Update the row with `id` and return it as stored.
    async fn update(&self, id: TaskId, changes: &TaskUpdate) -> BackendResult<Task>;

    async fn delete(&self, id: TaskId) -> BackendResult<()>;
}

/// Source of the bearer token attached to row API requests.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    async fn access_token(&self) -> BackendResult<Option<String>>;
}
