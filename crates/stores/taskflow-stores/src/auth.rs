//! Auth session store: the signed-in user and the bootstrap loading flag.

use crate::error::StoreResult;
use futures_signals::signal::{Mutable, MutableSignal, MutableSignalCloned};
use std::sync::{Arc, Mutex, PoisonError};
use taskflow_backend::{AuthApi, AuthEvent, AuthSubscription, OAuthProvider, OAuthRedirect};
use taskflow_core::User;
use tracing::{debug, error, info};

/// Holds the current [`User`] and keeps it in step with the backend's auth state.
///
/// Cloning is cheap; clones share state.
#[derive(Clone)]
pub struct AuthStore {
    api: Arc<dyn AuthApi>,
    callback_url: Arc<str>,
    user: Mutable<Option<User>>,
    loading: Mutable<bool>,
    subscription: Arc<Mutex<Option<AuthSubscription>>>,
}

impl AuthStore {
    /// `callback_url` is where OAuth providers send the browser back to,
    /// normally `<origin>/auth/callback`.
    pub fn new(api: Arc<dyn AuthApi>, callback_url: impl Into<String>) -> Self {
        Self {
            api,
            callback_url: Arc::from(callback_url.into()),
            user: Mutable::new(None),
            loading: Mutable::new(true),
            subscription: Arc::new(Mutex::new(None)),
        }
    }

    /// Restore the current session and start following auth-state changes.
    ///
    /// Never fails: errors are logged and `loading` is cleared either way.
    pub async fn initialize(&self) {
        self.ensure_subscribed();

        match self.api.get_session().await {
            Ok(Some(session)) => {
                let user = session.user();
                debug!("Restored session for {}", user.email);
                self.user.set(Some(user));
            }
            Ok(None) => debug!("No stored session"),
            Err(err) => error!(error = %err, "Error initializing auth"),
        }

        self.loading.set(false);
    }

    fn ensure_subscribed(&self) {
        let mut subscription = self
            .subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if subscription.is_some() {
            return;
        }

        let user = self.user.clone();
        *subscription = Some(self.api.on_auth_state_change(Arc::new(
            move |event: &AuthEvent| {
                debug!("Auth state changed: {:?}", event.kind);
                user.set(event.user());
            },
        )));
    }

    /// Start an OAuth sign-in with `provider`. The host navigates to the returned URL.
    pub async fn sign_in(&self, provider: OAuthProvider) -> StoreResult<OAuthRedirect> {
        self.api
            .sign_in_with_oauth(provider, &self.callback_url)
            .await
            .inspect_err(|err| error!(error = %err, "Error signing in with {}", provider))
            .map_err(Into::into)
    }

    /// Finish an OAuth sign-in with the code from the callback URL.
    pub async fn complete_sign_in(&self, auth_code: &str) -> StoreResult<User> {
        let session = self
            .api
            .exchange_code_for_session(auth_code)
            .await
            .inspect_err(|err| error!(error = %err, "Error completing sign in"))?;

        let user = session.user();
        info!("Signed in as {}", user.email);
        self.user.set(Some(user.clone()));
        Ok(user)
    }

    /// End the session. On failure the user stays signed in.
    pub async fn sign_out(&self) -> StoreResult<()> {
        self.api
            .sign_out()
            .await
            .inspect_err(|err| error!(error = %err, "Error signing out"))?;
        self.user.set(None);
        Ok(())
    }

    /// Stop following auth-state changes.
    pub fn teardown(&self) {
        let subscription = self
            .subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(subscription) = subscription {
            subscription.unsubscribe();
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub fn user(&self) -> Option<User> {
        self.user.get_cloned()
    }

    pub fn loading(&self) -> bool {
        self.loading.get()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.lock_ref().is_some()
    }

    pub fn user_signal(&self) -> MutableSignalCloned<Option<User>> {
        self.user.signal_cloned()
    }

    pub fn loading_signal(&self) -> MutableSignal<bool> {
        self.loading.signal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use taskflow_backend::{InMemoryAuthApi, Session};
    use uuid::Uuid;

    const CALLBACK: &str = "http://localhost:5173/auth/callback";

    fn user(name: &str) -> User {
        User {
            id: Uuid::new_v4(),
            email: format!("{}@example.com", name.to_lowercase()),
            name: name.to_string(),
            avatar_url: None,
            created_at: Utc::now(),
        }
    }

    fn store(api: &InMemoryAuthApi) -> AuthStore {
        AuthStore::new(Arc::new(api.clone()), CALLBACK)
    }

    #[tokio::test]
    async fn test_initialize_restores_user() {
        let ada = user("Ada");
        let api = InMemoryAuthApi::with_session(Session::issue(&ada, "t"));
        let store = store(&api);

        assert!(store.loading());
        store.initialize().await;

        assert!(!store.loading());
        assert_eq!(store.user(), Some(ada));
        assert!(store.is_authenticated());
    }

    #[tokio::test]
    async fn test_initialize_failure_clears_loading() {
        let api = InMemoryAuthApi::new();
        api.set_failing(true);
        let store = store(&api);

        store.initialize().await;

        assert!(!store.loading());
        assert_eq!(store.user(), None);
    }

    #[tokio::test]
    async fn test_subscription_registered_once() {
        let api = InMemoryAuthApi::new();
        let store = store(&api);

        store.initialize().await;
        store.initialize().await;
        assert_eq!(api.events().subscriber_count(), 1);

        store.teardown();
        assert_eq!(api.events().subscriber_count(), 0);
        assert!(!store.is_subscribed());

        store.initialize().await;
        assert_eq!(api.events().subscriber_count(), 1);
    }

    #[tokio::test]
    async fn test_auth_events_drive_user() {
        let api = InMemoryAuthApi::new();
        let store = store(&api);
        store.initialize().await;

        let grace = user("Grace");
        api.sign_in_externally(Session::issue(&grace, "t1")).await;
        assert_eq!(store.user(), Some(grace.clone()));

        let mut renamed = grace.clone();
        renamed.name = "Grace Hopper".to_string();
        api.refresh(Session::issue(&renamed, "t2")).await;
        assert_eq!(store.user().map(|u| u.name), Some("Grace Hopper".to_string()));

        api.expire().await;
        assert_eq!(store.user(), None);
    }

    #[tokio::test]
    async fn test_sign_in_uses_callback_url() {
        let api = InMemoryAuthApi::new();
        let redirect = store(&api).sign_in(OAuthProvider::Github).await.unwrap();

        assert_eq!(redirect.provider, OAuthProvider::Github);
        assert_eq!(api.last_redirect().await.as_deref(), Some(CALLBACK));
    }

    #[tokio::test]
    async fn test_sign_in_failure_propagates() {
        let api = InMemoryAuthApi::new();
        api.set_failing(true);
        assert!(store(&api).sign_in(OAuthProvider::Google).await.is_err());
    }

    #[tokio::test]
    async fn test_complete_sign_in_before_initialize() {
        let api = InMemoryAuthApi::new();
        let ada = user("Ada");
        api.grant_code("abc", Session::issue(&ada, "t")).await;
        let store = store(&api);

        let signed_in = store.complete_sign_in("abc").await.unwrap();
        assert_eq!(signed_in, ada);
        assert_eq!(store.user(), Some(ada));

        let err = store.complete_sign_in("abc").await.unwrap_err();
        assert!(err.is_auth_error());
    }

    #[tokio::test]
    async fn test_sign_out() {
        let ada = user("Ada");
        let api = InMemoryAuthApi::with_session(Session::issue(&ada, "t"));
        let store = store(&api);
        store.initialize().await;

        api.set_failing(true);
        assert!(store.sign_out().await.is_err());
        assert_eq!(store.user(), Some(ada));

        api.set_failing(false);
        store.sign_out().await.unwrap();
        assert_eq!(store.user(), None);
        assert_eq!(api.current_session().await, None);
    }
}
