//! Application context: the stores, the host services and their lifecycle.

use crate::host::{Browser, Toaster};
use futures_signals::signal::SignalExt;
use std::sync::{Arc, Mutex, PoisonError};
use taskflow_backend::{AuthApi, Backend, TaskTable};
use taskflow_stores::{AuthStore, TaskStore};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use url::Url;

pub(crate) const SIGN_IN_FAILED: &str = "Failed to sign in. Please try again.";

const CALLBACK_PATH: &str = "/auth/callback";

/// Everything the components need, passed to them explicitly.
///
/// Cloning is cheap; clones share the stores and the lifecycle state.
#[derive(Clone)]
pub struct App {
    auth: AuthStore,
    tasks: TaskStore,
    toaster: Arc<dyn Toaster>,
    browser: Arc<dyn Browser>,
    watcher: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl App {
    pub fn new(
        auth_api: Arc<dyn AuthApi>,
        table: Arc<dyn TaskTable>,
        callback_url: impl Into<String>,
        toaster: Arc<dyn Toaster>,
        browser: Arc<dyn Browser>,
    ) -> Self {
        Self {
            auth: AuthStore::new(auth_api, callback_url),
            tasks: TaskStore::new(table),
            toaster,
            browser,
            watcher: Arc::new(Mutex::new(None)),
        }
    }

    pub fn from_backend(
        backend: &Backend,
        toaster: Arc<dyn Toaster>,
        browser: Arc<dyn Browser>,
    ) -> Self {
        Self::new(
            backend.auth(),
            backend.tasks(),
            backend.config().callback_url(),
            toaster,
            browser,
        )
    }

    /// Bring the client up at `location`, the page URL it was loaded from.
    ///
    /// Must be called inside a tokio runtime.
    pub async fn start(&self, location: Option<&Url>) {
        if let Some(callback) = location.and_then(OAuthCallback::parse) {
            self.finish_sign_in(callback).await;
        }

        self.auth.initialize().await;
        if self.auth.is_authenticated() {
            self.tasks.fetch_tasks().await;
        }

        self.install_watcher();
    }

    async fn finish_sign_in(&self, callback: OAuthCallback) {
        match callback {
            OAuthCallback::Code(code) => {
                if self.auth.complete_sign_in(&code).await.is_err() {
                    self.toaster.error(SIGN_IN_FAILED);
                }
            }
            OAuthCallback::Denied(reason) => {
                warn!("OAuth provider denied sign in: {}", reason);
                self.toaster.error(SIGN_IN_FAILED);
            }
        }
    }

    /// Fetch tasks when someone signs in and drop them when they sign out.
    fn install_watcher(&self) {
        let mut watcher = self.watcher.lock().unwrap_or_else(PoisonError::into_inner);
        if watcher.is_some() {
            return;
        }

        let tasks = self.tasks.clone();
        let mut current = self.auth.user().map(|user| user.id);
        let changes = self
            .auth
            .user_signal()
            .map(|user| user.map(|user| user.id))
            .for_each(move |user_id| {
                let changed = user_id != current;
                current = user_id;
                let tasks = tasks.clone();
                async move {
                    match user_id {
                        Some(id) if changed => {
                            info!("User {} signed in, loading tasks", id);
                            tasks.fetch_tasks().await;
                        }
                        None if changed => {
                            debug!("Signed out, clearing tasks");
                            tasks.clear_tasks();
                        }
                        _ => {}
                    }
                }
            });

        *watcher = Some(tokio::spawn(changes));
    }

    /// Stop following auth changes. The stores keep their last state.
    pub fn shutdown(&self) {
        self.auth.teardown();
        let watcher = self
            .watcher
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(watcher) = watcher {
            watcher.abort();
        }
        debug!("App shut down");
    }

    pub fn auth(&self) -> &AuthStore {
        &self.auth
    }

    pub fn tasks(&self) -> &TaskStore {
        &self.tasks
    }

    pub fn toaster(&self) -> &dyn Toaster {
        self.toaster.as_ref()
    }

    pub fn browser(&self) -> &dyn Browser {
        self.browser.as_ref()
    }
}

/// What the provider sent back to the callback route.
#[derive(Debug, PartialEq, Eq)]
enum OAuthCallback {
    Code(String),
    Denied(String),
}

impl OAuthCallback {
    fn parse(location: &Url) -> Option<Self> {
        if location.path() != CALLBACK_PATH {
            return None;
        }

        let mut code = None;
        let mut denied = None;
        for (key, value) in location.query_pairs() {
            match key.as_ref() {
                "code" if !value.is_empty() => code = Some(value.into_owned()),
                "error_description" => denied = Some(value.into_owned()),
                "error" if denied.is_none() => denied = Some(value.into_owned()),
                _ => {}
            }
        }

        code.map(Self::Code).or(denied.map(Self::Denied))
    }
}
