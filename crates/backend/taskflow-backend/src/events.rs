//! Auth-state change subscriptions.

use crate::types::AuthEvent;
use dashmap::DashMap;
use std::sync::{Arc, Weak};
use tracing::debug;
use uuid::Uuid;

/// Callback invoked for every auth-state change.
pub type AuthStateHandler = Arc<dyn Fn(&AuthEvent) + Send + Sync>;

type HandlerMap = DashMap<Uuid, AuthStateHandler>;

/// Fan-out of auth events to registered handlers.
#[derive(Clone, Default)]
pub struct AuthEventBus {
    handlers: Arc<HandlerMap>,
}

impl AuthEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, handler: AuthStateHandler) -> AuthSubscription {
        let id = Uuid::new_v4();
        self.handlers.insert(id, handler);
        debug!("Registered auth state handler {}", id);

        AuthSubscription {
            id,
            handlers: Arc::downgrade(&self.handlers),
        }
    }

    pub fn emit(&self, event: &AuthEvent) {
        // Snapshot first so a handler may unsubscribe without deadlocking the map
        let handlers: Vec<AuthStateHandler> = self
            .handlers
            .iter()
            .map(|entry| entry.value().clone())
            .collect();

        debug!(
            "Dispatching {:?} to {} auth state handler(s)",
            event.kind,
            handlers.len()
        );
        for handler in handlers {
            handler(event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.len()
    }
}

/// Handle to a registered auth-state handler. Dropping it, or calling
/// [`AuthSubscription::unsubscribe`], removes the handler.
#[must_use = "dropping the subscription unregisters the handler"]
pub struct AuthSubscription {
    id: Uuid,
    handlers: Weak<HandlerMap>,
}

impl AuthSubscription {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn is_active(&self) -> bool {
        self.handlers
            .upgrade()
            .is_some_and(|handlers| handlers.contains_key(&self.id))
    }

    pub fn unsubscribe(self) {}
}

impl Drop for AuthSubscription {
    fn drop(&mut self) {
        if let Some(handlers) = self.handlers.upgrade() {
            if handlers.remove(&self.id).is_some() {
                debug!("Removed auth state handler {}", self.id);
            }
        }
    }
}

impl std::fmt::Debug for AuthSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSubscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
