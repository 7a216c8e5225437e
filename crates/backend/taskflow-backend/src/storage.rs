//! Key/value storage for the persisted session and the pending PKCE verifier.

use crate::error::BackendResult;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Storage the auth client persists into. In a browser host this is backed by
/// `localStorage`; tests and native hosts use [`InMemorySessionStorage`].
#[async_trait]
pub trait SessionStorage: Send + Sync {
    async fn get_item(&self, key: &str) -> BackendResult<Option<String>>;

    async fn set_item(&self, key: &str, value: String) -> BackendResult<()>;

    async fn remove_item(&self, key: &str) -> BackendResult<()>;
}

#[derive(Clone, Default)]
pub struct InMemorySessionStorage {
    items: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStorage for InMemorySessionStorage {
    async fn get_item(&self, key: &str) -> BackendResult<Option<String>> {
        Ok(self.items.read().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: String) -> BackendResult<()> {
        self.items.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> BackendResult<()> {
        self.items.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_storage() {
        let storage = InMemorySessionStorage::new();
        assert!(storage.is_empty().await);

        storage
            .set_item("session", "{\"a\":1}".to_string())
            .await
            .unwrap();
        assert_eq!(
            storage.get_item("session").await.unwrap().as_deref(),
            Some("{\"a\":1}")
        );

        // Clones share the same backing map
        let other = storage.clone();
        other.remove_item("session").await.unwrap();
        assert_eq!(storage.get_item("session").await.unwrap(), None);
        assert_eq!(storage.len().await, 0);
    }
}
