use crate::core::cache::KeyValueStore;
use crate::core::error::StoreError;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

/// In-memory store using a HashMap behind a Mutex
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let store = self.inner.lock().await;
        let value = store.get(key).cloned();
        if value.is_some() {
            debug!("Store HIT for key: {}", key);
        } else {
            debug!("Store MISS for key: {}", key);
        }
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut store = self.inner.lock().await;
        debug!("Store PUT for key: {}", key);
        store.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_get_set() {
        let store = MemoryStore::new();

        // Initially, store is empty
        assert!(store.get("key1").await.unwrap().is_none());

        store.set("key1", "value").await.unwrap();
        assert_eq!(store.get("key1").await.unwrap().as_deref(), Some("value"));

        // Last write wins
        store.set("key1", "other").await.unwrap();
        assert_eq!(store.get("key1").await.unwrap().as_deref(), Some("other"));

        assert!(store.get("key2").await.unwrap().is_none());
    }
}
