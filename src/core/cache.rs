//! Storage port for the persisted rate cache

use crate::core::error::StoreError;
use async_trait::async_trait;

/// A string-keyed slot store. Implementations decide where the values live.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}
