//! In-process cache backend.

use super::CacheInterface;
use async_trait::async_trait;
use roster_core::RosterResult;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// `HashMap` cache behind an async `RwLock`. No expiry, no eviction.
#[derive(Debug, Default)]
pub struct InMemoryCache {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl CacheInterface for InMemoryCache {
    fn is_enabled(&self) -> bool {
        true
    }

    async fn get_raw(&self, key: &str) -> RosterResult<Option<String>> {
        let value = self.entries.read().await.get(key).cloned();

        match &value {
            Some(_) => debug!("Cache hit for key '{}'", key),
            None => debug!("Cache miss for key '{}'", key),
        }

        Ok(value)
    }

    async fn set_raw(&self, key: &str, value: &str) -> RosterResult<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> RosterResult<bool> {
        Ok(self.entries.write().await.remove(key).is_some())
    }

    async fn exists(&self, key: &str) -> RosterResult<bool> {
        Ok(self.entries.read().await.contains_key(key))
    }
}
