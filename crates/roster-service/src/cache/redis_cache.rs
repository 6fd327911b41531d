//! Redis-based cache implementation.

use super::CacheInterface;
use async_trait::async_trait;
use deadpool_redis::{redis::AsyncCommands, Pool, PoolConfig, Runtime};
use roster_config::RedisConfig;
use roster_core::{RosterError, RosterResult};
use std::sync::Arc;
use tracing::{debug, info};

/// Redis-based cache service.
#[derive(Clone)]
pub struct RedisCacheService {
    /// Redis connection pool; `None` when caching is disabled.
    pool: Option<Arc<Pool>>,
}

impl RedisCacheService {
    /// Create a new Redis cache service.
    #[must_use]
    pub fn new(pool: Arc<Pool>) -> Self {
        Self { pool: Some(pool) }
    }

    /// Create a no-op cache service (for when Redis is disabled).
    #[must_use]
    pub fn disabled() -> Self {
        Self { pool: None }
    }

    /// Builds the service from configuration.
    ///
    /// No connection is opened here; the pool connects lazily.
    pub fn from_config(config: &RedisConfig) -> RosterResult<Self> {
        if !config.enabled {
            info!("Redis cache disabled");
            return Ok(Self::disabled());
        }

        let mut redis_cfg = deadpool_redis::Config::from_url(&config.url);
        redis_cfg.pool = Some(PoolConfig::new(config.pool_size));

        let pool = redis_cfg
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| RosterError::Cache(format!("Failed to create Redis pool: {}", e)))?;

        info!("Redis cache pool created for {}", config.url);
        Ok(Self::new(Arc::new(pool)))
    }

    /// Get a connection from the pool.
    async fn get_conn(&self) -> RosterResult<deadpool_redis::Connection> {
        match &self.pool {
            Some(pool) => pool.get().await.map_err(|e| {
                RosterError::Cache(format!("Failed to get Redis connection: {}", e))
            }),
            None => Err(RosterError::Cache("Cache is disabled".to_string())),
        }
    }

    /// Sends `PING`.
    pub async fn ping(&self) -> RosterResult<()> {
        let mut conn = self.get_conn().await?;
        let _: String = deadpool_redis::redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| RosterError::Cache(format!("Ping failed: {}", e)))?;
        Ok(())
    }
}

#[async_trait]
impl CacheInterface for RedisCacheService {
    fn is_enabled(&self) -> bool {
        self.pool.is_some()
    }

    async fn get_raw(&self, key: &str) -> RosterResult<Option<String>> {
        if !self.is_enabled() {
            return Ok(None);
        }

        let mut conn = self.get_conn().await?;
        let value: Option<String> = conn.get(key).await.map_err(|e| {
            RosterError::Cache(format!("Failed to get key '{}': {}", key, e))
        })?;

        match &value {
            Some(_) => debug!("Cache hit for key '{}'", key),
            None => debug!("Cache miss for key '{}'", key),
        }

        Ok(value)
    }

    async fn set_raw(&self, key: &str, value: &str) -> RosterResult<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        let mut conn = self.get_conn().await?;
        conn.set::<_, _, ()>(key, value).await.map_err(|e| {
            RosterError::Cache(format!("Failed to set key '{}': {}", key, e))
        })?;

        debug!("Cached key '{}'", key);
        Ok(())
    }

    async fn delete(&self, key: &str) -> RosterResult<bool> {
        if !self.is_enabled() {
            return Ok(false);
        }

        let mut conn = self.get_conn().await?;
        let deleted: i64 = conn.del(key).await.map_err(|e| {
            RosterError::Cache(format!("Failed to delete key '{}': {}", key, e))
        })?;

        debug!("Deleted key '{}': {}", key, deleted > 0);
        Ok(deleted > 0)
    }

    async fn exists(&self, key: &str) -> RosterResult<bool> {
        if !self.is_enabled() {
            return Ok(false);
        }

        let mut conn = self.get_conn().await?;
        let exists: bool = conn.exists(key).await.map_err(|e| {
            RosterError::Cache(format!("Failed to check key '{}': {}", key, e))
        })?;

        Ok(exists)
    }
}

impl std::fmt::Debug for RedisCacheService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCacheService")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_cache_is_a_no_op() {
        let cache = RedisCacheService::disabled();
        assert!(!cache.is_enabled());

        cache.set_raw("user:1", "{}").await.unwrap();
        assert!(cache.get_raw("user:1").await.unwrap().is_none());
        assert!(!cache.exists("user:1").await.unwrap());
        assert!(!cache.delete("user:1").await.unwrap());
    }

    #[test]
    fn test_from_config_disabled() {
        let config = RedisConfig {
            enabled: false,
            ..RedisConfig::default()
        };
        assert!(!RedisCacheService::from_config(&config).unwrap().is_enabled());
    }

    #[tokio::test]
    async fn test_from_config_does_not_connect() {
        let config = RedisConfig {
            url: "redis://127.0.0.1:1".to_string(),
            ..RedisConfig::default()
        };
        let cache = RedisCacheService::from_config(&config).unwrap();
        assert!(cache.is_enabled());
        assert!(matches!(cache.ping().await, Err(RosterError::Cache(_))));
    }
}
