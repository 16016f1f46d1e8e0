use std::time::Duration;

use async_trait::async_trait;
use deadpool_redis::{Config, Pool, PoolError, Runtime};
use redis::AsyncCommands;
use tracing::info;

use filehub_cache::{CacheClient, CacheError};

use crate::config::RedisCacheConfig;

/// Redis-backed implementation of [`CacheClient`].
///
/// The `deadpool-redis` pool is created once and shared by every request.
/// `close` shuts the pool down; pooled connections are dropped as they are
/// returned, and later operations fail with [`CacheError::Closed`].
pub struct RedisCacheClient {
    pool: Pool,
    prefix: String,
}

impl RedisCacheClient {
    /// Create a new `RedisCacheClient` from the provided configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Connection`] if the pool cannot be created.
    pub fn new(config: &RedisCacheConfig) -> Result<Self, CacheError> {
        let cfg = Config::from_url(&config.url);
        let pool = cfg
            .builder()
            .map(|b| {
                b.max_size(config.pool_size)
                    .wait_timeout(Some(config.connection_timeout))
                    .create_timeout(Some(config.connection_timeout))
                    .runtime(Runtime::Tokio1)
                    .build()
            })
            .map_err(|e| CacheError::Connection(e.to_string()))?
            .map_err(|e| CacheError::Connection(e.to_string()))?;

        Ok(Self {
            pool,
            prefix: config.prefix.clone(),
        })
    }

    /// Build the full Redis key.
    fn key(&self, key: &str) -> String {
        format!("{}:{key}", self.prefix)
    }

    /// Obtain a connection from the pool.
    async fn conn(&self) -> Result<deadpool_redis::Connection, CacheError> {
        if self.pool.is_closed() {
            return Err(CacheError::Closed);
        }
        self.pool.get().await.map_err(|e| match e {
            PoolError::Closed => CacheError::Closed,
            other => CacheError::Connection(other.to_string()),
        })
    }
}

#[async_trait]
impl CacheClient for RedisCacheClient {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.conn().await?;
        conn.get(self.key(key))
            .await
            .map_err(|e| CacheError::Backend(e.to_string()))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.conn().await?;
        let ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1);
        conn.pset_ex(self.key(key), value, ms)
            .await
            .map_err(|e| CacheError::Backend(e.to_string()))
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        let mut conn = self.conn().await?;
        let deleted: i64 = conn
            .del(self.key(key))
            .await
            .map_err(|e| CacheError::Backend(e.to_string()))?;
        Ok(deleted > 0)
    }

    async fn close(&self) -> Result<(), CacheError> {
        if !self.pool.is_closed() {
            self.pool.close();
            info!("redis cache pool closed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_url() {
        let config = RedisCacheConfig {
            url: "not a url".into(),
            ..RedisCacheConfig::default()
        };
        assert!(matches!(
            RedisCacheClient::new(&config),
            Err(CacheError::Connection(_))
        ));
    }

    #[tokio::test]
    async fn closed_pool_reports_closed_without_connecting() {
        // Pool creation is lazy, so no Redis server is needed here.
        let client = RedisCacheClient::new(&RedisCacheConfig::default()).unwrap();
        client.close().await.unwrap();
        client.close().await.unwrap();
        assert!(matches!(client.get("k").await, Err(CacheError::Closed)));
    }

    #[tokio::test]
    async fn unreachable_server_fails_within_connection_timeout() {
        let client = RedisCacheClient::new(&RedisCacheConfig {
            url: "redis://10.255.255.1:6379".into(),
            connection_timeout: Duration::from_millis(200),
            ..RedisCacheConfig::default()
        })
        .unwrap();

        let result = tokio::time::timeout(Duration::from_secs(5), client.get("k"))
            .await
            .expect("get should give up before the outer timeout");
        assert!(matches!(result, Err(CacheError::Connection(_))));
    }

    #[test]
    fn keys_are_prefixed() {
        let client = RedisCacheClient::new(&RedisCacheConfig {
            prefix: "media".into(),
            ..RedisCacheConfig::default()
        })
        .unwrap();
        assert_eq!(client.key("file:abc"), "media:file:abc");
    }
}
