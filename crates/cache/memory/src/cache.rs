use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::time::Instant;

use filehub_cache::{CacheClient, CacheError};

/// A single cached value.
#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

impl Entry {
    /// Returns `true` if this entry has passed its TTL deadline.
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// In-memory [`CacheClient`] backed by a [`DashMap`].
///
/// Entries are lazily evicted on read when their TTL has elapsed. After
/// `close` every operation fails with [`CacheError::Closed`].
#[derive(Debug, Default)]
pub struct MemoryCacheClient {
    data: DashMap<String, Entry>,
    closed: AtomicBool,
}

impl MemoryCacheClient {
    /// Create a new, empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `true` once `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn ensure_open(&self) -> Result<(), CacheError> {
        if self.is_closed() {
            Err(CacheError::Closed)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CacheClient for MemoryCacheClient {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.ensure_open()?;

        if let Some(entry) = self.data.get(key) {
            if entry.is_expired() {
                drop(entry);
                self.data.remove_if(key, |_, e| e.is_expired());
                return Ok(None);
            }
            return Ok(Some(entry.value.clone()));
        }

        Ok(None)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        self.ensure_open()?;
        self.data.insert(
            key.to_owned(),
            Entry {
                value: value.to_owned(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        self.ensure_open()?;
        // Treat expired entries as "not found".
        match self.data.remove(key) {
            Some((_, entry)) => Ok(!entry.is_expired()),
            None => Ok(false),
        }
    }

    async fn close(&self) -> Result<(), CacheError> {
        self.closed.store(true, Ordering::Release);
        self.data.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use filehub_cache::testing::run_cache_conformance_tests;

    use super::*;

    #[tokio::test]
    async fn conformance() {
        let cache = MemoryCacheClient::new();
        run_cache_conformance_tests(&cache).await.unwrap();
        assert!(cache.is_closed());
    }

    #[tokio::test(start_paused = true)]
    async fn entry_lives_until_ttl() {
        let cache = MemoryCacheClient::new();
        cache.set("k", "v", Duration::from_secs(10)).await.unwrap();

        tokio::time::advance(Duration::from_secs(9)).await;
        assert_eq!(cache.get("k").await.unwrap().as_deref(), Some("v"));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(cache.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn close_is_idempotent() {
        let cache = MemoryCacheClient::new();
        cache.close().await.unwrap();
        cache.close().await.unwrap();
        assert!(matches!(
            cache.set("k", "v", Duration::from_secs(1)).await,
            Err(CacheError::Closed)
        ));
    }
}
