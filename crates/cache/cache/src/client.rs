use std::time::Duration;

use async_trait::async_trait;

use crate::error::CacheError;

/// Keyed, TTL-capable cache.
///
/// Each `set` replaces a whole value atomically, so an interrupted write can
/// lose an entry but never leave a partial one. Implementations must be
/// `Send + Sync` and safe for concurrent access.
#[async_trait]
pub trait CacheClient: Send + Sync {
    /// Get the value for a key. Returns `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Set a value that expires after `ttl`, overwriting any previous value.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;

    /// Delete a key. Returns `true` if the key existed.
    async fn delete(&self, key: &str) -> Result<bool, CacheError>;

    /// Release the underlying connection. Later calls fail with
    /// [`CacheError::Closed`].
    async fn close(&self) -> Result<(), CacheError>;
}
