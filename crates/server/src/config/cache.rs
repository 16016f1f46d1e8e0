use std::time::Duration;

use serde::Deserialize;

/// Configuration for the metadata cache.
#[derive(Debug, Deserialize)]
pub struct CacheConfig {
    /// Which backend to use: `"memory"` or `"redis"`.
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Connection URL (e.g. `redis://localhost:6379`).
    pub url: Option<String>,
    /// Key prefix applied to every cache key.
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Lifetime of a cached record, in seconds.
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,
    /// Connection pool size for networked backends.
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            url: None,
            prefix: default_prefix(),
            ttl_seconds: default_ttl_seconds(),
            pool_size: default_pool_size(),
        }
    }
}

impl CacheConfig {
    /// Cache entry lifetime.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

fn default_backend() -> String {
    "memory".to_owned()
}

fn default_prefix() -> String {
    "filehub".to_owned()
}

fn default_ttl_seconds() -> u64 {
    3600
}

fn default_pool_size() -> usize {
    10
}
