use std::sync::Arc;

use tracing::info;

use filehub_cache::CacheClient;
use filehub_cache_memory::MemoryCacheClient;
#[cfg(feature = "redis")]
use filehub_cache_redis::{RedisCacheClient, RedisCacheConfig};

use crate::config::CacheConfig;
use crate::error::ServerError;

/// Create the metadata cache client from the given configuration.
///
/// The returned client is handed to the file service, which owns it until
/// shutdown.
pub fn create_cache(config: &CacheConfig) -> Result<Arc<dyn CacheClient>, ServerError> {
    let cache: Arc<dyn CacheClient> = match config.backend.as_str() {
        "memory" => Arc::new(MemoryCacheClient::new()),
        #[cfg(feature = "redis")]
        "redis" => {
            let url = config.url.as_deref().ok_or_else(|| {
                ServerError::Config("redis cache backend requires [cache] url".into())
            })?;
            let redis_config = RedisCacheConfig {
                url: url.to_owned(),
                prefix: config.prefix.clone(),
                pool_size: config.pool_size,
                ..RedisCacheConfig::default()
            };
            let client = RedisCacheClient::new(&redis_config)
                .map_err(|e| ServerError::Config(format!("redis cache: {e}")))?;
            Arc::new(client)
        }
        other => {
            return Err(ServerError::Config(format!(
                "unsupported cache backend: {other}"
            )));
        }
    };

    info!(backend = %config.backend, ttl_seconds = config.ttl_seconds, "cache initialized");
    Ok(cache)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_backend() {
        assert!(create_cache(&CacheConfig::default()).is_ok());
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let config = CacheConfig {
            backend: "memcached".into(),
            ..CacheConfig::default()
        };
        assert!(matches!(create_cache(&config), Err(ServerError::Config(_))));
    }

    #[cfg(feature = "redis")]
    #[test]
    fn redis_requires_url() {
        let config = CacheConfig {
            backend: "redis".into(),
            ..CacheConfig::default()
        };
        assert!(matches!(create_cache(&config), Err(ServerError::Config(_))));
    }
}
