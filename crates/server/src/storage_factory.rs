use std::sync::Arc;

use tracing::info;
#[cfg(feature = "s3")]
use tracing::warn;

use filehub_core::UploadPolicy;
use filehub_storage::StorageClient;
use filehub_storage_memory::MockObjectStore;
#[cfg(feature = "s3")]
use filehub_storage_s3::{S3ObjectStore, S3StoreConfig};

use crate::config::{Mode, StorageConfig};
use crate::error::ServerError;

/// Create the storage client for the given deployment mode.
///
/// Development mode always gets the in-memory mock store, so the rest of the
/// pipeline runs unchanged without an external object store.
#[allow(clippy::unused_async)]
pub async fn create_storage(
    mode: Mode,
    config: &StorageConfig,
    policy: UploadPolicy,
) -> Result<Arc<dyn StorageClient>, ServerError> {
    match mode {
        Mode::Development => {
            info!(base_url = %config.mock_base_url, "using mock object store");
            Ok(Arc::new(MockObjectStore::new(&config.mock_base_url, policy)))
        }
        #[cfg(feature = "s3")]
        Mode::Production => {
            let bucket = config.bucket.as_deref().ok_or_else(|| {
                ServerError::Config("production mode requires [storage] bucket".into())
            })?;

            let mut s3_config = S3StoreConfig::new(&config.region, bucket)
                .with_prefix(&config.prefix)
                .with_policy(policy);
            if let Some(endpoint) = &config.endpoint_url {
                s3_config = s3_config.with_endpoint_url(endpoint);
            }
            if let Some(base) = &config.public_base_url {
                s3_config = s3_config.with_public_base_url(base);
            }
            if let Some(prefix) = &config.thumbnail_prefix {
                s3_config = s3_config.with_thumbnail_prefix(prefix);
            }

            let store = S3ObjectStore::new(s3_config).await;
            if let Err(e) = store.health_check().await {
                warn!(bucket, error = %e, "S3 bucket not reachable at startup");
            }
            info!(bucket, region = %config.region, "using S3 object store");
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "s3"))]
        Mode::Production => Err(ServerError::Config(
            "production mode requires the `s3` feature".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn development_uses_mock_store() {
        let storage = create_storage(
            Mode::Development,
            &StorageConfig::default(),
            UploadPolicy::default(),
        )
        .await
        .unwrap();
        assert_eq!(storage.name(), "mock");
    }

    #[tokio::test]
    async fn production_without_bucket_is_rejected() {
        let result = create_storage(
            Mode::Production,
            &StorageConfig::default(),
            UploadPolicy::default(),
        )
        .await;
        assert!(matches!(result, Err(ServerError::Config(_))));
    }
}
