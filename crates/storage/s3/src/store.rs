use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use filehub_core::is_image;
use filehub_storage::{Locator, StorageClient, StorageError, extension_for};

use crate::auth::build_client;
use crate::config::S3StoreConfig;
use crate::error::classify_sdk_error;

/// AWS S3-backed implementation of [`StorageClient`].
///
/// The locator is the full object key (`{prefix}{uuid}.{ext}`). A fresh key
/// is generated per `put`, so retries produce a new locator rather than a
/// conflict.
pub struct S3ObjectStore {
    config: S3StoreConfig,
    client: aws_sdk_s3::Client,
    base_url: String,
}

impl std::fmt::Debug for S3ObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3ObjectStore")
            .field("config", &self.config)
            .field("client", &"<S3Client>")
            .finish_non_exhaustive()
    }
}

impl S3ObjectStore {
    /// Create a new `S3ObjectStore` by building an AWS SDK client.
    pub async fn new(config: S3StoreConfig) -> Self {
        let client = build_client(&config).await;
        Self::with_client(config, client)
    }

    /// Create an `S3ObjectStore` with a pre-built client (for testing).
    pub fn with_client(config: S3StoreConfig, client: aws_sdk_s3::Client) -> Self {
        let base_url = config.base_url();
        Self {
            config,
            client,
            base_url,
        }
    }

    /// Generate a new object key for the given content type.
    fn new_key(&self, content_type: &str) -> String {
        format!(
            "{}{}.{}",
            self.config.prefix,
            Uuid::now_v7(),
            extension_for(content_type)
        )
    }

    /// Check that the bucket is reachable.
    #[instrument(skip(self), fields(bucket = %self.config.bucket))]
    pub async fn health_check(&self) -> Result<(), StorageError> {
        self.client
            .head_bucket()
            .bucket(&self.config.bucket)
            .send()
            .await
            .map_err(|e| {
                let err_str = DisplayErrorContext(&e).to_string();
                error!(error = %err_str, "S3 health check failed");
                classify_sdk_error(&err_str)
            })?;
        info!("S3 health check passed");
        Ok(())
    }
}

#[async_trait]
impl StorageClient for S3ObjectStore {
    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "s3"
    }

    #[instrument(skip(self, content), fields(bucket = %self.config.bucket, size = content.len()))]
    async fn put(&self, content: Bytes, content_type: &str) -> Result<Locator, StorageError> {
        self.config
            .policy
            .check(content_type, content.len() as u64)?;

        let key = self.new_key(content_type);
        debug!(key = %key, "uploading object to S3");

        let content_length = i64::try_from(content.len()).unwrap_or(i64::MAX);
        self.client
            .put_object()
            .bucket(&self.config.bucket)
            .key(&key)
            .content_type(content_type)
            .content_length(content_length)
            .body(ByteStream::from(content))
            .send()
            .await
            .map_err(|e| {
                let err_str = DisplayErrorContext(&e).to_string();
                error!(error = %err_str, key = %key, "S3 put_object failed");
                classify_sdk_error(&err_str)
            })?;

        info!(key = %key, "object stored in S3");
        Ok(Locator::new(key))
    }

    #[instrument(skip(self), fields(bucket = %self.config.bucket))]
    async fn delete(&self, locator: &Locator) -> Result<(), StorageError> {
        self.client
            .delete_object()
            .bucket(&self.config.bucket)
            .key(locator.as_str())
            .send()
            .await
            .map_err(|e| {
                let err_str = DisplayErrorContext(&e).to_string();
                error!(error = %err_str, key = %locator, "S3 delete_object failed");
                classify_sdk_error(&err_str)
            })?;

        info!(key = %locator, "object deleted from S3");
        Ok(())
    }

    fn public_url(&self, locator: &Locator) -> String {
        format!("{}/{locator}", self.base_url)
    }

    fn thumbnail_url(&self, locator: &Locator, content_type: &str) -> Option<String> {
        let prefix = self.config.thumbnail_prefix.as_deref()?;
        is_image(content_type).then(|| format!("{}/{prefix}{locator}", self.base_url))
    }
}

#[cfg(test)]
mod tests {
    use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};

    use super::*;

    fn offline_client() -> aws_sdk_s3::Client {
        // Points at a closed port so any request that slips through fails fast.
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(Credentials::new("AKIDTEST", "SECRETTEST", None, None, "test"))
            .endpoint_url("http://127.0.0.1:1")
            .force_path_style(true)
            .build();
        aws_sdk_s3::Client::from_conf(config)
    }

    fn store(config: S3StoreConfig) -> S3ObjectStore {
        S3ObjectStore::with_client(config, offline_client())
    }

    #[test]
    fn keys_are_unique_and_prefixed() {
        let store = store(S3StoreConfig::new("us-east-1", "uploads").with_prefix("files/"));
        let a = store.new_key("image/png");
        let b = store.new_key("image/png");
        assert_ne!(a, b);
        assert!(a.starts_with("files/"));
        assert!(a.ends_with(".png"));
    }

    #[test]
    fn public_url_composes_bucket_region_and_key() {
        let store = store(S3StoreConfig::new("ap-southeast-1", "uploads"));
        let locator = Locator::from("files/abc.png");
        assert_eq!(
            store.public_url(&locator),
            "https://uploads.s3.ap-southeast-1.amazonaws.com/files/abc.png"
        );
    }

    #[test]
    fn thumbnail_requires_prefix_and_image() {
        let plain = store(S3StoreConfig::new("us-east-1", "uploads"));
        let locator = Locator::from("abc.png");
        assert_eq!(plain.thumbnail_url(&locator, "image/png"), None);

        let with_thumbs = store(
            S3StoreConfig::new("us-east-1", "uploads")
                .with_public_base_url("https://cdn.example.com")
                .with_thumbnail_prefix("thumbs/"),
        );
        assert_eq!(
            with_thumbs.thumbnail_url(&locator, "image/png").as_deref(),
            Some("https://cdn.example.com/thumbs/abc.png")
        );
        assert_eq!(with_thumbs.thumbnail_url(&locator, "text/plain"), None);
    }

    #[tokio::test]
    async fn policy_violation_is_rejected_before_any_request() {
        let store = store(S3StoreConfig::new("us-east-1", "uploads"));
        let result = store
            .put(Bytes::from_static(b"%PDF-1.7"), "application/pdf")
            .await;
        assert!(matches!(result, Err(StorageError::InvalidPayload(_))));

        let oversized = Bytes::from(vec![0u8; 100 * 1024 + 1]);
        let result = store.put(oversized, "image/png").await;
        assert!(matches!(result, Err(StorageError::InvalidPayload(_))));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_unavailable() {
        let store = store(S3StoreConfig::new("us-east-1", "uploads"));
        let result = store.put(Bytes::from_static(b"png"), "image/png").await;
        assert!(
            matches!(result, Err(StorageError::Unavailable(_))),
            "expected Unavailable, got {result:?}"
        );
    }
}
