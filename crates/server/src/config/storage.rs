use serde::Deserialize;

use filehub_storage_memory::DEFAULT_MOCK_BASE_URL;

/// Object storage configuration.
///
/// The mock store is used in development mode and S3 in production mode;
/// see [`Mode`](super::Mode).
#[derive(Debug, Deserialize)]
pub struct StorageConfig {
    /// Base URL for locators issued by the mock store.
    #[serde(default = "default_mock_base_url")]
    pub mock_base_url: String,
    /// S3 bucket. Required in production mode.
    pub bucket: Option<String>,
    /// AWS region of the bucket.
    #[serde(default = "default_region")]
    pub region: String,
    /// Custom endpoint for S3-compatible services (`LocalStack`, `MinIO`).
    pub endpoint_url: Option<String>,
    /// Key prefix for stored objects (e.g. `"uploads/"`).
    #[serde(default)]
    pub prefix: String,
    /// Public base URL (e.g. a CDN) used instead of the bucket URL.
    pub public_base_url: Option<String>,
    /// Key prefix under which thumbnails are published.
    pub thumbnail_prefix: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            mock_base_url: default_mock_base_url(),
            bucket: None,
            region: default_region(),
            endpoint_url: None,
            prefix: String::new(),
            public_base_url: None,
            thumbnail_prefix: None,
        }
    }
}

fn default_mock_base_url() -> String {
    DEFAULT_MOCK_BASE_URL.to_owned()
}

fn default_region() -> String {
    "us-east-1".to_owned()
}
