use serde::{Deserialize, Serialize};

use filehub_core::UploadPolicy;

/// Configuration for the S3 object store.
#[derive(Clone, Serialize, Deserialize)]
pub struct S3StoreConfig {
    /// AWS region (e.g. `"ap-southeast-1"`).
    pub region: String,

    /// Bucket that receives uploads.
    pub bucket: String,

    /// Optional endpoint URL override (`MinIO`, `LocalStack`).
    pub endpoint_url: Option<String>,

    /// Use path-style addressing (`{endpoint}/{bucket}/{key}`).
    #[serde(default)]
    pub force_path_style: bool,

    /// Key prefix for all uploaded objects (e.g. `"uploads/"`).
    #[serde(default)]
    pub prefix: String,

    /// Public base URL (e.g. a CDN) used instead of the bucket URL.
    pub public_base_url: Option<String>,

    /// Key prefix under which an out-of-band resizer publishes thumbnails.
    /// Thumbnail URIs are only produced when this is set.
    pub thumbnail_prefix: Option<String>,

    /// Upload policy enforced before any request is sent.
    #[serde(default)]
    pub policy: UploadPolicy,
}

impl std::fmt::Debug for S3StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3StoreConfig")
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .field("endpoint_url", &self.endpoint_url)
            .field("force_path_style", &self.force_path_style)
            .field("prefix", &self.prefix)
            .field("public_base_url", &self.public_base_url)
            .field("thumbnail_prefix", &self.thumbnail_prefix)
            .finish_non_exhaustive()
    }
}

impl S3StoreConfig {
    /// Create a config for the given region and bucket.
    pub fn new(region: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            bucket: bucket.into(),
            endpoint_url: None,
            force_path_style: false,
            prefix: String::new(),
            public_base_url: None,
            thumbnail_prefix: None,
            policy: UploadPolicy::default(),
        }
    }

    /// Set the endpoint URL override and switch to path-style addressing.
    #[must_use]
    pub fn with_endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self.force_path_style = true;
        self
    }

    /// Set the object key prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the public base URL.
    #[must_use]
    pub fn with_public_base_url(mut self, url: impl Into<String>) -> Self {
        self.public_base_url = Some(url.into());
        self
    }

    /// Set the thumbnail key prefix.
    #[must_use]
    pub fn with_thumbnail_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.thumbnail_prefix = Some(prefix.into());
        self
    }

    /// Set the upload policy.
    #[must_use]
    pub fn with_policy(mut self, policy: UploadPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Base URL that object keys are appended to.
    pub(crate) fn base_url(&self) -> String {
        if let Some(ref base) = self.public_base_url {
            return base.trim_end_matches('/').to_owned();
        }
        match self.endpoint_url {
            Some(ref endpoint) if self.force_path_style => {
                format!("{}/{}", endpoint.trim_end_matches('/'), self.bucket)
            }
            _ => format!("https://{}.s3.{}.amazonaws.com", self.bucket, self.region),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn virtual_hosted_url_by_default() {
        let config = S3StoreConfig::new("ap-southeast-1", "uploads");
        assert_eq!(
            config.base_url(),
            "https://uploads.s3.ap-southeast-1.amazonaws.com"
        );
    }

    #[test]
    fn path_style_url_for_custom_endpoint() {
        let config =
            S3StoreConfig::new("us-east-1", "uploads").with_endpoint_url("http://localhost:4566/");
        assert!(config.force_path_style);
        assert_eq!(config.base_url(), "http://localhost:4566/uploads");
    }

    #[test]
    fn public_base_url_wins() {
        let config = S3StoreConfig::new("us-east-1", "uploads")
            .with_endpoint_url("http://localhost:4566")
            .with_public_base_url("https://cdn.example.com/");
        assert_eq!(config.base_url(), "https://cdn.example.com");
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: S3StoreConfig =
            serde_json::from_str(r#"{"region":"eu-west-1","bucket":"b"}"#).unwrap();
        assert_eq!(config.prefix, "");
        assert!(!config.force_path_style);
        assert_eq!(config.policy, UploadPolicy::default());
    }
}
