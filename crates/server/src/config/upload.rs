use serde::Deserialize;

use filehub_core::UploadPolicy;

/// Upload limits applied before anything is written.
#[derive(Debug, Deserialize)]
pub struct UploadConfig {
    /// Maximum payload size in bytes.
    #[serde(default = "default_max_size_bytes")]
    pub max_size_bytes: u64,
    /// Accepted MIME types. An empty list accepts any type.
    #[serde(default = "default_allowed_content_types")]
    pub allowed_content_types: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_size_bytes: default_max_size_bytes(),
            allowed_content_types: default_allowed_content_types(),
        }
    }
}

impl UploadConfig {
    /// Build the policy shared by the service and the storage backend.
    pub fn policy(&self) -> UploadPolicy {
        UploadPolicy {
            max_size_bytes: self.max_size_bytes,
            allowed_content_types: self.allowed_content_types.clone(),
        }
    }
}

fn default_max_size_bytes() -> u64 {
    UploadPolicy::default().max_size_bytes
}

fn default_allowed_content_types() -> Vec<String> {
    UploadPolicy::default().allowed_content_types
}
