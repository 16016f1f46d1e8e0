use std::time::Duration;

use filehub_core::UploadPolicy;

/// Tunables for [`FileService`](crate::FileService).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileServiceConfig {
    /// Size ceiling and allowed content types, checked before any side effect.
    pub policy: UploadPolicy,

    /// Lifetime of a cached `FileRecord` snapshot.
    pub cache_ttl: Duration,
}

impl Default for FileServiceConfig {
    fn default() -> Self {
        Self {
            policy: UploadPolicy::default(),
            cache_ttl: Duration::from_secs(3600),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ttl_is_one_hour() {
        let config = FileServiceConfig::default();
        assert_eq!(config.cache_ttl, Duration::from_secs(3600));
        assert_eq!(config.policy, UploadPolicy::default());
    }
}
