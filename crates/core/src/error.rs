use thiserror::Error;

/// Reasons an upload is rejected by an [`UploadPolicy`](crate::UploadPolicy).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyViolation {
    /// The payload has no bytes.
    #[error("payload is empty")]
    Empty,

    /// The payload exceeds the configured size ceiling.
    #[error("payload too large: {size} bytes exceeds limit of {limit} bytes")]
    TooLarge {
        /// Actual size.
        size: u64,
        /// Maximum allowed size.
        limit: u64,
    },

    /// The content type is not on the allow-list.
    #[error("content type not allowed: {0}")]
    ContentTypeNotAllowed(String),
}
