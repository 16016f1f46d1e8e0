use filehub_core::PolicyViolation;
use thiserror::Error;

/// Errors from object storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The payload was rejected before anything was written.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// The backend could not be reached or refused the request.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The client is misconfigured (missing bucket, bad endpoint).
    #[error("storage configuration error: {0}")]
    Configuration(String),
}

impl From<PolicyViolation> for StorageError {
    fn from(violation: PolicyViolation) -> Self {
        Self::InvalidPayload(violation.to_string())
    }
}
