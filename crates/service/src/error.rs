use filehub_core::{FileId, PolicyViolation};
use filehub_repository::RepositoryError;
use filehub_storage::StorageError;

/// Errors returned by [`FileService`](crate::FileService).
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The payload was rejected before anything was written.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// The storage backend could not be reached or is misconfigured.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// The metadata repository failed to read or write.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// No file exists with the given id.
    #[error("file not found: {0}")]
    NotFound(FileId),

    /// The service has been shut down and accepts no new uploads.
    #[error("service is shutting down")]
    ShuttingDown,

    /// An upload task failed unexpectedly.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Stable snake_case classification, used in HTTP error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidPayload(_) => "invalid_payload",
            Self::StorageUnavailable(_) => "storage_unavailable",
            Self::Persistence(_) => "persistence_error",
            Self::NotFound(_) => "not_found",
            Self::ShuttingDown => "shutting_down",
            Self::Internal(_) => "internal",
        }
    }

    /// Return `true` if the caller caused the error.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidPayload(_) | Self::NotFound(_))
    }
}

impl From<PolicyViolation> for ServiceError {
    fn from(err: PolicyViolation) -> Self {
        Self::InvalidPayload(err.to_string())
    }
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidPayload(msg) => Self::InvalidPayload(msg),
            StorageError::Unavailable(_) | StorageError::Configuration(_) => {
                Self::StorageUnavailable(err.to_string())
            }
        }
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        Self::Persistence(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_errors_map_onto_taxonomy() {
        let invalid = ServiceError::from(StorageError::InvalidPayload("too big".into()));
        assert!(matches!(invalid, ServiceError::InvalidPayload(ref m) if m == "too big"));

        let down = ServiceError::from(StorageError::Unavailable("timeout".into()));
        assert_eq!(down.kind(), "storage_unavailable");

        let misconfigured = ServiceError::from(StorageError::Configuration("bucket".into()));
        assert_eq!(misconfigured.kind(), "storage_unavailable");
    }

    #[test]
    fn repository_errors_are_persistence() {
        let err = ServiceError::from(RepositoryError::Constraint("dup".into()));
        assert_eq!(err.kind(), "persistence_error");
        assert!(!err.is_client_error());
    }

    #[test]
    fn client_errors() {
        assert!(ServiceError::InvalidPayload("x".into()).is_client_error());
        assert!(ServiceError::NotFound(FileId::new()).is_client_error());
        assert!(!ServiceError::ShuttingDown.is_client_error());
        assert!(!ServiceError::Internal("panic".into()).is_client_error());
        assert!(!ServiceError::StorageUnavailable("down".into()).is_client_error());
    }

    #[test]
    fn policy_violation_is_invalid_payload() {
        let err = ServiceError::from(PolicyViolation::Empty);
        assert_eq!(err.kind(), "invalid_payload");
    }
}
