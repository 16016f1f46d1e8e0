use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use filehub_service::ServiceError;

/// Errors that can occur when running the filehub server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// A configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// The request could not be interpreted (bad multipart body, malformed id).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A service-level error surfaced through the API.
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl ServerError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Service(e) => match e {
                ServiceError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
                ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
                ServiceError::StorageUnavailable(_) | ServiceError::ShuttingDown => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
                ServiceError::Persistence(_) | ServiceError::Internal(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    /// Stable snake_case classification included in error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "configuration",
            Self::InvalidRequest(_) => "invalid_request",
            Self::Service(e) => e.kind(),
        }
    }

    /// Message safe to show the caller. Backend details stay in the logs.
    fn public_message(&self) -> String {
        match self {
            Self::InvalidRequest(_) => self.to_string(),
            Self::Service(e) if e.is_client_error() => e.to_string(),
            Self::Service(ServiceError::StorageUnavailable(_)) => {
                "storage backend unavailable".to_owned()
            }
            Self::Service(ServiceError::ShuttingDown) => "service is shutting down".to_owned(),
            Self::Service(ServiceError::Persistence(_)) => {
                "failed to persist file metadata".to_owned()
            }
            _ => "internal server error".to_owned(),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(kind = self.kind(), error = %self, "request failed");
        }

        let body = serde_json::json!({
            "status": status.as_u16(),
            "kind": self.kind(),
            "error": self.public_message(),
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use filehub_core::FileId;

    use super::*;

    #[test]
    fn service_errors_map_to_status() {
        let cases = [
            (ServiceError::InvalidPayload("x".into()), StatusCode::BAD_REQUEST),
            (ServiceError::NotFound(FileId::new()), StatusCode::NOT_FOUND),
            (
                ServiceError::StorageUnavailable("down".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (ServiceError::ShuttingDown, StatusCode::SERVICE_UNAVAILABLE),
            (
                ServiceError::Persistence("dup".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ServiceError::Internal("panic".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(ServerError::from(err).status(), expected);
        }
    }

    #[test]
    fn backend_details_are_not_exposed() {
        let err = ServerError::from(ServiceError::Persistence(
            "connection error: password authentication failed for user filehub".into(),
        ));
        assert_eq!(err.public_message(), "failed to persist file metadata");
        assert_eq!(err.kind(), "persistence_error");
    }

    #[test]
    fn client_errors_keep_their_message() {
        let err = ServerError::from(ServiceError::InvalidPayload(
            "content type not allowed: application/pdf".into(),
        ));
        assert_eq!(
            err.public_message(),
            "invalid payload: content type not allowed: application/pdf"
        );
    }
}
