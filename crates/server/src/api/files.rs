use axum::Json;
use axum::body::Bytes;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use tracing::debug;

use filehub_core::{FileId, OwnerId};
use filehub_service::ServiceError;

use super::schemas::{FileResponse, UploadResponse};
use super::{AppState, OWNER_ID_HEADER};
use crate::error::ServerError;

/// Name of the multipart field holding the upload.
pub const FILE_FIELD: &str = "file";

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// `POST /v1/file` -- store a file sent as multipart form data.
///
/// The part named `file` is uploaded with the content type from its own
/// `Content-Type` header. Other parts are ignored.
pub async fn upload_file(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<impl IntoResponse, ServerError> {
    let owner_id = owner_from_headers(&headers);
    let (content, content_type) = read_file_field(multipart).await?;
    debug!(content_type = %content_type, size = content.len(), "upload received");

    let record = state
        .service
        .upload(content, &content_type, owner_id)
        .await?;

    Ok((StatusCode::CREATED, Json(UploadResponse::from(record))))
}

/// `GET /v1/file/{id}` -- fetch file metadata through the cache.
pub async fn get_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FileResponse>, ServerError> {
    let id: FileId = id
        .parse()
        .map_err(|_| ServerError::InvalidRequest(format!("malformed file id: {id}")))?;
    let record = state.service.get_file(id).await?;
    Ok(Json(FileResponse::from(record)))
}

fn owner_from_headers(headers: &HeaderMap) -> Option<OwnerId> {
    headers
        .get(OWNER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(OwnerId::from)
}

async fn read_file_field(mut multipart: Multipart) -> Result<(Bytes, String), ServerError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(multipart_error)?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let content_type = field
            .content_type()
            .unwrap_or(FALLBACK_CONTENT_TYPE)
            .to_owned();
        let content = field
            .bytes()
            .await
            .map_err(multipart_error)?;
        return Ok((content, content_type));
    }

    Err(ServerError::InvalidRequest(format!(
        "missing multipart field `{FILE_FIELD}`"
    )))
}

/// A body cut off by the request limit is an oversized payload, not a
/// malformed request.
fn multipart_error(e: MultipartError) -> ServerError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        debug!(error = %e.body_text(), "multipart body over limit");
        return ServiceError::InvalidPayload("payload exceeds the request body limit".into()).into();
    }
    ServerError::InvalidRequest(e.body_text())
}
