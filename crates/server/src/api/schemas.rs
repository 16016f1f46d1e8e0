use chrono::{DateTime, Utc};
use serde::Serialize;

use filehub_core::{FileId, FileRecord, OwnerId};

/// Body returned by `POST /v1/file`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub id: FileId,
    pub uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_uri: Option<String>,
}

impl From<FileRecord> for UploadResponse {
    fn from(record: FileRecord) -> Self {
        Self {
            id: record.id,
            uri: record.uri,
            thumbnail_uri: record.thumbnail_uri,
        }
    }
}

/// Body returned by `GET /v1/file/{id}`: the upload shape plus metadata.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileResponse {
    pub id: FileId,
    pub uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_uri: Option<String>,
    pub content_type: String,
    pub size_bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<OwnerId>,
    pub created_at: DateTime<Utc>,
}

impl From<FileRecord> for FileResponse {
    fn from(record: FileRecord) -> Self {
        Self {
            id: record.id,
            uri: record.uri,
            thumbnail_uri: record.thumbnail_uri,
            content_type: record.content_type,
            size_bytes: record.size_bytes,
            owner_id: record.owner_id,
            created_at: record.created_at,
        }
    }
}

/// Body returned by `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
