use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{FileId, OwnerId};

/// Metadata for a file whose bytes were accepted by a storage backend but
/// which has not been written to the repository yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFile {
    /// Identifier to use. The repository assigns one when `None`.
    pub id: Option<FileId>,
    /// Backend-specific locator returned by the storage client.
    pub storage_key: String,
    /// MIME content type of the uploaded payload.
    pub content_type: String,
    /// Payload size in bytes.
    pub size_bytes: u64,
    /// User that uploaded the file, if known.
    pub owner_id: Option<OwnerId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl NewFile {
    /// Describe a freshly stored payload, stamped with the current time.
    ///
    /// The timestamp is truncated to microseconds so that a record read back
    /// from `PostgreSQL` compares equal to the in-memory original.
    pub fn new(
        storage_key: impl Into<String>,
        content_type: impl Into<String>,
        size_bytes: u64,
        owner_id: Option<OwnerId>,
    ) -> Self {
        Self {
            id: None,
            storage_key: storage_key.into(),
            content_type: content_type.into(),
            size_bytes,
            owner_id,
            created_at: Utc::now().trunc_subsecs(6),
        }
    }

    /// Pin the identifier instead of letting the repository choose one.
    #[must_use]
    pub fn with_id(mut self, id: FileId) -> Self {
        self.id = Some(id);
        self
    }

    /// Turn this into the persisted row shape under the given id.
    pub fn into_stored(self, id: FileId) -> StoredFile {
        StoredFile {
            id,
            storage_key: self.storage_key,
            content_type: self.content_type,
            size_bytes: self.size_bytes,
            owner_id: self.owner_id,
            created_at: self.created_at,
        }
    }
}

/// A file metadata row as persisted by a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    pub id: FileId,
    pub storage_key: String,
    pub content_type: String,
    pub size_bytes: u64,
    pub owner_id: Option<OwnerId>,
    pub created_at: DateTime<Utc>,
}

/// File metadata as returned to callers and cached.
///
/// `uri` and `thumbnail_uri` are derived from `storage_key` by the storage
/// client and are not persisted in the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Unique file identifier.
    pub id: FileId,
    /// Backend-specific storage locator.
    pub storage_key: String,
    /// MIME content type.
    pub content_type: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Uploading user, if known.
    pub owner_id: Option<OwnerId>,
    /// Public URI of the stored object.
    pub uri: String,
    /// Public URI of the thumbnail variant, when the backend provides one.
    pub thumbnail_uri: Option<String>,
    /// When the file was created.
    pub created_at: DateTime<Utc>,
}

impl FileRecord {
    /// Attach derived URIs to a persisted row.
    pub fn from_stored(stored: StoredFile, uri: String, thumbnail_uri: Option<String>) -> Self {
        Self {
            id: stored.id,
            storage_key: stored.storage_key,
            content_type: stored.content_type,
            size_bytes: stored.size_bytes,
            owner_id: stored.owner_id,
            uri,
            thumbnail_uri,
            created_at: stored.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_file_has_no_id_and_microsecond_timestamp() {
        let file = NewFile::new("abc.png", "image/png", 10, None);
        assert!(file.id.is_none());
        assert_eq!(file.created_at.timestamp_subsec_nanos() % 1_000, 0);
    }

    #[test]
    fn into_stored_keeps_fields() {
        let id = FileId::new();
        let file = NewFile::new("abc.png", "image/png", 10, Some(OwnerId::from("u1")));
        let created_at = file.created_at;
        let stored = file.into_stored(id);
        assert_eq!(stored.id, id);
        assert_eq!(stored.storage_key, "abc.png");
        assert_eq!(stored.owner_id.as_ref().map(OwnerId::as_str), Some("u1"));
        assert_eq!(stored.created_at, created_at);
    }

    #[test]
    fn record_json_snapshot_is_lossless() {
        let stored = NewFile::new("k", "image/png", 3, None).into_stored(FileId::new());
        let record = FileRecord::from_stored(
            stored,
            "http://host/k".into(),
            Some("http://host/thumbnails/k".into()),
        );
        let json = serde_json::to_string(&record).unwrap();
        let back: FileRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
