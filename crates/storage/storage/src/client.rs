use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use filehub_core::normalize_content_type;

use crate::error::StorageError;

/// Backend-specific key of a stored object, returned by [`StorageClient::put`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locator(String);

impl Locator {
    /// Create a locator from a raw key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Return the raw key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the locator, returning the raw key.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Locator {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Locator {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Capability to persist uploaded bytes and address them publicly.
///
/// Implementations must be `Send + Sync` and safe for concurrent use; they are
/// constructed once at startup and shared by every request.
#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Short backend name used in logs (e.g. `"s3"`, `"mock"`).
    fn name(&self) -> &str;

    /// Durably store `content` and return its locator.
    ///
    /// Fails with [`StorageError::InvalidPayload`] if the payload breaks the
    /// backend's upload policy and with [`StorageError::Unavailable`] if the
    /// backend cannot be reached. Nothing is stored when `put` fails.
    async fn put(&self, content: Bytes, content_type: &str) -> Result<Locator, StorageError>;

    /// Remove a stored object. Deleting an absent object is not an error.
    async fn delete(&self, locator: &Locator) -> Result<(), StorageError>;

    /// Stable external URI of a stored object.
    fn public_url(&self, locator: &Locator) -> String;

    /// External URI of the object's thumbnail variant, if the backend
    /// provides one for this content type.
    fn thumbnail_url(&self, locator: &Locator, content_type: &str) -> Option<String> {
        let _ = (locator, content_type);
        None
    }
}

/// File extension used when naming objects of the given MIME type.
pub fn extension_for(content_type: &str) -> &'static str {
    match normalize_content_type(content_type).as_str() {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "application/pdf" => "pdf",
        "text/plain" => "txt",
        _ => "bin",
    }
}
