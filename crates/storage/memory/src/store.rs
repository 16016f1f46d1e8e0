use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use sha2::{Digest, Sha256};
use tracing::debug;

use filehub_core::{UploadPolicy, is_image};
use filehub_storage::{Locator, StorageClient, StorageError, extension_for};

/// Base URL used for mock object URIs when none is configured.
pub const DEFAULT_MOCK_BASE_URL: &str = "http://localhost:9000/filehub-mock";

/// A single stored object.
#[derive(Debug, Clone)]
struct MockObject {
    data: Bytes,
    /// Number of successful `put` calls not yet matched by a `delete`.
    refs: usize,
}

/// In-memory [`StorageClient`] standing in for a real object store.
///
/// Objects are content addressed: the locator is the `SHA-256` of the bytes
/// plus an extension derived from the content type, so uploading identical
/// content twice yields the same locator and URI. Each `put` takes a
/// reference and each `delete` releases one; the bytes are dropped when the
/// last reference goes. No network calls are made.
#[derive(Debug)]
pub struct MockObjectStore {
    objects: DashMap<String, MockObject>,
    base_url: String,
    policy: UploadPolicy,
}

impl Default for MockObjectStore {
    fn default() -> Self {
        Self::new(DEFAULT_MOCK_BASE_URL, UploadPolicy::default())
    }
}

impl MockObjectStore {
    /// Create an empty store serving URIs under `base_url`.
    pub fn new(base_url: impl Into<String>, policy: UploadPolicy) -> Self {
        Self {
            objects: DashMap::new(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            policy,
        }
    }

    /// Compute the locator that `put` assigns to this content.
    pub fn locator_for(content: &[u8], content_type: &str) -> Locator {
        let digest = hex::encode(Sha256::digest(content));
        Locator::new(format!("{digest}.{}", extension_for(content_type)))
    }

    /// Return the stored bytes for a locator.
    pub fn object(&self, locator: &Locator) -> Option<Bytes> {
        self.objects.get(locator.as_str()).map(|o| o.data.clone())
    }

    /// Return `true` if an object is stored under the locator.
    pub fn contains(&self, locator: &Locator) -> bool {
        self.objects.contains_key(locator.as_str())
    }

    /// Number of distinct stored objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Return `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[async_trait]
impl StorageClient for MockObjectStore {
    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "mock"
    }

    async fn put(&self, content: Bytes, content_type: &str) -> Result<Locator, StorageError> {
        self.policy.check(content_type, content.len() as u64)?;

        let locator = Self::locator_for(&content, content_type);
        self.objects
            .entry(locator.as_str().to_owned())
            .and_modify(|object| object.refs += 1)
            .or_insert_with(|| MockObject {
                data: content,
                refs: 1,
            });

        debug!(locator = %locator, "mock object stored");
        Ok(locator)
    }

    async fn delete(&self, locator: &Locator) -> Result<(), StorageError> {
        // Release one reference; drop the bytes once none remain.
        if let Some(mut object) = self.objects.get_mut(locator.as_str()) {
            object.refs = object.refs.saturating_sub(1);
        }
        self.objects
            .remove_if(locator.as_str(), |_, object| object.refs == 0);
        debug!(locator = %locator, "mock object released");
        Ok(())
    }

    fn public_url(&self, locator: &Locator) -> String {
        format!("{}/{locator}", self.base_url)
    }

    fn thumbnail_url(&self, locator: &Locator, content_type: &str) -> Option<String> {
        is_image(content_type).then(|| format!("{}/thumbnails/{locator}", self.base_url))
    }
}

#[cfg(test)]
mod tests {
    use filehub_storage::testing::run_storage_conformance_tests;

    use super::*;

    #[tokio::test]
    async fn conformance() {
        let store = MockObjectStore::default();
        run_storage_conformance_tests(&store).await.unwrap();
    }

    #[tokio::test]
    async fn locator_is_deterministic_for_content() {
        let store = MockObjectStore::default();
        let content = Bytes::from_static(b"0123456789");
        let first = store.put(content.clone(), "image/png").await.unwrap();
        let second = store.put(content.clone(), "image/png").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first, MockObjectStore::locator_for(&content, "image/png"));
        assert!(first.as_str().ends_with(".png"));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn url_scheme() {
        let store = MockObjectStore::new("http://cdn.test/", UploadPolicy::default());
        let locator = store
            .put(Bytes::from_static(b"abc"), "image/jpeg")
            .await
            .unwrap();
        assert_eq!(
            store.public_url(&locator),
            format!("http://cdn.test/{locator}")
        );
        assert_eq!(
            store.thumbnail_url(&locator, "image/jpeg"),
            Some(format!("http://cdn.test/thumbnails/{locator}"))
        );
        assert_eq!(store.thumbnail_url(&locator, "text/plain"), None);
    }

    #[tokio::test]
    async fn delete_releases_one_reference_at_a_time() {
        let store = MockObjectStore::default();
        let content = Bytes::from_static(b"shared");
        let locator = store.put(content.clone(), "image/png").await.unwrap();
        store.put(content, "image/png").await.unwrap();

        store.delete(&locator).await.unwrap();
        assert!(store.contains(&locator), "second reference keeps the bytes");

        store.delete(&locator).await.unwrap();
        assert!(!store.contains(&locator));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn rejected_put_stores_nothing() {
        let store = MockObjectStore::default();
        let result = store
            .put(Bytes::from_static(b"%PDF"), "application/pdf")
            .await;
        assert!(matches!(result, Err(StorageError::InvalidPayload(_))));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn stored_bytes_are_retrievable() {
        let store = MockObjectStore::default();
        let locator = store
            .put(Bytes::from_static(b"pixels"), "image/png")
            .await
            .unwrap();
        assert_eq!(store.object(&locator).as_deref(), Some(&b"pixels"[..]));
    }
}
