use bytes::Bytes;

use filehub_core::UploadPolicy;

use crate::client::StorageClient;
use crate::error::StorageError;

/// Run the storage client conformance test suite.
///
/// The client under test must enforce [`UploadPolicy::default`].
///
/// # Errors
///
/// Returns an error if the backend fails an operation that should succeed.
pub async fn run_storage_conformance_tests(client: &dyn StorageClient) -> Result<(), StorageError> {
    test_put_returns_addressable_locator(client).await?;
    test_delete_stored_object(client).await?;
    test_delete_missing_is_ok(client).await?;
    test_rejects_oversized(client).await;
    test_rejects_disallowed_type(client).await;
    Ok(())
}

async fn test_put_returns_addressable_locator(
    client: &dyn StorageClient,
) -> Result<(), StorageError> {
    let locator = client
        .put(Bytes::from_static(b"0123456789"), "image/png")
        .await?;
    assert!(!locator.as_str().is_empty(), "locator should not be empty");
    let url = client.public_url(&locator);
    assert!(
        url.ends_with(locator.as_str()),
        "public url {url} should address locator {locator}"
    );
    Ok(())
}

async fn test_delete_stored_object(client: &dyn StorageClient) -> Result<(), StorageError> {
    let locator = client
        .put(Bytes::from_static(b"delete-me"), "image/jpeg")
        .await?;
    client.delete(&locator).await?;
    Ok(())
}

async fn test_delete_missing_is_ok(client: &dyn StorageClient) -> Result<(), StorageError> {
    client.delete(&"never-stored.png".into()).await
}

async fn test_rejects_oversized(client: &dyn StorageClient) {
    let limit = UploadPolicy::default().max_size_bytes;
    let oversized = vec![0u8; usize::try_from(limit + 1).unwrap_or(usize::MAX)];
    let result = client.put(Bytes::from(oversized), "image/png").await;
    assert!(
        matches!(result, Err(StorageError::InvalidPayload(_))),
        "oversized payload should be rejected as invalid, got {result:?}"
    );
}

async fn test_rejects_disallowed_type(client: &dyn StorageClient) {
    let result = client
        .put(Bytes::from_static(b"#!/bin/sh"), "application/x-sh")
        .await;
    assert!(
        matches!(result, Err(StorageError::InvalidPayload(_))),
        "disallowed content type should be rejected as invalid, got {result:?}"
    );
}
