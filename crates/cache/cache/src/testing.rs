use std::time::Duration;

use crate::client::CacheClient;
use crate::error::CacheError;

const TTL: Duration = Duration::from_secs(60);

/// Run the full cache conformance test suite.
///
/// Call this from your backend's test module with a fresh, open client. The
/// suite closes the client as its last step.
///
/// # Errors
///
/// Returns an error if the backend fails an operation that should succeed.
pub async fn run_cache_conformance_tests(cache: &dyn CacheClient) -> Result<(), CacheError> {
    test_get_missing(cache).await?;
    test_set_and_get(cache).await?;
    test_set_overwrites(cache).await?;
    test_delete(cache).await?;
    test_ttl_expiry(cache).await?;
    test_close(cache).await?;
    Ok(())
}

async fn test_get_missing(cache: &dyn CacheClient) -> Result<(), CacheError> {
    let val = cache.get("conformance:missing").await?;
    assert!(val.is_none(), "get on missing key should return None");
    Ok(())
}

async fn test_set_and_get(cache: &dyn CacheClient) -> Result<(), CacheError> {
    cache.set("conformance:set-get", "hello", TTL).await?;
    let val = cache.get("conformance:set-get").await?;
    assert_eq!(val.as_deref(), Some("hello"));
    Ok(())
}

async fn test_set_overwrites(cache: &dyn CacheClient) -> Result<(), CacheError> {
    cache.set("conformance:overwrite", "v1", TTL).await?;
    cache.set("conformance:overwrite", "v2", TTL).await?;
    let val = cache.get("conformance:overwrite").await?;
    assert_eq!(val.as_deref(), Some("v2"));
    Ok(())
}

async fn test_delete(cache: &dyn CacheClient) -> Result<(), CacheError> {
    cache.set("conformance:delete", "bye", TTL).await?;
    assert!(cache.delete("conformance:delete").await?);
    assert!(cache.get("conformance:delete").await?.is_none());
    assert!(
        !cache.delete("conformance:delete").await?,
        "delete on missing key should return false"
    );
    Ok(())
}

async fn test_ttl_expiry(cache: &dyn CacheClient) -> Result<(), CacheError> {
    cache
        .set("conformance:ttl", "short", Duration::from_millis(50))
        .await?;
    tokio::time::sleep(Duration::from_millis(150)).await;
    let val = cache.get("conformance:ttl").await?;
    assert!(val.is_none(), "entry should expire after its ttl");
    Ok(())
}

async fn test_close(cache: &dyn CacheClient) -> Result<(), CacheError> {
    cache.close().await?;
    let result = cache.get("conformance:set-get").await;
    assert!(
        matches!(result, Err(CacheError::Closed)),
        "operations after close should fail with Closed, got {result:?}"
    );
    Ok(())
}
