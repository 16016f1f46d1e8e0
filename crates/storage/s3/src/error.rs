use filehub_storage::StorageError;

/// Classify an AWS SDK error string into a [`StorageError`].
///
/// Bucket misconfiguration and credential problems surface as
/// [`StorageError::Configuration`]; everything else (throttling, timeouts,
/// connection failures, service errors) means the store is unavailable.
pub fn classify_sdk_error(error_str: &str) -> StorageError {
    let lower = error_str.to_lowercase();
    if lower.contains("nosuchbucket")
        || lower.contains("invalidbucketname")
        || lower.contains("invalidaccesskeyid")
        || lower.contains("credentials")
    {
        StorageError::Configuration(error_str.to_owned())
    } else {
        StorageError::Unavailable(error_str.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_missing_bucket() {
        let err = classify_sdk_error("NoSuchBucket: The specified bucket does not exist");
        assert!(matches!(err, StorageError::Configuration(_)));
    }

    #[test]
    fn classify_missing_credentials() {
        let err = classify_sdk_error("failed to load credentials from the environment");
        assert!(matches!(err, StorageError::Configuration(_)));
    }

    #[test]
    fn classify_connection_as_unavailable() {
        let err = classify_sdk_error("dispatch failure: Connection refused: localhost:4566");
        assert!(matches!(err, StorageError::Unavailable(_)));
    }

    #[test]
    fn classify_throttling_as_unavailable() {
        let err = classify_sdk_error("SlowDown: Please reduce your request rate");
        assert!(matches!(err, StorageError::Unavailable(_)));
    }
}
