use thiserror::Error;

/// Errors from cache client operations.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("backend error: {0}")]
    Backend(String),

    #[error("cache connection is closed")]
    Closed,
}
