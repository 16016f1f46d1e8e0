/// Errors from file metadata repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// The database could not be reached.
    #[error("connection error: {0}")]
    Connection(String),

    /// A constraint was violated (duplicate id, invalid value).
    #[error("constraint violation: {0}")]
    Constraint(String),

    /// A row could not be converted to or from the domain type.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Any other backend failure.
    #[error("backend error: {0}")]
    Backend(String),
}
