use async_trait::async_trait;

use filehub_core::{FileId, NewFile, StoredFile};

use crate::error::RepositoryError;

/// Source of truth for file metadata.
///
/// Implementations must be `Send + Sync` to be shared across async tasks.
#[async_trait]
pub trait FileRepository: Send + Sync {
    /// Persist a new file row and return its id.
    ///
    /// A fresh id is assigned when `file.id` is `None`. Saving an id that
    /// already exists fails with [`RepositoryError::Constraint`].
    async fn save(&self, file: &NewFile) -> Result<FileId, RepositoryError>;

    /// Look up a file row. Returns `None` when no row matches, which is not
    /// an error.
    async fn find_by_id(&self, id: &FileId) -> Result<Option<StoredFile>, RepositoryError>;
}
