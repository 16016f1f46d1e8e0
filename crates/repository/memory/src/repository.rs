use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use filehub_core::{FileId, NewFile, StoredFile};
use filehub_repository::{FileRepository, RepositoryError};

/// In-memory file repository using `DashMap`. Suitable for development and
/// testing.
#[derive(Debug, Default)]
pub struct MemoryFileRepository {
    files: DashMap<FileId, StoredFile>,
}

impl MemoryFileRepository {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Return `true` if no rows are stored.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[async_trait]
impl FileRepository for MemoryFileRepository {
    async fn save(&self, file: &NewFile) -> Result<FileId, RepositoryError> {
        let id = file.id.unwrap_or_default();
        match self.files.entry(id) {
            Entry::Occupied(_) => Err(RepositoryError::Constraint(format!(
                "file id already exists: {id}"
            ))),
            Entry::Vacant(vacant) => {
                vacant.insert(file.clone().into_stored(id));
                Ok(id)
            }
        }
    }

    async fn find_by_id(&self, id: &FileId) -> Result<Option<StoredFile>, RepositoryError> {
        Ok(self.files.get(id).map(|f| f.value().clone()))
    }
}

#[cfg(test)]
mod tests {
    use filehub_repository::testing::run_repository_conformance_tests;

    use super::*;

    #[tokio::test]
    async fn conformance() {
        let repo = MemoryFileRepository::new();
        run_repository_conformance_tests(&repo).await.unwrap();
    }

    #[tokio::test]
    async fn len_tracks_saved_rows() {
        let repo = MemoryFileRepository::new();
        assert!(repo.is_empty());
        repo.save(&NewFile::new("a.png", "image/png", 1, None))
            .await
            .unwrap();
        repo.save(&NewFile::new("b.png", "image/png", 1, None))
            .await
            .unwrap();
        assert_eq!(repo.len(), 2);
    }
}
