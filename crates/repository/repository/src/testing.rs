use filehub_core::{FileId, NewFile, OwnerId};

use crate::error::RepositoryError;
use crate::repository::FileRepository;

fn sample(storage_key: &str) -> NewFile {
    NewFile::new(storage_key, "image/png", 10, Some(OwnerId::from("owner-1")))
}

/// Run the full repository conformance test suite.
///
/// Call this from your backend's test module with a fresh repository.
///
/// # Errors
///
/// Returns an error if the backend fails an operation that should succeed.
pub async fn run_repository_conformance_tests(
    repo: &dyn FileRepository,
) -> Result<(), RepositoryError> {
    test_find_missing(repo).await?;
    test_save_assigns_id(repo).await?;
    test_save_keeps_supplied_id(repo).await?;
    test_duplicate_id_is_constraint_violation(repo).await?;
    test_owner_is_optional(repo).await?;
    Ok(())
}

async fn test_find_missing(repo: &dyn FileRepository) -> Result<(), RepositoryError> {
    let found = repo.find_by_id(&FileId::new()).await?;
    assert!(found.is_none(), "find_by_id on missing id should return None");
    Ok(())
}

async fn test_save_assigns_id(repo: &dyn FileRepository) -> Result<(), RepositoryError> {
    let file = sample("assigned.png");
    let id = repo.save(&file).await?;
    let found = repo.find_by_id(&id).await?;
    assert_eq!(found, Some(file.into_stored(id)));
    Ok(())
}

async fn test_save_keeps_supplied_id(repo: &dyn FileRepository) -> Result<(), RepositoryError> {
    let wanted = FileId::new();
    let file = sample("supplied.png").with_id(wanted);
    let id = repo.save(&file).await?;
    assert_eq!(id, wanted, "save should keep a supplied id");
    assert!(repo.find_by_id(&wanted).await?.is_some());
    Ok(())
}

async fn test_duplicate_id_is_constraint_violation(
    repo: &dyn FileRepository,
) -> Result<(), RepositoryError> {
    let id = FileId::new();
    repo.save(&sample("first.png").with_id(id)).await?;
    let result = repo.save(&sample("second.png").with_id(id)).await;
    assert!(
        matches!(result, Err(RepositoryError::Constraint(_))),
        "duplicate id should be a constraint violation, got {result:?}"
    );
    let kept = repo.find_by_id(&id).await?;
    assert_eq!(
        kept.map(|f| f.storage_key).as_deref(),
        Some("first.png"),
        "original row should remain"
    );
    Ok(())
}

async fn test_owner_is_optional(repo: &dyn FileRepository) -> Result<(), RepositoryError> {
    let file = NewFile::new("anonymous.jpg", "image/jpeg", 42, None);
    let id = repo.save(&file).await?;
    let found = repo.find_by_id(&id).await?;
    assert_eq!(found.and_then(|f| f.owner_id), None);
    Ok(())
}
