use std::sync::Arc;

use tracing::info;

use filehub_repository::FileRepository;
use filehub_repository_memory::MemoryFileRepository;
#[cfg(feature = "postgres")]
use filehub_repository_postgres::{PostgresFileRepository, PostgresRepositoryConfig};

use crate::config::RepositoryConfig;
use crate::error::ServerError;

/// Create the metadata repository from the given configuration.
///
/// The `PostgreSQL` backend runs its migrations while connecting.
#[allow(clippy::unused_async)]
pub async fn create_repository(
    config: &RepositoryConfig,
) -> Result<Arc<dyn FileRepository>, ServerError> {
    let repository: Arc<dyn FileRepository> = match config.backend.as_str() {
        "memory" => Arc::new(MemoryFileRepository::new()),
        #[cfg(feature = "postgres")]
        "postgres" => {
            let url = config.url.as_deref().ok_or_else(|| {
                ServerError::Config("postgres repository backend requires [repository] url".into())
            })?;
            let pg_config = PostgresRepositoryConfig {
                url: url.to_owned(),
                pool_size: config.pool_size,
                schema: config.schema.clone(),
                table_prefix: config.table_prefix.clone(),
                ssl_mode: config.ssl_mode.clone(),
                ..PostgresRepositoryConfig::default()
            };
            let repo = PostgresFileRepository::new(pg_config)
                .await
                .map_err(|e| ServerError::Config(format!("postgres repository: {e}")))?;
            Arc::new(repo)
        }
        other => {
            return Err(ServerError::Config(format!(
                "unsupported repository backend: {other}"
            )));
        }
    };

    info!(backend = %config.backend, "repository initialized");
    Ok(repository)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_backend() {
        assert!(create_repository(&RepositoryConfig::default()).await.is_ok());
    }

    #[tokio::test]
    async fn unknown_backend_is_rejected() {
        let config = RepositoryConfig {
            backend: "sqlite".into(),
            ..RepositoryConfig::default()
        };
        assert!(matches!(
            create_repository(&config).await,
            Err(ServerError::Config(_))
        ));
    }
}
