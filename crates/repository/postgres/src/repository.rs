use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::debug;
use uuid::Uuid;

use filehub_core::{FileId, NewFile, OwnerId, StoredFile};
use filehub_repository::{FileRepository, RepositoryError};

use crate::config::PostgresRepositoryConfig;
use crate::migrations;

/// Build `PgConnectOptions` from a [`PostgresRepositoryConfig`], applying
/// SSL settings when configured.
fn build_connect_options(
    config: &PostgresRepositoryConfig,
) -> Result<sqlx::postgres::PgConnectOptions, RepositoryError> {
    let mut options: sqlx::postgres::PgConnectOptions = config
        .url
        .parse()
        .map_err(|e: sqlx::Error| RepositoryError::Connection(e.to_string()))?;

    if let Some(ref mode) = config.ssl_mode {
        let ssl_mode = match mode.as_str() {
            "disable" => sqlx::postgres::PgSslMode::Disable,
            "prefer" => sqlx::postgres::PgSslMode::Prefer,
            "require" => sqlx::postgres::PgSslMode::Require,
            "verify-ca" => sqlx::postgres::PgSslMode::VerifyCa,
            "verify-full" => sqlx::postgres::PgSslMode::VerifyFull,
            other => {
                return Err(RepositoryError::Connection(format!(
                    "unknown ssl_mode: {other}"
                )));
            }
        };
        options = options.ssl_mode(ssl_mode);
    }

    if let Some(ref path) = config.ssl_root_cert {
        options = options.ssl_root_cert(path);
    }

    Ok(options)
}

/// Map a `sqlx` error onto the repository taxonomy.
fn classify(err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::Database(db)
            if db.is_unique_violation()
                || db.is_check_violation()
                || db.is_foreign_key_violation() =>
        {
            RepositoryError::Constraint(db.to_string())
        }
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed => RepositoryError::Connection(err.to_string()),
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            RepositoryError::Serialization(err.to_string())
        }
        other => RepositoryError::Backend(other.to_string()),
    }
}

/// PostgreSQL-backed implementation of [`FileRepository`].
///
/// Uses `sqlx::PgPool` for connection pooling. Each `save` is a single
/// `INSERT`, so a row is either fully written or absent.
pub struct PostgresFileRepository {
    pool: PgPool,
    config: Arc<PostgresRepositoryConfig>,
}

impl PostgresFileRepository {
    /// Create a new `PostgresFileRepository` from the provided configuration.
    ///
    /// Connects to `PostgreSQL`, creates the connection pool, and runs
    /// migrations to ensure the files table exists.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Connection`] if pool creation fails, or
    /// [`RepositoryError::Backend`] if migrations fail.
    pub async fn new(config: PostgresRepositoryConfig) -> Result<Self, RepositoryError> {
        let connect_options = build_connect_options(&config)?;
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.pool_size)
            .connect_with(connect_options)
            .await
            .map_err(|e| RepositoryError::Connection(e.to_string()))?;

        Self::from_pool(pool, config).await
    }

    /// Create a `PostgresFileRepository` from an existing pool and config.
    ///
    /// Runs migrations on creation.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Backend`] if migrations fail.
    pub async fn from_pool(
        pool: PgPool,
        config: PostgresRepositoryConfig,
    ) -> Result<Self, RepositoryError> {
        migrations::run_migrations(&pool, &config)
            .await
            .map_err(|e| RepositoryError::Backend(e.to_string()))?;

        Ok(Self {
            pool,
            config: Arc::new(config),
        })
    }

    /// Close the connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl FileRepository for PostgresFileRepository {
    async fn save(&self, file: &NewFile) -> Result<FileId, RepositoryError> {
        let id = file.id.unwrap_or_default();
        let size = i64::try_from(file.size_bytes).map_err(|_| {
            RepositoryError::Constraint(format!("size out of range: {}", file.size_bytes))
        })?;
        let table = self.config.files_table();

        let query = format!(
            "INSERT INTO {table} (id, storage_key, content_type, size_bytes, owner_id, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)"
        );
        sqlx::query(&query)
            .bind(id.as_uuid())
            .bind(&file.storage_key)
            .bind(&file.content_type)
            .bind(size)
            .bind(file.owner_id.as_ref().map(OwnerId::as_str))
            .bind(file.created_at)
            .execute(&self.pool)
            .await
            .map_err(classify)?;

        debug!(file_id = %id, "file row inserted");
        Ok(id)
    }

    async fn find_by_id(&self, id: &FileId) -> Result<Option<StoredFile>, RepositoryError> {
        let table = self.config.files_table();
        let query = format!(
            "SELECT id, storage_key, content_type, size_bytes, owner_id, created_at \
             FROM {table} WHERE id = $1"
        );

        let row = sqlx::query(&query)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let size: i64 = row.try_get("size_bytes").map_err(classify)?;
        let owner: Option<String> = row.try_get("owner_id").map_err(classify)?;
        let created_at: DateTime<Utc> = row.try_get("created_at").map_err(classify)?;
        let raw_id: Uuid = row.try_get("id").map_err(classify)?;

        Ok(Some(StoredFile {
            id: FileId::from_uuid(raw_id),
            storage_key: row.try_get("storage_key").map_err(classify)?,
            content_type: row.try_get("content_type").map_err(classify)?,
            size_bytes: u64::try_from(size)
                .map_err(|_| RepositoryError::Serialization(format!("negative size: {size}")))?,
            owner_id: owner.map(OwnerId::from),
            created_at,
        }))
    }
}
