use sqlx::PgPool;

use crate::config::PostgresRepositoryConfig;

/// Run database migrations, creating the files table if it does not exist.
///
/// # Errors
///
/// Returns a [`sqlx::Error`] if any DDL statement fails.
pub async fn run_migrations(
    pool: &PgPool,
    config: &PostgresRepositoryConfig,
) -> Result<(), sqlx::Error> {
    let files_table = config.files_table();

    let create_files = format!(
        "CREATE TABLE IF NOT EXISTS {files_table} (
            id UUID PRIMARY KEY,
            storage_key TEXT NOT NULL,
            content_type TEXT NOT NULL,
            size_bytes BIGINT NOT NULL CHECK (size_bytes >= 0),
            owner_id TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )"
    );

    let create_owner_idx = format!(
        "CREATE INDEX IF NOT EXISTS {}files_owner_idx ON {files_table} (owner_id)",
        config.table_prefix
    );

    sqlx::query(&create_files).execute(pool).await?;
    sqlx::query(&create_owner_idx).execute(pool).await?;

    Ok(())
}
