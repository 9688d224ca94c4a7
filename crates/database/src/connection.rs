use crate::error::DbError;
use configuration::DatabaseSettings;
use sqlx::{postgres::PgPoolOptions, PgPool};

/// DDL for the single table the service owns.
pub const CREATE_QUOTES_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS quotes (
        id BIGSERIAL PRIMARY KEY,
        quote TEXT NOT NULL,
        person TEXT NOT NULL
    )
"#;

/// Establishes a connection pool to the PostgreSQL database.
///
/// The pool is created eagerly, so an unreachable database is reported here
/// rather than on the first request.
pub async fn connect(settings: &DatabaseSettings) -> Result<PgPool, DbError> {
    let database_url = settings.url()?;

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout())
        .connect(database_url)
        .await?;

    tracing::info!(max_connections = settings.max_connections, "Connected to the database.");
    Ok(pool)
}

/// Creates the `quotes` table if it does not already exist. Safe to run on every start.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), DbError> {
    sqlx::query(CREATE_QUOTES_TABLE).execute(pool).await?;
    tracing::info!("Quotes table is ready.");
    Ok(())
}
