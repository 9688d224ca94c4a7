use configuration::error::ConfigError;
use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Failed to load settings for database connection: {0}")]
    ConnectionConfigError(#[from] ConfigError),

    #[error("Database query failed: {0}")]
    QueryError(#[from] sqlx::Error),

    #[error("Rejected quote: {0}")]
    Validation(#[from] CoreError),

    #[error("No quote with id {0} was found in the database.")]
    NotFound(i64),

    #[error("The database holds no quotes.")]
    EmptyStore,
}
