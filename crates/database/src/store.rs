use crate::error::DbError;
use async_trait::async_trait;
use core_types::{NewQuote, Quote, QuoteUpdate};
use sqlx::postgres::PgPool;

/// Statement-level access to the quote table.
///
/// Implementations surface engine errors unchanged. Updates and deletes
/// report the number of rows affected; zero is not an error.
#[async_trait]
pub trait QuoteStore: Send + Sync + std::fmt::Debug {
    async fn select_all(&self) -> Result<Vec<Quote>, DbError>;

    /// `Ok(None)` means no row matched, as opposed to a failed query.
    async fn select_by_id(&self, id: i64) -> Result<Option<Quote>, DbError>;

    /// Picks one row uniformly at random in a single statement.
    /// `Ok(None)` means the table is empty.
    async fn select_random(&self) -> Result<Option<Quote>, DbError>;

    /// Inserts a row and returns the id storage assigned to it.
    async fn insert(&self, quote: &NewQuote) -> Result<i64, DbError>;

    async fn update(&self, id: i64, update: &QuoteUpdate) -> Result<u64, DbError>;

    async fn delete(&self, id: i64) -> Result<u64, DbError>;
}

/// The PostgreSQL-backed store used in production.
#[derive(Debug, Clone)]
pub struct PgQuoteStore {
    pool: PgPool,
}

impl PgQuoteStore {
    /// Creates a new `PgQuoteStore` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Picks the UPDATE statement for `update` along with its values, in bind order.
/// The row id is always the last placeholder. `Neither` has no statement.
pub(crate) fn update_statement(update: &QuoteUpdate) -> Option<(&'static str, Vec<&str>)> {
    match update {
        QuoteUpdate::Both { quote, person } => Some((
            "UPDATE quotes SET quote = $1, person = $2 WHERE id = $3",
            vec![quote.as_str(), person.as_str()],
        )),
        QuoteUpdate::PersonOnly(person) => Some((
            "UPDATE quotes SET person = $1 WHERE id = $2",
            vec![person.as_str()],
        )),
        QuoteUpdate::QuoteOnly(quote) => Some((
            "UPDATE quotes SET quote = $1 WHERE id = $2",
            vec![quote.as_str()],
        )),
        QuoteUpdate::Neither => None,
    }
}

#[async_trait]
impl QuoteStore for PgQuoteStore {
    async fn select_all(&self) -> Result<Vec<Quote>, DbError> {
        let quotes = sqlx::query_as::<_, Quote>("SELECT id, quote, person FROM quotes ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(quotes)
    }

    async fn select_by_id(&self, id: i64) -> Result<Option<Quote>, DbError> {
        let quote = sqlx::query_as::<_, Quote>(
            "SELECT id, quote, person FROM quotes WHERE id = $1 LIMIT 1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(quote)
    }

    async fn select_random(&self) -> Result<Option<Quote>, DbError> {
        let quote = sqlx::query_as::<_, Quote>(
            "SELECT id, quote, person FROM quotes ORDER BY RANDOM() LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(quote)
    }

    async fn insert(&self, quote: &NewQuote) -> Result<i64, DbError> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO quotes (quote, person) VALUES ($1, $2) RETURNING id",
        )
        .bind(quote.quote())
        .bind(quote.person())
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn update(&self, id: i64, update: &QuoteUpdate) -> Result<u64, DbError> {
        let Some((sql, values)) = update_statement(update) else {
            return Ok(0);
        };

        let mut query = sqlx::query(sql);
        for value in values {
            query = query.bind(value);
        }
        let result = query.bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, id: i64) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM quotes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
