use crate::error::DbError;
use crate::store::{PgQuoteStore, QuoteStore};
use core_types::{NewQuote, Quote, QuoteUpdate};
use sqlx::postgres::PgPool;
use std::sync::Arc;

/// The `QuoteRepository` provides the domain-level operations on quotes.
/// It owns no state of its own; every call goes back to the store.
#[derive(Debug, Clone)]
pub struct QuoteRepository {
    store: Arc<dyn QuoteStore>,
}

impl QuoteRepository {
    pub fn new(store: Arc<dyn QuoteStore>) -> Self {
        Self { store }
    }

    /// Creates a repository backed by PostgreSQL.
    pub fn postgres(pool: PgPool) -> Self {
        Self::new(Arc::new(PgQuoteStore::new(pool)))
    }

    /// Fetches every quote. An empty table yields an empty list.
    #[tracing::instrument(skip(self), err)]
    pub async fn list_all(&self) -> Result<Vec<Quote>, DbError> {
        self.store.select_all().await
    }

    #[tracing::instrument(skip(self), err)]
    pub async fn get_by_id(&self, id: i64) -> Result<Quote, DbError> {
        self.store.select_by_id(id).await?.ok_or(DbError::NotFound(id))
    }

    /// Picks one quote uniformly at random. Fails only when the table is empty.
    #[tracing::instrument(skip(self), err)]
    pub async fn get_random(&self) -> Result<Quote, DbError> {
        self.store.select_random().await?.ok_or(DbError::EmptyStore)
    }

    /// Inserts a new quote and returns its id. Both fields must be non-empty.
    #[tracing::instrument(skip(self, quote, person), err)]
    pub async fn create(
        &self,
        quote: impl Into<String>,
        person: impl Into<String>,
    ) -> Result<i64, DbError> {
        let new_quote = NewQuote::new(quote, person)?;
        let id = self.store.insert(&new_quote).await?;
        tracing::info!(id, "quote created");
        Ok(id)
    }

    /// Overwrites only the fields that were supplied as non-empty.
    ///
    /// With neither field supplied nothing is executed and the call succeeds.
    /// An id that matches no row also succeeds.
    #[tracing::instrument(skip(self, quote, person), err)]
    pub async fn partial_update(
        &self,
        id: i64,
        quote: Option<String>,
        person: Option<String>,
    ) -> Result<(), DbError> {
        self.apply_update(id, QuoteUpdate::from_fields(quote, person)).await
    }

    async fn apply_update(&self, id: i64, update: QuoteUpdate) -> Result<(), DbError> {
        if update.is_noop() {
            tracing::debug!("no fields supplied, skipping update");
            return Ok(());
        }
        let rows = self.store.update(id, &update).await?;
        tracing::debug!(rows, "quote updated");
        Ok(())
    }

    /// Deletes the quote if present. Deleting a missing id is not an error.
    #[tracing::instrument(skip(self), err)]
    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        let rows = self.store.delete(id).await?;
        tracing::debug!(rows, "quote deleted");
        Ok(())
    }
}
