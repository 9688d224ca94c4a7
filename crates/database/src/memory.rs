use crate::error::DbError;
use crate::store::QuoteStore;
use async_trait::async_trait;
use rand::seq::SliceRandom;
use core_types::{NewQuote, Quote, QuoteUpdate};
use tokio::sync::Mutex;

/// An in-process store with the same observable behaviour as the PostgreSQL
/// table: ids start at 1, are never reused, and rows keep insertion order.
///
/// Nothing survives a restart. Used by `serve --in-memory` and the tests.
#[derive(Debug, Default)]
pub struct MemoryQuoteStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    last_id: i64,
    rows: Vec<Quote>,
}

impl MemoryQuoteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuoteStore for MemoryQuoteStore {
    async fn select_all(&self) -> Result<Vec<Quote>, DbError> {
        Ok(self.inner.lock().await.rows.clone())
    }

    async fn select_by_id(&self, id: i64) -> Result<Option<Quote>, DbError> {
        let inner = self.inner.lock().await;
        Ok(inner.rows.iter().find(|q| q.id == id).cloned())
    }

    async fn select_random(&self) -> Result<Option<Quote>, DbError> {
        let inner = self.inner.lock().await;
        Ok(inner.rows.choose(&mut rand::thread_rng()).cloned())
    }

    async fn insert(&self, quote: &NewQuote) -> Result<i64, DbError> {
        let mut inner = self.inner.lock().await;
        inner.last_id += 1;
        let id = inner.last_id;
        inner.rows.push(Quote {
            id,
            quote: quote.quote().to_string(),
            person: quote.person().to_string(),
        });
        Ok(id)
    }

    async fn update(&self, id: i64, update: &QuoteUpdate) -> Result<u64, DbError> {
        if update.is_noop() {
            return Ok(0);
        }
        let mut inner = self.inner.lock().await;
        match inner.rows.iter_mut().find(|q| q.id == id) {
            Some(row) => {
                update.apply_to(row);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: i64) -> Result<u64, DbError> {
        let mut inner = self.inner.lock().await;
        let before = inner.rows.len();
        inner.rows.retain(|q| q.id != id);
        Ok((before - inner.rows.len()) as u64)
    }
}
