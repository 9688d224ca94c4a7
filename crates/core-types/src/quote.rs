use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A single attributed quotation, as persisted in the `quotes` table.
///
/// `id` is assigned by storage on insert and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Quote {
    pub id: i64,
    pub quote: String,
    pub person: String,
}

/// The response body of `GET /quotes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteList {
    pub quotes: Vec<Quote>,
}

/// The JSON body accepted by the create and partial-update endpoints.
///
/// Both fields are optional on the wire; an absent field, `null`, and `""`
/// are all treated the same way. Any `id` in the body is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct QuotePayload {
    #[serde(default)]
    pub quote: Option<String>,
    #[serde(default)]
    pub person: Option<String>,
}

/// A quote that has passed validation and is ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuote {
    quote: String,
    person: String,
}

impl NewQuote {
    pub fn new(quote: impl Into<String>, person: impl Into<String>) -> Result<Self, CoreError> {
        let quote = quote.into();
        let person = person.into();
        if quote.is_empty() {
            return Err(CoreError::empty("quote"));
        }
        if person.is_empty() {
            return Err(CoreError::empty("person"));
        }
        Ok(Self { quote, person })
    }

    pub fn quote(&self) -> &str {
        &self.quote
    }

    pub fn person(&self) -> &str {
        &self.person
    }
}

/// The set of columns a partial update writes.
///
/// `Neither` is a valid update: it executes no statement and succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteUpdate {
    Both { quote: String, person: String },
    PersonOnly(String),
    QuoteOnly(String),
    Neither,
}

impl QuoteUpdate {
    /// Builds an update from the supplied fields. Empty strings count as absent.
    pub fn from_fields(quote: Option<String>, person: Option<String>) -> Self {
        let quote = quote.filter(|q| !q.is_empty());
        let person = person.filter(|p| !p.is_empty());
        match (quote, person) {
            (Some(quote), Some(person)) => QuoteUpdate::Both { quote, person },
            (None, Some(person)) => QuoteUpdate::PersonOnly(person),
            (Some(quote), None) => QuoteUpdate::QuoteOnly(quote),
            (None, None) => QuoteUpdate::Neither,
        }
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, QuoteUpdate::Neither)
    }

    /// Applies the update to an in-memory quote. The id is never touched.
    pub fn apply_to(&self, target: &mut Quote) {
        match self {
            QuoteUpdate::Both { quote, person } => {
                target.quote = quote.clone();
                target.person = person.clone();
            }
            QuoteUpdate::PersonOnly(person) => target.person = person.clone(),
            QuoteUpdate::QuoteOnly(quote) => target.quote = quote.clone(),
            QuoteUpdate::Neither => {}
        }
    }
}
