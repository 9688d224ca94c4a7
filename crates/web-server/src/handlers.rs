use crate::{error::AppError, AppState};
use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use core_types::{QuoteList, QuotePayload, SlackQuoteResponse};
use std::sync::Arc;

/// The `:id` segment of `/quotes/:id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteId {
    Random,
    Id(i64),
}

impl QuoteId {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        if raw == "random" {
            return Ok(QuoteId::Random);
        }
        raw.parse()
            .map(QuoteId::Id)
            .map_err(|_| AppError::InvalidId(raw.to_string()))
    }
}

/// Parses a numeric id; `random` is only meaningful for reads.
fn numeric_id(raw: &str) -> Result<i64, AppError> {
    match QuoteId::parse(raw)? {
        QuoteId::Id(id) => Ok(id),
        QuoteId::Random => Err(AppError::InvalidId(raw.to_string())),
    }
}

/// Decodes the first JSON value in the body, regardless of `Content-Type`.
///
/// Anything after that value is ignored and a top-level `null` reads as an
/// empty payload. An empty body is an error.
fn decode_payload(body: &Bytes) -> Result<QuotePayload, AppError> {
    let mut values =
        serde_json::Deserializer::from_slice(body).into_iter::<Option<QuotePayload>>();
    match values.next() {
        Some(value) => Ok(value?.unwrap_or_default()),
        None => Err(AppError::Body("request body is empty".to_string())),
    }
}

/// # GET /quotes
pub async fn list_quotes(
    State(state): State<Arc<AppState>>,
) -> Result<Json<QuoteList>, AppError> {
    let quotes = state.repo.list_all().await?;
    Ok(Json(QuoteList { quotes }))
}

/// # GET /quotes/:id
/// Responds with the quote text only. `random` picks any stored quote.
pub async fn get_quote(
    State(state): State<Arc<AppState>>,
    id: Result<Path<String>, PathRejection>,
) -> Result<String, AppError> {
    let Path(id) = id?;
    let quote = match QuoteId::parse(&id)? {
        QuoteId::Random => state.repo.get_random().await?,
        QuoteId::Id(id) => state.repo.get_by_id(id).await?,
    };
    Ok(quote.quote)
}

/// # POST /quotes
/// Responds with the new id as plain text.
pub async fn create_quote(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<String, AppError> {
    let payload = decode_payload(&body?)?;
    let id = state
        .repo
        .create(payload.quote.unwrap_or_default(), payload.person.unwrap_or_default())
        .await?;
    Ok(id.to_string())
}

/// # POST /quotes/:id
pub async fn update_quote(
    State(state): State<Arc<AppState>>,
    id: Result<Path<String>, PathRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = id?;
    let id = numeric_id(&id)?;
    let payload = decode_payload(&body?)?;
    state.repo.partial_update(id, payload.quote, payload.person).await?;
    Ok(StatusCode::OK)
}

/// # DELETE /quotes/:id
pub async fn delete_quote(
    State(state): State<Arc<AppState>>,
    id: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = id?;
    let id = numeric_id(&id)?;
    state.repo.delete(id).await?;
    Ok(StatusCode::OK)
}

/// # POST /slack/quote
/// The slash-command webhook. The request body is ignored.
pub async fn slack_quote(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SlackQuoteResponse>, AppError> {
    let quote = state.repo.get_random().await?;
    Ok(Json(SlackQuoteResponse::from_quote(&quote)))
}
