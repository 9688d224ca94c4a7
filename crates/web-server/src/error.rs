use axum::{
    extract::rejection::{BytesRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use database::DbError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),
    #[error("Malformed request body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Invalid quote id: {0:?}")]
    InvalidId(String),
    #[error("Failed to read request body: {0}")]
    Body(String),
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::InvalidId(rejection.body_text())
    }
}

impl From<BytesRejection> for AppError {
    fn from(rejection: BytesRejection) -> Self {
        AppError::Body(rejection.body_text())
    }
}

/// The category of a failed request. Attached to every error response so
/// the optional detailed mapping can recover it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    EmptyStore,
    Storage,
    Decode,
    InvalidId,
}

impl ErrorKind {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorKind::Validation | ErrorKind::Decode | ErrorKind::InvalidId => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound | ErrorKind::EmptyStore => StatusCode::NOT_FOUND,
            ErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation_error",
            ErrorKind::NotFound => "not_found",
            ErrorKind::EmptyStore => "empty_store",
            ErrorKind::Storage => "storage_error",
            ErrorKind::Decode => "decode_error",
            ErrorKind::InvalidId => "invalid_id",
        }
    }
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Database(DbError::Validation(_)) => ErrorKind::Validation,
            AppError::Database(DbError::NotFound(_)) => ErrorKind::NotFound,
            AppError::Database(DbError::EmptyStore) => ErrorKind::EmptyStore,
            AppError::Database(_) => ErrorKind::Storage,
            AppError::Decode(_) | AppError::Body(_) => ErrorKind::Decode,
            AppError::InvalidId(_) => ErrorKind::InvalidId,
        }
    }
}

/// Converts our custom `AppError` into an HTTP response.
///
/// Every failure is a bare 500 with an empty body; the cause only goes to the log.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        tracing::error!(error = %self, kind = kind.label(), "Request failed.");

        let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
        response.extensions_mut().insert(kind);
        response
    }
}

/// Response middleware installed when `server.detailed_errors` is on.
/// Rewrites flat error responses into a per-kind status with a JSON body.
pub async fn detailed_error_mapping(response: Response) -> Response {
    let Some(kind) = response.extensions().get::<ErrorKind>().copied() else {
        return response;
    };
    let body = Json(json!({ "error": kind.label() }));
    (kind.status(), body).into_response()
}
