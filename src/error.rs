//! Error taxonomy of the translation service and its HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Missing language or translation record
    #[error("{0}")]
    NotFound(String),

    /// Language code already exists
    #[error("{0}")]
    Conflict(String),

    /// Malformed request body or query
    #[error("{0}")]
    BadRequest(String),

    /// Known path, unsupported method
    #[error("{0}")]
    MethodNotAllowed(String),

    /// Store failure, carries the store's raw message
    #[error("{0}")]
    Internal(String),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            // Duplicate languages are reported as a plain 400
            ApiError::Conflict(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Store failures; the client sees the outermost message only
impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        error!("Store error: {:#}", err);
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
