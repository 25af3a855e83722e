// ABOUTME: Error type for the HTTP surface and its JSON response mapping.
// ABOUTME: Validation problems answer 400, anything unexpected answers 500, both as {"error": message}.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use digests_harvest::HarvestError;

/// Application error type.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or invalid request fields.
    #[error("{0}")]
    BadRequest(String),

    /// Unexpected failure while handling an otherwise valid request.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<HarvestError> for ApiError {
    fn from(err: HarvestError) -> Self {
        if err.is_validation() || err.is_invalid_url() {
            Self::BadRequest(err.message())
        } else {
            Self::Internal(err.message())
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
