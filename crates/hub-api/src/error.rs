//! # API Errors
//!
//! Maps `HubError` onto HTTP responses with a `{ error, code }` body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use hub_core::HubError;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
        }
    }
}

/// Handler error; every `HubError` converts with `?`
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub HubError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        } else {
            warn!("Request rejected: {}", self.0);
        }

        let body = ErrorResponse::new(self.0.to_string(), status.as_u16());
        (status, Json(body)).into_response()
    }
}

/// Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;
