//! Typed API error for HTTP handlers.
//!
//! Converts store errors into the backend's error envelope,
//! `{"status": <code>, "data": {"message": "..."}}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use leadsync_core::ErrorEnvelope;

use crate::error::StoreError;

#[derive(Debug)]
pub enum ApiError {
    /// 400: malformed page parameters or body.
    BadRequest(String),
    /// 404: unknown resource namespace or record id.
    NotFound(String),
    /// 422: payload failed validation.
    UnprocessableEntity(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
        };
        (status, Json(ErrorEnvelope::new(status.as_u16(), message))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => Self::NotFound(err.to_string()),
            StoreError::Validation(msg) => Self::UnprocessableEntity(msg),
            StoreError::InvalidRequest(e) => Self::BadRequest(e.to_string()),
        }
    }
}
