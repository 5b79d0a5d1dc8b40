//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use carrier_store::CarrierStoreError;
use quoting::{QuotingError, ValidationError};
use serde_json::json;

/// API-level error type that maps to HTTP responses.
///
/// Every error body has a single `message` key, which holds a map of field
/// name to help text for field validation failures and a string otherwise.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Quote request failed validation.
    Validation(ValidationError),
    /// Carrier directory error.
    Store(CarrierStoreError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, json!(msg)),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!(msg)),
            ApiError::Validation(ValidationError::InvalidFields(fields)) => {
                (StatusCode::BAD_REQUEST, json!(fields))
            }
            ApiError::Validation(ValidationError::Rejected(msg)) => {
                (StatusCode::BAD_REQUEST, json!(msg))
            }
            ApiError::Store(err) => {
                tracing::error!(error = %err, "carrier directory error");
                (StatusCode::INTERNAL_SERVER_ERROR, json!(err.to_string()))
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, json!(msg))
            }
        };

        let body = json!({ "message": message });
        (status, axum::Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err)
    }
}

impl From<CarrierStoreError> for ApiError {
    fn from(err: CarrierStoreError) -> Self {
        ApiError::Store(err)
    }
}

impl From<QuotingError> for ApiError {
    fn from(err: QuotingError) -> Self {
        match err {
            QuotingError::Store(store_err) => ApiError::Store(store_err),
        }
    }
}
