//! HTTP error mapping for API handlers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use qrpaste_core::{AppError, ValidationError};
use serde_json::json;

/// Wrapper rendering [`AppError`] as the JSON error envelope.
pub struct HttpError(pub AppError);

impl From<AppError> for HttpError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for HttpError {
    fn from(err: ValidationError) -> Self {
        Self(AppError::Validation(err))
    }
}

impl HttpError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            AppError::Validation(err) => match err {
                ValidationError::ContentTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
                _ => StatusCode::BAD_REQUEST,
            },
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Expired => StatusCode::GONE,
            AppError::IdCollision(_)
            | AppError::IdSpaceExhausted(_)
            | AppError::PasswordHash
            | AppError::Database(_)
            | AppError::Serialization(_)
            | AppError::StorageMessage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message) = if self.0.is_client_safe() {
            (self.0.code(), self.0.to_string())
        } else {
            // Detail stays server-side; clients get a generic body.
            tracing::error!("Request failed: {}", self.0);
            (
                self.0.code(),
                "An error occurred. Please try again later.".to_string(),
            )
        };
        let body = json!({
            "success": false,
            "error": message,
            "code": code,
        });
        (status, Json(body)).into_response()
    }
}
