//! Application error type mapping the domain taxonomy to HTTP status codes.
//!
//! This is the single translation step between `ChatError` variants and
//! response statuses. Internal failures are logged with full detail here
//! and surfaced to the client only as a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use plaza_types::error::ChatError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub struct AppError(pub ChatError);

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError(e)
    }
}

impl AppError {
    /// Shorthand for a 422 validation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        AppError(ChatError::Validation(message.into()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self.0 {
            ChatError::Validation(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR", msg.clone())
            }
            ChatError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            ChatError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            ChatError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
            }
            ChatError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "internal error".to_string(),
                )
            }
        };

        let body = json!({
            "error": {
                "code": code,
                "message": message,
            }
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
