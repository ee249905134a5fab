//! Application error type mapping to HTTP status codes.
//!
//! Internal error detail is logged, never leaked: every failure body is the
//! generic `{"success": false, "message": "..."}` shape.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use parley_types::error::{CheckpointError, SessionError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Session facade failure (checkpoint or agent).
    Session(SessionError),
    /// Request validation failure.
    Validation(String),
    /// Webhook verification failure.
    Forbidden(String),
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        AppError::Session(e)
    }
}

impl From<CheckpointError> for AppError {
    fn from(e: CheckpointError) -> Self {
        AppError::Session(SessionError::Checkpoint(e))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::Session(SessionError::Agent(err)) => {
                tracing::error!(error = %err, "agent runtime failure");
                (
                    StatusCode::BAD_GATEWAY,
                    "The assistant is unavailable right now. Please try again.".to_string(),
                )
            }
            AppError::Session(SessionError::Checkpoint(err)) => {
                tracing::error!(error = %err, "checkpoint store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error processing the request. Please try again.".to_string(),
                )
            }
        };

        let body = json!({
            "success": false,
            "message": message,
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
