//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use botique_types::chat::ChatError;
use botique_types::error::BotError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Bot-related errors.
    Bot(BotError),
    /// Chat pipeline errors from a send attempt.
    Chat(ChatError),
    /// Authentication failure.
    Unauthorized(String),
    /// Validation error.
    Validation(String),
    /// Resource not found.
    NotFound(String),
    /// Generic internal error.
    Internal(String),
}

impl From<BotError> for AppError {
    fn from(e: BotError) -> Self {
        AppError::Bot(e)
    }
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Bot(BotError::NotFound) => {
                (StatusCode::NOT_FOUND, "BOT_NOT_FOUND", "Bot not found".to_string())
            }
            AppError::Bot(BotError::InvalidName(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Bot(BotError::NotCreator) => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                "Only the bot's creator may do this".to_string(),
            ),
            AppError::Bot(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "BOT_ERROR", e.to_string())
            }
            AppError::Chat(ChatError::EmptyInput) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                "Message is empty".to_string(),
            ),
            AppError::Chat(ChatError::AccessDenied) => (
                StatusCode::FORBIDDEN,
                "SUBSCRIPTION_REQUIRED",
                "You need to subscribe to chat with this bot".to_string(),
            ),
            AppError::Chat(ChatError::SendInFlight) => (
                StatusCode::CONFLICT,
                "SEND_IN_FLIGHT",
                "A send is already in flight for this session".to_string(),
            ),
            AppError::Chat(e @ ChatError::Generation(_)) => {
                (StatusCode::BAD_GATEWAY, "GENERATION_FAILED", e.to_string())
            }
            AppError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
            }
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg.clone())
            }
        };

        let body = json!({
            "data": null,
            "meta": {
                "request_id": "",
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "response_time_ms": 0
            },
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
