// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // 404 Not Found
    #[error("{0}")]
    NotFound(String),

    // 400 Bad Request: malformed or invalid payloads
    #[error("{0}")]
    BadRequest(String),

    // 400 Bad Request: answer references a question outside the test
    #[error("answer references unknown question {question_id}")]
    UnknownQuestion { question_id: i64 },

    // 400 Bad Request: two answers name the same question
    #[error("duplicate answer for question {question_id}")]
    DuplicateAnswer { question_id: i64 },

    // 400 Bad Request: selected label not offered by the question
    #[error("option {option:?} is not valid for question {question_id}")]
    UnknownOption { question_id: i64, option: String },

    // 409 Conflict: the (user, test) slot is already taken
    #[error("a result for this test has already been submitted")]
    AlreadySubmitted,

    // 500: catalog row carries a kind the scoring engine does not know
    #[error("unknown question kind {kind:?}")]
    UnknownQuestionKind { kind: String },

    // 401 Unauthorized
    #[error("{0}")]
    Auth(String),

    // 503 Service Unavailable: transient store failure, safe to retry
    #[error("storage failure: {0}")]
    Storage(#[from] sqlx::Error),

    // 500 Internal Server Error
    #[error("{0}")]
    Internal(String),
}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            e @ (AppError::UnknownQuestion { .. }
            | AppError::DuplicateAnswer { .. }
            | AppError::UnknownOption { .. }) => (StatusCode::BAD_REQUEST, e.to_string()),
            e @ AppError::AlreadySubmitted => (StatusCode::CONFLICT, e.to_string()),
            e @ AppError::UnknownQuestionKind { .. } => {
                tracing::error!("Corrupt question catalog: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            AppError::Auth(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Storage(err) => {
                tracing::error!("Storage error: {:?}", err);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Storage temporarily unavailable, please retry".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };
        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
