use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use payloads::{ErrorBody, ErrorKind, InvalidVoteType, ItemId};
use thiserror::Error;
use tracing::error;

use crate::auth::AuthError;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Corrupt bookmark entry: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Corrupt vote entry: {0}")]
    InvalidVote(#[from] InvalidVoteType),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error(transparent)]
    Validation(#[from] InvalidVoteType),

    #[error("Bookmark {0} not found")]
    NotFound(ItemId),

    #[error(transparent)]
    Unauthenticated(#[from] AuthError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::MalformedPayload(_) | AppError::Validation(_) => ErrorKind::Validation,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::Unauthenticated(_) => ErrorKind::Unauthenticated,
            AppError::Storage(_) => ErrorKind::Internal,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Storage details stay in the logs.
        let message = match &self {
            AppError::Storage(e) => {
                error!("Request failed: {e}");
                "Internal error".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorBody {
            kind: self.kind(),
            message,
        };

        (status, Json(body)).into_response()
    }
}
