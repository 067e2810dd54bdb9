use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FarmError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type FarmResult<T> = Result<T, FarmError>;

impl From<JsonRejection> for FarmError {
    fn from(rejection: JsonRejection) -> Self {
        FarmError::Validation(rejection.body_text())
    }
}

impl FarmError {
    fn is_unique_violation(&self) -> bool {
        match self {
            FarmError::Database(e) => e
                .as_database_error()
                .map(|db| db.is_unique_violation())
                .unwrap_or(false),
            _ => false,
        }
    }
}

impl IntoResponse for FarmError {
    fn into_response(self) -> Response {
        let (status, error_message) = if self.is_unique_violation() {
            (
                StatusCode::CONFLICT,
                "A record with the same unique value already exists.".to_string(),
            )
        } else {
            match self {
                FarmError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
                FarmError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
                FarmError::Database(ref e) => {
                    tracing::error!("Database Error: {:?}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "A database error occurred.".to_string(),
                    )
                }
                FarmError::Internal(msg) => {
                    tracing::error!("Internal Error: {}", msg);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "An internal server error occurred.".to_string(),
                    )
                }
                FarmError::Io(e) => {
                    tracing::error!("IO Error: {:?}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "A file system error occurred.".to_string(),
                    )
                }
                other => {
                    tracing::error!("Unhandled Error: {:?}", other);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "An unknown error occurred.".to_string(),
                    )
                }
            }
        };

        let body = Json(json!({
            "success": false,
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
