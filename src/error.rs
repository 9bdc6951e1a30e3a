use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

pub type AppResult<T> = std::result::Result<T, AppError>;

/// Generic message for unexpected failures.
pub const INTERNAL_MESSAGE: &str = "Something went wrong!";

/// Errors raised by the persistence layer.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("record already exists")]
    Conflict,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed")]
    Validation(Vec<String>),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(&'static str),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(vec![message.into()])
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        AppError::Internal(err.into())
    }
}

/// Underlying cause of a 500, attached to the response so the outer layer can
/// decide whether to reveal it.
#[derive(Debug, Clone)]
pub struct ErrorDetail(pub String);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "success": false,
                    "message": "Validation failed",
                    "errors": errors,
                })),
            )
                .into_response(),
            AppError::BadRequest(message) => failure(StatusCode::BAD_REQUEST, &message),
            AppError::Unauthorized(message) => failure(StatusCode::UNAUTHORIZED, message),
            AppError::NotFound(message) => failure(StatusCode::NOT_FOUND, message),
            AppError::Conflict(message) => failure(StatusCode::CONFLICT, message),
            AppError::Internal(e) => {
                error!(error = %e, "internal error");
                let mut res = failure(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE);
                res.extensions_mut().insert(ErrorDetail(format!("{e:#}")));
                res
            }
        }
    }
}

fn failure(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "success": false, "message": message }))).into_response()
}
