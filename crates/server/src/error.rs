use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chess_core::BoardError;
use chess_puzzler::{CatalogError, PuzzleError, Rejection};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl From<PuzzleError> for AppError {
    fn from(e: PuzzleError) -> Self {
        match &e {
            PuzzleError::IllegalMove {
                reason: Rejection::Rules,
                ..
            } => AppError::BadRequest(e.to_string()),
            PuzzleError::IllegalMove { .. } => AppError::Conflict(e.to_string()),
            PuzzleError::OutOfRange { .. } => AppError::NotFound(e.to_string()),
        }
    }
}

impl From<BoardError> for AppError {
    fn from(e: BoardError) -> Self {
        AppError::BadRequest(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Catalog(e) => {
                tracing::error!("Catalog error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Puzzle catalog unavailable".to_string())
            }
        };

        (status, Json(json!({ "detail": message }))).into_response()
    }
}
