use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Extension, Json,
};
use chess_core::notation::{parse_promotion, parse_square};
use chess_puzzler::{Direction, Outcome};
use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::catalog::SharedCatalog;
use crate::config::Config;
use crate::error::AppError;
use crate::store::{SessionId, SessionStore};

#[derive(Deserialize, Default)]
pub struct CreateSessionBody {
    pub puzzle_index: Option<usize>,
}

/// POST /api/sessions
pub async fn create_session(
    Extension(config): Extension<Config>,
    Extension(catalog): Extension<SharedCatalog>,
    Extension(store): Extension<SessionStore>,
    body: Option<Json<CreateSessionBody>>,
) -> Result<(StatusCode, Json<JsonValue>), AppError> {
    let index = body.and_then(|Json(b)| b.puzzle_index).unwrap_or(0);
    let catalog = catalog.read().await.catalog.clone();

    let (session_id, view) = store.create(catalog, config.controller_settings(), index)?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "session_id": session_id,
            "view": view,
        })),
    ))
}

/// GET /api/sessions/{id}
pub async fn get_session(
    Extension(store): Extension<SessionStore>,
    Path(id): Path<SessionId>,
) -> Result<Json<JsonValue>, AppError> {
    let view = store.read(id, |c| c.view())?;
    Ok(Json(serde_json::json!({ "session_id": id, "view": view })))
}

#[derive(Deserialize)]
pub struct MoveBody {
    pub from: String,
    pub to: String,
    pub promotion: Option<String>,
}

/// POST /api/sessions/{id}/move
/// A legal but wrong move answers 200 with outcome "incorrect".
pub async fn submit_move(
    Extension(store): Extension<SessionStore>,
    Path(id): Path<SessionId>,
    Json(body): Json<MoveBody>,
) -> Result<Json<JsonValue>, AppError> {
    let from = parse_square(&body.from)?;
    let to = parse_square(&body.to)?;
    let promotion = body
        .promotion
        .as_deref()
        .filter(|p| !p.trim().is_empty())
        .map(parse_promotion)
        .transpose()?;

    let (report, view) = store.command(id, |c| c.submit_move(from, to, promotion))?;

    Ok(Json(serde_json::json!({
        "outcome": report.outcome,
        "correct": report.outcome != Outcome::Incorrect,
        "played": report.played.to_string(),
        "fen": report.fen,
        "view": view,
    })))
}

/// POST /api/sessions/{id}/hint
pub async fn request_hint(
    Extension(store): Extension<SessionStore>,
    Path(id): Path<SessionId>,
) -> Result<Json<JsonValue>, AppError> {
    let hint = store
        .read(id, |c| c.request_hint())?
        .ok_or_else(|| AppError::Conflict("Puzzle already solved".to_string()))?;

    Ok(Json(serde_json::json!({
        "from": hint.from.to_string(),
        "to": hint.to.to_string(),
        "expires_in_ms": hint.expires_in.as_millis() as u64,
    })))
}

/// POST /api/sessions/{id}/reset
pub async fn reset_session(
    Extension(store): Extension<SessionStore>,
    Path(id): Path<SessionId>,
) -> Result<Json<JsonValue>, AppError> {
    let (_, view) = store.command(id, |c| Ok(c.reset()))?;
    Ok(Json(serde_json::json!({ "session_id": id, "view": view })))
}

#[derive(Deserialize, Default)]
pub struct NextBody {
    #[serde(default)]
    pub direction: Direction,
}

/// POST /api/sessions/{id}/next
pub async fn next_puzzle(
    Extension(store): Extension<SessionStore>,
    Path(id): Path<SessionId>,
    body: Option<Json<NextBody>>,
) -> Result<Json<JsonValue>, AppError> {
    let direction = body.map(|Json(b)| b.direction).unwrap_or_default();
    let (_, view) = store.command(id, |c| Ok(c.advance(direction)))?;
    Ok(Json(serde_json::json!({ "session_id": id, "view": view })))
}

#[derive(Deserialize)]
pub struct LegalMovesQuery {
    pub square: String,
}

/// GET /api/sessions/{id}/legal-moves?square=e2
pub async fn legal_moves(
    Extension(store): Extension<SessionStore>,
    Path(id): Path<SessionId>,
    Query(q): Query<LegalMovesQuery>,
) -> Result<Json<JsonValue>, AppError> {
    let square = parse_square(&q.square)?;
    let destinations: Vec<String> = store
        .read(id, |c| c.legal_destinations(square))?
        .into_iter()
        .map(|sq| sq.to_string())
        .collect();

    Ok(Json(serde_json::json!({
        "square": square.to_string(),
        "destinations": destinations,
    })))
}

/// DELETE /api/sessions/{id}
pub async fn delete_session(
    Extension(store): Extension<SessionStore>,
    Path(id): Path<SessionId>,
) -> Result<StatusCode, AppError> {
    if store.remove(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Session {id} not found")))
    }
}
