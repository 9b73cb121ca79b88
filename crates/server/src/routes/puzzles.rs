use axum::{Extension, Json};
use serde_json::Value as JsonValue;

use crate::catalog::{load_catalog, CatalogState, SharedCatalog};
use crate::config::Config;
use crate::error::AppError;

fn catalog_json(state: &CatalogState) -> JsonValue {
    let puzzles = state.catalog.summaries();
    serde_json::json!({
        "puzzles": puzzles,
        "total": puzzles.len(),
        "daily_puzzle_id": state.daily_puzzle_id,
        "refreshed_at": state.refreshed_at.to_rfc3339(),
    })
}

/// GET /api/puzzles
pub async fn list_puzzles(
    Extension(catalog): Extension<SharedCatalog>,
) -> Result<Json<JsonValue>, AppError> {
    let state = catalog.read().await;
    Ok(Json(catalog_json(&state)))
}

/// POST /api/puzzles/refresh
/// Re-fetch the daily puzzle. Sessions already running keep their catalog.
pub async fn refresh_puzzles(
    Extension(config): Extension<Config>,
    Extension(catalog): Extension<SharedCatalog>,
) -> Result<Json<JsonValue>, AppError> {
    let fresh = load_catalog(&config).await?;
    let mut state = catalog.write().await;
    *state = fresh;
    Ok(Json(catalog_json(&state)))
}
