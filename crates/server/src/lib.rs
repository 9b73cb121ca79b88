pub mod catalog;
pub mod clients;
pub mod config;
pub mod error;
pub mod routes;
pub mod store;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use tokio::sync::RwLock;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};

use crate::catalog::CatalogState;
use crate::config::Config;
use crate::store::SessionStore;

/// Full API router with shared state attached.
pub fn build_router(config: Config, catalog: CatalogState) -> Router {
    let store = SessionStore::new(config.max_sessions);
    let catalog: catalog::SharedCatalog = Arc::new(RwLock::new(catalog));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health
        .route("/health", get(routes::health::health_check))
        // Catalog
        .route("/api/puzzles", get(routes::puzzles::list_puzzles))
        .route("/api/puzzles/refresh", post(routes::puzzles::refresh_puzzles))
        // Sessions
        .route("/api/sessions", post(routes::sessions::create_session))
        .route(
            "/api/sessions/{id}",
            get(routes::sessions::get_session).delete(routes::sessions::delete_session),
        )
        .route("/api/sessions/{id}/move", post(routes::sessions::submit_move))
        .route("/api/sessions/{id}/hint", post(routes::sessions::request_hint))
        .route("/api/sessions/{id}/reset", post(routes::sessions::reset_session))
        .route("/api/sessions/{id}/next", post(routes::sessions::next_puzzle))
        .route("/api/sessions/{id}/legal-moves", get(routes::sessions::legal_moves))
        // Shared state
        .layer(Extension(config))
        .layer(Extension(catalog))
        .layer(Extension(store))
        .layer(CompressionLayer::new())
        .layer(cors)
}
