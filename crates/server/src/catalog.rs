//! Catalog assembly for the service: static list plus today's Lichess puzzle.

use std::sync::Arc;

use chess_core::Puzzle;
use chess_puzzler::{Catalog, CatalogError};
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::clients::lichess::LichessClient;
use crate::config::Config;

pub type SharedCatalog = Arc<RwLock<CatalogState>>;

#[derive(Debug, Clone)]
pub struct CatalogState {
    pub catalog: Catalog,
    pub daily_puzzle_id: Option<String>,
    pub refreshed_at: DateTime<Utc>,
}

/// Build the catalog. Any failure on the way (missing file, Lichess down,
/// unplayable daily) degrades to the built-in list.
pub async fn load_catalog(config: &Config) -> Result<CatalogState, CatalogError> {
    let base = base_puzzles(config)?;

    let daily = if config.fetch_daily_puzzle {
        fetch_daily(config).await
    } else {
        None
    };

    let daily_id = daily.as_ref().map(|p| p.id.clone());
    let catalog = match Catalog::with_daily(daily, base) {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::warn!("Configured puzzles unusable ({e}), using built-in list");
            Catalog::fallback()?
        }
    };

    // The daily puzzle is only first if it survived validation.
    let daily_puzzle_id = daily_id.filter(|id| catalog.position(id) == Some(0));

    tracing::info!(puzzles = catalog.len(), daily = ?daily_puzzle_id, "Puzzle catalog ready");

    Ok(CatalogState {
        catalog,
        daily_puzzle_id,
        refreshed_at: Utc::now(),
    })
}

fn base_puzzles(config: &Config) -> Result<Vec<Puzzle>, CatalogError> {
    if let Some(path) = &config.puzzle_catalog_path {
        match Catalog::load_puzzles_file(path) {
            Ok(puzzles) => return Ok(puzzles),
            Err(e) => tracing::warn!("Failed to load {path}: {e}; using built-in puzzles"),
        }
    }
    Catalog::fallback_puzzles()
}

async fn fetch_daily(config: &Config) -> Option<Puzzle> {
    let client = match LichessClient::new(config.lichess_daily_url.clone()) {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!("Lichess client unavailable: {e}");
            return None;
        }
    };

    match client.fetch_daily_puzzle().await {
        Ok(puzzle) => Some(puzzle),
        Err(e) => {
            tracing::warn!("Couldn't fetch daily puzzle, using local puzzles: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_offline_catalog_is_builtin() {
        let config = Config {
            fetch_daily_puzzle: false,
            ..Config::default()
        };
        let state = load_catalog(&config).await.unwrap();
        assert_eq!(state.catalog.len(), Catalog::fallback().unwrap().len());
        assert_eq!(state.daily_puzzle_id, None);
    }

    #[tokio::test]
    async fn test_missing_catalog_file_falls_back() {
        let config = Config {
            fetch_daily_puzzle: false,
            puzzle_catalog_path: Some("/nonexistent/puzzles.json".to_string()),
            ..Config::default()
        };
        let state = load_catalog(&config).await.unwrap();
        assert_eq!(state.catalog.get(0).unwrap().id, "00008");
    }

    #[tokio::test]
    async fn test_unreachable_lichess_falls_back() {
        let config = Config {
            lichess_daily_url: "http://127.0.0.1:9/api/puzzle/daily".to_string(),
            ..Config::default()
        };
        let state = load_catalog(&config).await.unwrap();
        assert_eq!(state.daily_puzzle_id, None);
        assert_eq!(state.catalog.get(0).unwrap().id, "00008");
    }
}
