//! Puzzle catalog: the validated, ordered list a controller plays through.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use chess_core::{Board, Puzzle};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::CatalogError;

/// Built-in puzzles used when nothing else is available.
const FALLBACK_JSON: &str = include_str!("../data/fallback_puzzles.json");

#[derive(Debug)]
pub(crate) struct CatalogEntry {
    pub(crate) puzzle: Arc<Puzzle>,
    pub(crate) start: Board,
}

/// Validated puzzles. Never empty; cheap to clone.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Arc<[CatalogEntry]>,
}

/// Catalog listing row for the puzzle picker.
#[derive(Debug, Clone, Serialize)]
pub struct PuzzleSummary {
    pub index: usize,
    pub id: String,
    pub rating: u32,
    pub themes: Vec<String>,
    pub popularity: u8,
    pub opponent_moves_first: bool,
}

impl Catalog {
    /// Build a catalog, dropping puzzles whose solution does not replay and
    /// repeated ids (first one wins).
    pub fn new(puzzles: Vec<Puzzle>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(puzzles.len());

        for puzzle in puzzles {
            if !seen.insert(puzzle.id.clone()) {
                warn!(puzzle_id = %puzzle.id, "Skipping duplicate puzzle id");
                continue;
            }
            match puzzle.prepare() {
                Ok(start) => entries.push(CatalogEntry {
                    puzzle: Arc::new(puzzle),
                    start,
                }),
                Err(e) => warn!("Skipping unplayable puzzle: {e}"),
            }
        }

        if entries.is_empty() {
            return Err(CatalogError::Empty);
        }

        Ok(Self {
            entries: entries.into(),
        })
    }

    /// The built-in puzzle list.
    pub fn fallback_puzzles() -> Result<Vec<Puzzle>, CatalogError> {
        Ok(serde_json::from_str(FALLBACK_JSON)?)
    }

    pub fn fallback() -> Result<Self, CatalogError> {
        Self::new(Self::fallback_puzzles()?)
    }

    /// Read a JSON array of puzzles from disk.
    pub fn load_puzzles_file<P: AsRef<Path>>(path: P) -> Result<Vec<Puzzle>, CatalogError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        Self::new(Self::load_puzzles_file(path)?)
    }

    /// Put a freshly fetched puzzle in front of the static list.
    pub fn with_daily(daily: Option<Puzzle>, fallback: Vec<Puzzle>) -> Result<Self, CatalogError> {
        let mut puzzles = Vec::with_capacity(fallback.len() + 1);
        if let Some(puzzle) = daily {
            info!(puzzle_id = %puzzle.id, "Prepending daily puzzle");
            puzzles.push(puzzle);
        }
        puzzles.extend(fallback);
        Self::new(puzzles)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Arc<Puzzle>> {
        self.entries.get(index).map(|e| &e.puzzle)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.puzzle.id == id)
    }

    pub fn summaries(&self) -> Vec<PuzzleSummary> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, e)| PuzzleSummary {
                index,
                id: e.puzzle.id.clone(),
                rating: e.puzzle.rating,
                themes: e.puzzle.themes.clone(),
                popularity: e.puzzle.popularity,
                opponent_moves_first: e.puzzle.opponent_moves_first(),
            })
            .collect()
    }

    /// Entry at `index`, wrapping around the end of the list.
    pub(crate) fn entry(&self, index: usize) -> &CatalogEntry {
        &self.entries[index % self.entries.len()]
    }
}
