use std::fmt;

use thiserror::Error;

/// Why a submitted move was refused outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The rules engine does not allow it in the current position.
    Rules,
    /// The scripted opponent is to move.
    NotVisitorTurn,
    /// The puzzle is already solved.
    Solved,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Rejection::Rules => "not legal in this position",
            Rejection::NotVisitorTurn => "waiting for the opponent's move",
            Rejection::Solved => "puzzle already solved",
        };
        f.write_str(text)
    }
}

/// Recoverable controller errors. Session state is never left half-updated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PuzzleError {
    #[error("Illegal move {attempted}: {reason}")]
    IllegalMove { attempted: String, reason: Rejection },

    #[error("Puzzle index {index} out of range (catalog has {len} puzzles)")]
    OutOfRange { index: usize, len: usize },
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog has no playable puzzles")]
    Empty,

    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
}
