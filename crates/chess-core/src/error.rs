use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("Invalid FEN '{fen}': {reason}")]
    InvalidFen { fen: String, reason: String },

    #[error("Invalid square: {0}")]
    InvalidSquare(String),

    #[error("Invalid move notation: {0}")]
    InvalidMove(String),

    #[error("Illegal move: {0}")]
    IllegalMove(String),

    #[error("Invalid SAN '{token}' at ply {ply}: {reason}")]
    InvalidSan {
        token: String,
        ply: usize,
        reason: String,
    },
}

/// Problems found while checking a puzzle record against the rules.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PuzzleDataError {
    #[error("Puzzle {id} has no solution moves")]
    EmptySolution { id: String },

    #[error("Puzzle {id}: {source}")]
    Board {
        id: String,
        #[source]
        source: BoardError,
    },

    #[error("Puzzle {id}: solution move {index} ({mv}) is illegal")]
    IllegalSolutionMove { id: String, index: usize, mv: String },
}
