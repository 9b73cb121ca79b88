//! Chess primitives for the puzzle widget.
//!
//! Thin layer over `shakmaty`: a `Board` with an undo stack, UCI-style move
//! text for puzzle solutions, SAN line replay, and the `Puzzle` record.

pub mod board;
pub mod error;
pub mod notation;
pub mod pgn;
pub mod puzzle;
pub mod side;

pub use board::Board;
pub use error::{BoardError, PuzzleDataError};
pub use notation::{PlayedMove, SolutionMove};
pub use puzzle::Puzzle;
pub use side::{side_to_move, Side};

pub use shakmaty::{Role, Square};
