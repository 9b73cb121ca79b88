use serde::{Deserialize, Serialize};
use shakmaty::Color;

/// One of the two players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    White,
    Black,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }
}

impl From<Color> for Side {
    fn from(color: Color) -> Self {
        match color {
            Color::White => Side::White,
            Color::Black => Side::Black,
        }
    }
}

impl From<Side> for Color {
    fn from(side: Side) -> Self {
        match side {
            Side::White => Color::White,
            Side::Black => Color::Black,
        }
    }
}

/// Side to move as encoded in a FEN string.
///
/// Only the turn field is inspected: `"w"` is White, any other token
/// (including a missing field) is Black.
pub fn side_to_move(fen: &str) -> Side {
    match fen.split_whitespace().nth(1) {
        Some("w") => Side::White,
        _ => Side::Black,
    }
}
