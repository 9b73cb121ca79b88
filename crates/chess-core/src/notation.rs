//! UCI-style move text as used in puzzle solutions ("e2e4", "e7e8q").

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use shakmaty::{Role, Square};

use crate::error::BoardError;

static UCI_MOVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-h][1-8])([a-h][1-8])([qrbn])?$").unwrap());

/// Parse a square name such as "e4".
pub fn parse_square(s: &str) -> Result<Square, BoardError> {
    s.trim()
        .to_ascii_lowercase()
        .parse::<Square>()
        .map_err(|_| BoardError::InvalidSquare(s.to_string()))
}

/// Parse a promotion piece letter ("q", "r", "b", "n"; case-insensitive).
pub fn parse_promotion(s: &str) -> Result<Role, BoardError> {
    let mut chars = s.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => match Role::from_char(c.to_ascii_lowercase()) {
            Some(role @ (Role::Queen | Role::Rook | Role::Bishop | Role::Knight)) => Ok(role),
            _ => Err(BoardError::InvalidMove(format!("bad promotion piece '{s}'"))),
        },
        _ => Err(BoardError::InvalidMove(format!("bad promotion piece '{s}'"))),
    }
}

/// One step of a scripted puzzle solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SolutionMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<Role>,
}

impl SolutionMove {
    /// Whether a move the visitor just played is the one this step expects.
    ///
    /// Exact `from+to` equality with the solution text, or the solution text
    /// extends `from+to` with a promotion suffix and the played move promoted.
    /// The promotion piece itself is not compared.
    pub fn matches(&self, played: &PlayedMove) -> bool {
        let expected = self.to_string();
        let played_key = played.square_key();
        expected == played_key
            || (expected.starts_with(&played_key) && played.promotion.is_some())
    }
}

impl fmt::Display for SolutionMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(role) = self.promotion {
            write!(f, "{}", role.char())?;
        }
        Ok(())
    }
}

impl FromStr for SolutionMove {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim().to_ascii_lowercase();
        let caps = UCI_MOVE_RE
            .captures(&text)
            .ok_or_else(|| BoardError::InvalidMove(s.to_string()))?;

        let from = parse_square(&caps[1])?;
        let to = parse_square(&caps[2])?;
        let promotion = caps
            .get(3)
            .map(|m| parse_promotion(m.as_str()))
            .transpose()?;

        Ok(Self { from, to, promotion })
    }
}

impl TryFrom<String> for SolutionMove {
    type Error = BoardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SolutionMove> for String {
    fn from(mv: SolutionMove) -> Self {
        mv.to_string()
    }
}

/// A move that the board accepted.
///
/// Castling is always recorded with the king's target square ("e1g1").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayedMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<Role>,
}

impl PlayedMove {
    pub fn square_key(&self) -> String {
        format!("{}{}", self.from, self.to)
    }

    /// Display form for move lists, e.g. "e2-e4".
    pub fn dashed(&self) -> String {
        format!("{}-{}", self.from, self.to)
    }
}

impl fmt::Display for PlayedMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(role) = self.promotion {
            write!(f, "{}", role.char())?;
        }
        Ok(())
    }
}
