use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::error::PuzzleDataError;
use crate::notation::SolutionMove;
use crate::side::{side_to_move, Side};

fn default_popularity() -> u8 {
    70
}

/// A puzzle record: starting position plus the scripted solution line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Puzzle {
    pub id: String,
    pub fen: String,
    pub moves: Vec<SolutionMove>,
    #[serde(default)]
    pub rating: u32,
    #[serde(default)]
    pub themes: Vec<String>,
    #[serde(default = "default_popularity")]
    pub popularity: u8,
    /// Side the visitor plays. When absent the visitor plays the side that
    /// is not to move in `fen`, so `moves[0]` belongs to the opponent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_color: Option<Side>,
}

impl Puzzle {
    pub fn side_to_move(&self) -> Side {
        side_to_move(&self.fen)
    }

    pub fn visitor_side(&self) -> Side {
        self.player_color
            .unwrap_or_else(|| self.side_to_move().other())
    }

    /// True when the scripted opponent makes the first solution move.
    pub fn opponent_moves_first(&self) -> bool {
        self.side_to_move() != self.visitor_side()
    }

    /// First six characters of the id, for compact display.
    pub fn short_id(&self) -> &str {
        match self.id.char_indices().nth(6) {
            Some((idx, _)) => &self.id[..idx],
            None => &self.id,
        }
    }

    pub fn starting_board(&self) -> Result<Board, PuzzleDataError> {
        Board::from_fen(&self.fen).map_err(|source| PuzzleDataError::Board {
            id: self.id.clone(),
            source,
        })
    }

    /// Replay the whole solution from the starting position and hand back
    /// the untouched starting board.
    pub fn prepare(&self) -> Result<Board, PuzzleDataError> {
        if self.moves.is_empty() {
            return Err(PuzzleDataError::EmptySolution {
                id: self.id.clone(),
            });
        }

        let start = self.starting_board()?;
        let mut board = start.clone();
        for (index, mv) in self.moves.iter().enumerate() {
            if board.play_solution(mv).is_err() {
                return Err(PuzzleDataError::IllegalSolutionMove {
                    id: self.id.clone(),
                    index,
                    mv: mv.to_string(),
                });
            }
        }

        Ok(start)
    }

    pub fn validate(&self) -> Result<(), PuzzleDataError> {
        self.prepare().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn puzzle(fen: &str, moves: &[&str]) -> Puzzle {
        Puzzle {
            id: "test01".to_string(),
            fen: fen.to_string(),
            moves: moves.iter().map(|m| m.parse().unwrap()).collect(),
            rating: 1500,
            themes: vec![],
            popularity: 70,
            player_color: None,
        }
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{
            "id": "0000D",
            "fen": "5rk1/1p3ppp/pq3b2/8/8/1P1Q1N2/P4PPP/3R2K1 w - - 2 27",
            "moves": ["d3d6", "f8d8", "d6d8", "f6d8"]
        }"#;
        let p: Puzzle = serde_json::from_str(json).unwrap();
        assert_eq!(p.moves.len(), 4);
        assert_eq!(p.popularity, 70);
        assert_eq!(p.rating, 0);
        assert_eq!(p.player_color, None);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_visitor_side_defaults_to_side_not_to_move() {
        let p = puzzle("4k3/8/5n2/8/4P3/3P4/8/4K3 w - - 0 1", &["e4e5", "f6e4", "d3e4"]);
        assert_eq!(p.side_to_move(), Side::White);
        assert_eq!(p.visitor_side(), Side::Black);
        assert!(p.opponent_moves_first());
    }

    #[test]
    fn test_explicit_player_color_moves_first() {
        let mut p = puzzle(
            "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4",
            &["h5f7"],
        );
        p.player_color = Some(Side::White);
        assert!(!p.opponent_moves_first());
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_and_illegal_lines() {
        let empty = puzzle("4k3/8/8/8/8/8/8/4K3 w - - 0 1", &[]);
        assert!(matches!(
            empty.validate(),
            Err(PuzzleDataError::EmptySolution { .. })
        ));

        // e4e5 is blocked by the pawn on e5
        let blocked = puzzle(
            "r1bqkb1r/pppp1ppp/2n2n2/4p3/4P3/3P1N2/PPP2PPP/RNBQKB1R w KQkq - 0 4",
            &["e4e5", "f6e4", "d3e4"],
        );
        assert_eq!(
            blocked.validate(),
            Err(PuzzleDataError::IllegalSolutionMove {
                id: "test01".to_string(),
                index: 0,
                mv: "e4e5".to_string(),
            })
        );
    }

    #[test]
    fn test_short_id() {
        let mut p = puzzle("4k3/8/8/8/8/8/8/4K3 w - - 0 1", &["e1e2"]);
        p.id = "abcdefghij".to_string();
        assert_eq!(p.short_id(), "abcdef");
        p.id = "abc".to_string();
        assert_eq!(p.short_id(), "abc");
    }
}
