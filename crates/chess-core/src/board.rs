//! Position handling over shakmaty.
//!
//! `Board` is the rules-engine capability the puzzle controller needs:
//! validate and apply a move, undo it, list legal destinations for a square,
//! serialize to FEN and report the side to move.

use shakmaty::{
    fen::Fen, uci::UciMove, CastlingMode, Chess, EnPassantMode, Move, Position, Role, Square,
};

use crate::error::BoardError;
use crate::notation::{PlayedMove, SolutionMove};
use crate::side::Side;

#[derive(Debug, Clone, Default)]
pub struct Board {
    position: Chess,
    /// Positions before each applied move, newest last.
    undo_stack: Vec<Chess>,
}

impl Board {
    pub fn from_fen(fen: &str) -> Result<Self, BoardError> {
        let invalid = |reason: String| BoardError::InvalidFen {
            fen: fen.to_string(),
            reason,
        };

        let setup: Fen = fen.trim().parse().map_err(|e| invalid(format!("{e}")))?;
        let position: Chess = setup
            .into_position(CastlingMode::Standard)
            .map_err(|e| invalid(format!("{e}")))?;

        Ok(Self::from_position(position))
    }

    pub fn from_position(position: Chess) -> Self {
        Self {
            position,
            undo_stack: Vec::new(),
        }
    }

    pub fn fen(&self) -> String {
        Fen::from_position(&self.position, EnPassantMode::Legal).to_string()
    }

    pub fn turn(&self) -> Side {
        self.position.turn().into()
    }

    pub fn is_check(&self) -> bool {
        self.position.is_check()
    }

    pub fn is_checkmate(&self) -> bool {
        self.position.is_checkmate()
    }

    /// Number of moves that can still be undone.
    pub fn depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Validate and apply a move given by its squares.
    ///
    /// A pawn reaching the last rank without a promotion piece promotes to a
    /// queen; a promotion piece on any other move is ignored. Castling may be
    /// given as king-to-rook and is reported with the king's destination. On
    /// error the position is untouched.
    pub fn play(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<Role>,
    ) -> Result<PlayedMove, BoardError> {
        let mv = self.resolve(from, to, promotion).ok_or_else(|| {
            let text = PlayedMove { from, to, promotion }.to_string();
            BoardError::IllegalMove(text)
        })?;

        let to = match mv.to_uci(CastlingMode::Standard) {
            UciMove::Normal { to, .. } => to,
            _ => to,
        };
        let played = PlayedMove {
            from,
            to,
            promotion: mv.promotion(),
        };

        self.undo_stack.push(self.position.clone());
        self.position.play_unchecked(mv);

        Ok(played)
    }

    pub fn play_solution(&mut self, mv: &SolutionMove) -> Result<PlayedMove, BoardError> {
        self.play(mv.from, mv.to, mv.promotion)
    }

    /// Take back the most recent move. Returns false when nothing was played.
    pub fn undo(&mut self) -> bool {
        match self.undo_stack.pop() {
            Some(previous) => {
                self.position = previous;
                true
            }
            None => false,
        }
    }

    /// Squares the piece on `from` can legally move to.
    ///
    /// Castling is reported as the king's destination (g1/c1/g8/c8).
    pub fn legal_destinations(&self, from: Square) -> Vec<Square> {
        let mut targets: Vec<Square> = self
            .position
            .legal_moves()
            .iter()
            .filter(|m| m.from() == Some(from))
            .filter_map(|m| match m.to_uci(CastlingMode::Standard) {
                UciMove::Normal { to, .. } => Some(to),
                _ => None,
            })
            .collect();

        targets.sort();
        targets.dedup();
        targets
    }

    fn resolve(&self, from: Square, to: Square, promotion: Option<Role>) -> Option<Move> {
        let uci = UciMove::Normal {
            from,
            to,
            promotion,
        };

        let retry = match promotion {
            None => Some(Role::Queen),
            Some(_) => None,
        };

        uci.to_move(&self.position).ok().or_else(|| {
            UciMove::Normal {
                from,
                to,
                promotion: retry,
            }
            .to_move(&self.position)
            .ok()
        })
    }
}
