//! Per-puzzle mutable state.

use std::fmt;
use std::sync::Arc;

use chess_core::{Board, PlayedMove, Puzzle, Role, SolutionMove, Square};
use serde::Serialize;
use tracing::debug;

use crate::error::{PuzzleError, Rejection};

/// Whose move the session expects next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnOwner {
    Opponent,
    Visitor,
}

/// Result of the most recently evaluated move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    InProgress,
    Correct,
    Incorrect,
    Solved,
}

/// Controller state machine position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    AwaitingOpponentMove,
    AwaitingVisitorMove,
    Solved,
}

/// Identifies one session instance. Every (re)load gets a new, larger value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Generation(pub u64);

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryEntry {
    pub actor: TurnOwner,
    pub mv: PlayedMove,
}

impl HistoryEntry {
    /// "Computer: e4-e5" / "You: f6-e4"
    pub fn label(&self) -> String {
        let who = match self.actor {
            TurnOwner::Opponent => "Computer",
            TurnOwner::Visitor => "You",
        };
        format!("{who}: {}", self.mv.dashed())
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    puzzle: Arc<Puzzle>,
    board: Board,
    next_move_index: usize,
    history: Vec<HistoryEntry>,
    turn_owner: TurnOwner,
    outcome: Outcome,
    generation: Generation,
}

impl Session {
    /// Fresh session on `start`, which must be the puzzle's starting board.
    pub(crate) fn start(puzzle: Arc<Puzzle>, start: Board, generation: Generation) -> Self {
        let turn_owner = if puzzle.opponent_moves_first() {
            TurnOwner::Opponent
        } else {
            TurnOwner::Visitor
        };

        Self {
            puzzle,
            board: start,
            next_move_index: 0,
            history: Vec::new(),
            turn_owner,
            outcome: Outcome::InProgress,
            generation,
        }
    }

    pub fn puzzle(&self) -> &Arc<Puzzle> {
        &self.puzzle
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn fen(&self) -> String {
        self.board.fen()
    }

    pub fn next_move_index(&self) -> usize {
        self.next_move_index
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn turn_owner(&self) -> TurnOwner {
        self.turn_owner
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn is_solved(&self) -> bool {
        self.outcome == Outcome::Solved
    }

    pub fn phase(&self) -> Phase {
        match (self.is_solved(), self.turn_owner) {
            (true, _) => Phase::Solved,
            (false, TurnOwner::Opponent) => Phase::AwaitingOpponentMove,
            (false, TurnOwner::Visitor) => Phase::AwaitingVisitorMove,
        }
    }

    /// The solution step due next, if any.
    pub fn expected_move(&self) -> Option<&SolutionMove> {
        if self.is_solved() {
            return None;
        }
        self.puzzle.moves.get(self.next_move_index)
    }

    /// Evaluate a visitor move. A legal but wrong move is taken back and
    /// reported as `Outcome::Incorrect`.
    pub(crate) fn submit(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<Role>,
    ) -> Result<(Outcome, PlayedMove), PuzzleError> {
        let attempted = || PlayedMove { from, to, promotion }.to_string();

        if self.is_solved() {
            return Err(PuzzleError::IllegalMove {
                attempted: attempted(),
                reason: Rejection::Solved,
            });
        }
        if self.turn_owner != TurnOwner::Visitor {
            return Err(PuzzleError::IllegalMove {
                attempted: attempted(),
                reason: Rejection::NotVisitorTurn,
            });
        }

        let expected = self.puzzle.moves[self.next_move_index];
        let played = self
            .board
            .play(from, to, promotion)
            .map_err(|_| PuzzleError::IllegalMove {
                attempted: attempted(),
                reason: Rejection::Rules,
            })?;

        if !expected.matches(&played) {
            self.board.undo();
            self.outcome = Outcome::Incorrect;
            debug!(
                puzzle_id = %self.puzzle.id,
                played = %played,
                expected = %expected,
                "Incorrect move taken back"
            );
            return Ok((self.outcome, played));
        }

        self.record(TurnOwner::Visitor, played);
        self.outcome = Outcome::Correct;
        if self.next_move_index == self.puzzle.moves.len() {
            self.outcome = Outcome::Solved;
        } else {
            self.turn_owner = TurnOwner::Opponent;
        }
        debug!(puzzle_id = %self.puzzle.id, played = %played, outcome = ?self.outcome, "Visitor move accepted");

        Ok((self.outcome, played))
    }

    /// Play the scripted opponent's next solution move.
    pub(crate) fn play_scripted(&mut self) -> Result<HistoryEntry, PuzzleError> {
        let expected = self.puzzle.moves[self.next_move_index];
        let played = self
            .board
            .play_solution(&expected)
            .map_err(|_| PuzzleError::IllegalMove {
                attempted: expected.to_string(),
                reason: Rejection::Rules,
            })?;

        let entry = self.record(TurnOwner::Opponent, played);
        self.turn_owner = TurnOwner::Visitor;
        if self.next_move_index == self.puzzle.moves.len() {
            self.outcome = Outcome::Solved;
        }
        debug!(puzzle_id = %self.puzzle.id, played = %played, "Opponent replied");

        Ok(entry)
    }

    fn record(&mut self, actor: TurnOwner, mv: PlayedMove) -> HistoryEntry {
        let entry = HistoryEntry { actor, mv };
        self.history.push(entry);
        self.next_move_index += 1;
        entry
    }
}
