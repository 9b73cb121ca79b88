//! Puzzle session controller.
//!
//! Commands run one at a time on `&mut self`. When the scripted opponent is
//! due to move, the command hands back an `OpponentReply`; the caller waits
//! `reply.delay` and passes it to [`PuzzleController::play_opponent`]. A reply
//! that outlived its session (reset, next puzzle) carries an old generation
//! and is ignored.

use std::time::Duration;

use chess_core::{PlayedMove, Role, Square};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::catalog::Catalog;
use crate::error::PuzzleError;
use crate::session::{Generation, HistoryEntry, Outcome, Session, TurnOwner};
use crate::view::SessionView;

/// Timing knobs. Both are cosmetic; zero is fine for headless use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerSettings {
    /// Pause before the scripted opponent replies.
    pub opponent_delay: Duration,
    /// How long a hint should stay highlighted.
    pub hint_duration: Duration,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            opponent_delay: Duration::from_millis(500),
            hint_duration: Duration::from_millis(2000),
        }
    }
}

impl ControllerSettings {
    pub fn immediate() -> Self {
        Self {
            opponent_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}

/// Ticket for a deferred scripted-opponent move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpponentReply {
    pub generation: Generation,
    pub delay: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Next,
    Previous,
}

/// Advisory squares for the expected move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hint {
    pub from: Square,
    pub to: Square,
    pub expires_in: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveReport {
    pub outcome: Outcome,
    pub played: PlayedMove,
    /// Position after evaluation (unchanged for an incorrect move).
    pub fen: String,
    /// Set when the opponent must now reply.
    pub reply: Option<OpponentReply>,
}

#[derive(Debug)]
pub struct PuzzleController {
    catalog: Catalog,
    settings: ControllerSettings,
    index: usize,
    session: Session,
    last_generation: u64,
}

impl PuzzleController {
    /// Controller positioned on the first catalog puzzle.
    pub fn new(catalog: Catalog, settings: ControllerSettings) -> Self {
        let entry = catalog.entry(0);
        let session = Session::start(entry.puzzle.clone(), entry.start.clone(), Generation(1));
        info!(puzzle_id = %session.puzzle().id, generation = 1, "Puzzle loaded");

        Self {
            catalog,
            settings,
            index: 0,
            session,
            last_generation: 1,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn settings(&self) -> ControllerSettings {
        self.settings
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn view(&self) -> SessionView {
        SessionView::project(self)
    }

    /// Load puzzle `index` with a brand-new session.
    pub fn initialize(&mut self, index: usize) -> Result<Option<OpponentReply>, PuzzleError> {
        let len = self.catalog.len();
        if index >= len {
            return Err(PuzzleError::OutOfRange { index, len });
        }
        Ok(self.load(index))
    }

    pub fn reset(&mut self) -> Option<OpponentReply> {
        self.load(self.index)
    }

    /// Move to the neighbouring puzzle, wrapping around the catalog.
    pub fn advance(&mut self, direction: Direction) -> Option<OpponentReply> {
        let len = self.catalog.len();
        let index = match direction {
            Direction::Next => (self.index + 1) % len,
            Direction::Previous => (self.index + len - 1) % len,
        };
        self.load(index)
    }

    pub fn submit_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<Role>,
    ) -> Result<MoveReport, PuzzleError> {
        let (outcome, played) = self.session.submit(from, to, promotion)?;

        if outcome == Outcome::Solved {
            info!(
                puzzle_id = %self.session.puzzle().id,
                generation = %self.session.generation(),
                "Puzzle solved"
            );
        }

        Ok(MoveReport {
            outcome,
            played,
            fen: self.session.fen(),
            reply: self.pending_reply(),
        })
    }

    /// Play a deferred opponent move. Returns `Ok(None)` for stale tickets.
    pub fn play_opponent(
        &mut self,
        reply: OpponentReply,
    ) -> Result<Option<HistoryEntry>, PuzzleError> {
        if reply.generation != self.session.generation() {
            debug!(
                stale = %reply.generation,
                live = %self.session.generation(),
                "Ignoring opponent reply from a replaced session"
            );
            return Ok(None);
        }
        if self.session.turn_owner() != TurnOwner::Opponent || self.session.is_solved() {
            return Ok(None);
        }

        match self.session.play_scripted() {
            Ok(entry) => {
                if self.session.is_solved() {
                    info!(
                        puzzle_id = %self.session.puzzle().id,
                        generation = %self.session.generation(),
                        "Puzzle solved"
                    );
                }
                Ok(Some(entry))
            }
            Err(e) => {
                error!(puzzle_id = %self.session.puzzle().id, "Scripted move rejected: {e}");
                Err(e)
            }
        }
    }

    /// The opponent move currently owed, if any.
    pub fn pending_reply(&self) -> Option<OpponentReply> {
        if self.session.turn_owner() == TurnOwner::Opponent && !self.session.is_solved() {
            Some(OpponentReply {
                generation: self.session.generation(),
                delay: self.settings.opponent_delay,
            })
        } else {
            None
        }
    }

    /// Play every owed opponent move right away.
    pub fn settle(&mut self) -> Result<(), PuzzleError> {
        while let Some(reply) = self.pending_reply() {
            self.play_opponent(reply)?;
        }
        Ok(())
    }

    pub fn request_hint(&self) -> Option<Hint> {
        self.session.expected_move().map(|mv| Hint {
            from: mv.from,
            to: mv.to,
            expires_in: self.settings.hint_duration,
        })
    }

    /// Destinations for the piece on `square`; empty unless the visitor is
    /// to move.
    pub fn legal_destinations(&self, square: Square) -> Vec<Square> {
        if self.session.turn_owner() != TurnOwner::Visitor || self.session.is_solved() {
            return Vec::new();
        }
        self.session.board().legal_destinations(square)
    }

    fn load(&mut self, index: usize) -> Option<OpponentReply> {
        let entry = self.catalog.entry(index);
        self.last_generation += 1;
        let generation = Generation(self.last_generation);

        self.session = Session::start(entry.puzzle.clone(), entry.start.clone(), generation);
        self.index = index;
        info!(
            puzzle_id = %self.session.puzzle().id,
            index,
            generation = %generation,
            "Puzzle loaded"
        );

        self.pending_reply()
    }
}
