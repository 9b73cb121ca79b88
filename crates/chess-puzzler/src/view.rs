//! Read-only projection of a controller for the front end.

use chess_core::Side;
use serde::Serialize;

use crate::controller::PuzzleController;
use crate::session::{Outcome, Phase, TurnOwner};

const MAX_THEMES: usize = 3;

#[derive(Debug, Clone, Serialize)]
pub struct HistoryLine {
    pub actor: TurnOwner,
    pub uci: String,
    pub text: String,
}

/// Everything the widget displays, derived from the session alone.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub puzzle_id: String,
    pub short_id: String,
    pub puzzle_index: usize,
    pub catalog_size: usize,
    pub rating: u32,
    pub themes: Vec<String>,
    pub visitor_side: Side,
    pub fen: String,
    pub in_check: bool,
    pub checkmate: bool,
    pub turn_owner: TurnOwner,
    pub phase: Phase,
    pub outcome: Outcome,
    pub status: String,
    pub task: String,
    pub move_index: usize,
    pub total_moves: usize,
    pub history: Vec<HistoryLine>,
}

impl SessionView {
    pub fn project(controller: &PuzzleController) -> Self {
        let session = controller.session();
        let puzzle = session.puzzle();

        let status = match session.outcome() {
            Outcome::InProgress => "Make your move!",
            Outcome::Correct => "Correct move!",
            Outcome::Incorrect => "Incorrect move. Try again!",
            Outcome::Solved => "Puzzle solved! Well done!",
        };
        let task = match session.phase() {
            Phase::AwaitingVisitorMove => "Your turn - find the best move!",
            Phase::AwaitingOpponentMove => "Computer is thinking...",
            Phase::Solved => "Puzzle complete.",
        };

        Self {
            puzzle_id: puzzle.id.clone(),
            short_id: puzzle.short_id().to_string(),
            puzzle_index: controller.index(),
            catalog_size: controller.catalog().len(),
            rating: puzzle.rating,
            themes: puzzle.themes.iter().take(MAX_THEMES).cloned().collect(),
            visitor_side: puzzle.visitor_side(),
            fen: session.fen(),
            in_check: session.board().is_check(),
            checkmate: session.board().is_checkmate(),
            turn_owner: session.turn_owner(),
            phase: session.phase(),
            outcome: session.outcome(),
            status: status.to_string(),
            task: task.to_string(),
            move_index: session.next_move_index(),
            total_moves: puzzle.moves.len(),
            history: session
                .history()
                .iter()
                .map(|entry| HistoryLine {
                    actor: entry.actor,
                    uci: entry.mv.to_string(),
                    text: entry.label(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::controller::ControllerSettings;

    #[test]
    fn test_view_tracks_session() {
        let catalog = Catalog::fallback().unwrap();
        let mut controller = PuzzleController::new(catalog, ControllerSettings::immediate());

        let view = controller.view();
        assert_eq!(view.puzzle_id, "00008");
        assert_eq!(view.themes.len(), 3);
        assert_eq!(view.task, "Computer is thinking...");
        assert_eq!(view.status, "Make your move!");
        assert_eq!(view.visitor_side, Side::White);

        controller.settle().unwrap();
        let view = controller.view();
        assert_eq!(view.task, "Your turn - find the best move!");
        assert_eq!(view.history.len(), 1);
        assert_eq!(view.history[0].text, "Computer: f2-g3");
        assert_eq!(view.move_index, 1);
        assert_eq!(view.total_moves, 6);
        assert!(!view.checkmate);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["turn_owner"], "visitor");
        assert_eq!(json["phase"], "awaiting_visitor_move");
        assert_eq!(json["visitor_side"], "white");
    }
}
