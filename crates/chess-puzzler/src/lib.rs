//! Puzzle session controller for the "Checkmate Me" widget.
//!
//! A `PuzzleController` owns a validated `Catalog` and the live `Session`:
//! it checks visitor moves against the scripted solution, alternates turns
//! with the scripted opponent and answers hint/reset/next commands. It never
//! sleeps or spawns; opponent replies are handed out as `OpponentReply`
//! tickets that the runtime plays back after the display delay.

pub mod catalog;
pub mod controller;
pub mod error;
pub mod session;
pub mod view;

pub use catalog::{Catalog, PuzzleSummary};
pub use controller::{
    ControllerSettings, Direction, Hint, MoveReport, OpponentReply, PuzzleController,
};
pub use error::{CatalogError, PuzzleError, Rejection};
pub use session::{Generation, HistoryEntry, Outcome, Phase, Session, TurnOwner};
pub use view::{HistoryLine, SessionView};

pub use chess_core;
