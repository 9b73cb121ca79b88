//! Check that every catalog puzzle can be played to the end.
//!
//! Usage: validate-catalog [puzzles.json]
//! Without an argument the built-in puzzle list is checked.

use anyhow::{bail, Context};
use chess_core::Puzzle;
use chess_puzzler::{Catalog, ControllerSettings, Outcome, PuzzleController};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let puzzles: Vec<Puzzle> = match std::env::args().nth(1) {
        Some(path) => Catalog::load_puzzles_file(&path)
            .with_context(|| format!("Failed to read {path}"))?,
        None => Catalog::fallback_puzzles().context("Built-in puzzles are malformed")?,
    };

    let mut failed = 0usize;
    for puzzle in &puzzles {
        if let Err(e) = puzzle.validate() {
            println!("FAIL  {e}");
            failed += 1;
        }
    }

    let catalog = Catalog::new(puzzles.clone()).context("No playable puzzles")?;
    let mut controller = PuzzleController::new(catalog.clone(), ControllerSettings::immediate());

    let mut solved = 0usize;
    for index in 0..catalog.len() {
        let id = catalog.get(index).map(|p| p.id.clone()).unwrap_or_default();
        match play_through(&mut controller, index) {
            Ok(()) => {
                println!("OK    {id}");
                solved += 1;
            }
            Err(e) => {
                println!("FAIL  {id}: {e}");
                failed += 1;
            }
        }
    }

    println!("{solved} solved, {failed} failed, {} total", puzzles.len());
    if failed > 0 {
        bail!("{failed} puzzle(s) failed validation");
    }
    Ok(())
}

/// Solve puzzle `index` by submitting the expected visitor moves.
fn play_through(controller: &mut PuzzleController, index: usize) -> anyhow::Result<()> {
    controller.initialize(index)?;
    controller.settle()?;

    while !controller.session().is_solved() {
        let Some(hint) = controller.request_hint() else {
            bail!("no expected move before the end of the line");
        };
        let promotion = controller.session().expected_move().and_then(|m| m.promotion);

        let report = controller.submit_move(hint.from, hint.to, promotion)?;
        if report.outcome == Outcome::Incorrect {
            bail!("solution move {}{} was not accepted", hint.from, hint.to);
        }
        controller.settle()?;
    }
    Ok(())
}
