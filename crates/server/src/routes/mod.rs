pub mod health;
pub mod puzzles;
pub mod sessions;
