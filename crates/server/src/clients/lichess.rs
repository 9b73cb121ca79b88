use chess_core::{pgn, Puzzle, SolutionMove};
use reqwest::Client;
use serde::Deserialize;

pub const DEFAULT_DAILY_URL: &str = "https://lichess.org/api/puzzle/daily";

const DEFAULT_POPULARITY: u8 = 70;

/// `GET /api/puzzle/daily` payload (only the fields we use).
#[derive(Debug, Deserialize)]
pub struct DailyPuzzleResponse {
    pub game: DailyGame,
    pub puzzle: DailyPuzzle,
}

#[derive(Debug, Deserialize)]
pub struct DailyGame {
    #[serde(default)]
    pub pgn: String,
    #[serde(default)]
    pub fen: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DailyPuzzle {
    pub id: String,
    #[serde(default)]
    pub rating: u32,
    pub solution: Vec<String>,
    #[serde(default)]
    pub themes: Vec<String>,
    #[serde(default)]
    pub popularity: Option<i64>,
}

impl DailyPuzzleResponse {
    /// Convert to a catalog puzzle. The position is `game.fen` when Lichess
    /// sends one, otherwise the position reached by the game's movetext. The
    /// visitor plays the side to move there.
    pub fn into_puzzle(self) -> Result<Puzzle, String> {
        let fen = match self.game.fen.filter(|f| !f.trim().is_empty()) {
            Some(fen) => fen,
            None => pgn::replay(&self.game.pgn)
                .map_err(|e| format!("Daily puzzle {}: {e}", self.puzzle.id))?
                .fen(),
        };

        let moves = self
            .puzzle
            .solution
            .iter()
            .map(|m| m.parse::<SolutionMove>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("Daily puzzle {}: {e}", self.puzzle.id))?;

        // Lichess scores popularity from -100 to 100; unrated or disliked
        // puzzles get the default.
        let popularity = match self.puzzle.popularity {
            Some(p) if p > 0 => p.min(100) as u8,
            _ => DEFAULT_POPULARITY,
        };

        let mut puzzle = Puzzle {
            id: self.puzzle.id,
            fen,
            moves,
            rating: self.puzzle.rating,
            themes: self.puzzle.themes,
            popularity,
            player_color: None,
        };
        puzzle.player_color = Some(puzzle.side_to_move());
        Ok(puzzle)
    }
}

pub struct LichessClient {
    client: Client,
    daily_url: String,
}

impl LichessClient {
    pub fn new(daily_url: impl Into<String>) -> Result<Self, String> {
        let client = Client::builder()
            .user_agent("CheckmateMe/1.0")
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| format!("HTTP client error: {e}"))?;
        Ok(Self {
            client,
            daily_url: daily_url.into(),
        })
    }

    /// Fetch today's puzzle and convert it for the catalog.
    pub async fn fetch_daily_puzzle(&self) -> Result<Puzzle, String> {
        let resp = self
            .client
            .get(&self.daily_url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| format!("Request error: {e}"))?;

        if !resp.status().is_success() {
            return Err(format!("HTTP {}", resp.status()));
        }

        let daily: DailyPuzzleResponse = resp
            .json()
            .await
            .map_err(|e| format!("Body decode error: {e}"))?;

        let puzzle = daily.into_puzzle()?;
        tracing::info!(puzzle_id = %puzzle.id, rating = puzzle.rating, "Fetched Lichess daily puzzle");
        Ok(puzzle)
    }
}
