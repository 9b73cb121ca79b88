use std::env;
use std::time::Duration;

use chess_puzzler::ControllerSettings;

use crate::clients::lichess::DEFAULT_DAILY_URL;

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub opponent_delay_ms: u64,
    pub hint_duration_ms: u64,
    pub fetch_daily_puzzle: bool,
    pub lichess_daily_url: String,
    pub puzzle_catalog_path: Option<String>,
    pub max_sessions: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            opponent_delay_ms: 500,
            hint_duration_ms: 2000,
            fetch_daily_puzzle: true,
            lichess_daily_url: DEFAULT_DAILY_URL.to_string(),
            puzzle_catalog_path: None,
            max_sessions: 1000,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parsed("PORT").unwrap_or(defaults.port),
            opponent_delay_ms: parsed("OPPONENT_DELAY_MS").unwrap_or(defaults.opponent_delay_ms),
            hint_duration_ms: parsed("HINT_DURATION_MS").unwrap_or(defaults.hint_duration_ms),
            fetch_daily_puzzle: env::var("FETCH_DAILY_PUZZLE")
                .ok()
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.fetch_daily_puzzle),
            lichess_daily_url: env::var("LICHESS_DAILY_URL").unwrap_or(defaults.lichess_daily_url),
            puzzle_catalog_path: env::var("PUZZLE_CATALOG_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty()),
            max_sessions: parsed::<usize>("MAX_SESSIONS")
                .filter(|&n| n > 0)
                .unwrap_or(defaults.max_sessions),
        }
    }

    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            opponent_delay: Duration::from_millis(self.opponent_delay_ms),
            hint_duration: Duration::from_millis(self.hint_duration_ms),
        }
    }
}

fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
