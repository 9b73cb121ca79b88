#![allow(dead_code)]

use reqwest::Client;
use server::catalog::load_catalog;
use server::config::Config;

/// Build a reqwest client for tests.
pub fn client() -> Client {
    Client::new()
}

/// Offline config: built-in puzzles, opponent replies played immediately.
pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        opponent_delay_ms: 0,
        fetch_daily_puzzle: false,
        ..Config::default()
    }
}

/// Serve the API on an ephemeral port and return its base URL.
pub async fn spawn_server(config: Config) -> String {
    let catalog = load_catalog(&config).await.expect("Failed to load catalog");
    let app = server::build_router(config, catalog);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("No local address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server error");
    });

    format!("http://{addr}")
}

/// Build a URL for an API endpoint.
pub fn url(base: &str, path: &str) -> String {
    format!("{base}{path}")
}
