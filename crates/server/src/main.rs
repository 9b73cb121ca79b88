use server::catalog;
use server::config;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = config::Config::from_env();

    tracing::info!("Loading puzzle catalog...");
    let catalog = catalog::load_catalog(&config)
        .await
        .context("Failed to build puzzle catalog")?;

    let addr = format!("{}:{}", config.host, config.port);
    let app = server::build_router(config, catalog);

    tracing::info!("Starting server on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
