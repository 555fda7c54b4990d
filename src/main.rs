use std::sync::Arc;

mod analysis;
mod config;
mod dto;
mod error;
mod feed;
mod handlers;
mod lunar;
mod models;
mod router;
mod store;

use config::Config;
use models::feed::FeedPoint;
use store::EntryStore;

#[derive(Clone)]
pub struct AppState {
    pub store: EntryStore,
    pub feed: Arc<Vec<FeedPoint>>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lunalog_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Arc::new(Config::from_env()?);

    let feed = match &config.feed_path {
        Some(path) => match feed::load_feed(path, config.feed_start) {
            Ok(points) => {
                tracing::info!(path = %path.display(), points = points.len(), "Lunar feed loaded");
                points
            }
            Err(e) => {
                tracing::warn!(error = %e, "Lunar feed unavailable, continuing without it");
                Vec::new()
            }
        },
        None => Vec::new(),
    };

    let state = AppState {
        store: EntryStore::new(),
        feed: Arc::new(feed),
        config: config.clone(),
    };

    let app = router::build_router(state);

    let addr = config.listen_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
