use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use playlist_recs::{
    config::Config,
    routes::{create_router, AppState},
    services::{SpotifyProvider, SpotifyTokenProvider},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "playlist_recs=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    // Initialize application state
    let state = Arc::new(AppState {
        provider: Arc::new(SpotifyProvider::new(config.spotify_api_url.clone())),
        token_provider: Arc::new(SpotifyTokenProvider::new(
            config.spotify_client_id.clone(),
            config.spotify_client_secret.clone(),
            config.spotify_accounts_url.clone(),
        )),
        playlist_description: config.playlist_description.clone(),
    });

    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    tracing::info!(%address, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
