use std::net::SocketAddr;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use snaplink_api_server::config::AppConfig;
use snaplink_api_server::routes::AppState;
use snaplink_api_server::{app, store};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "snaplink_api_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();
    tracing::debug!(
        port = config.port,
        has_api_key = config.api_key.is_some(),
        max_expiration_secs = config.max_expiration_secs,
        max_body_bytes = config.max_body_bytes,
        "loaded app config"
    );

    let state = AppState::new(config.clone());
    store::spawn_purger(
        state.store.clone(),
        Duration::from_secs(config.purge_interval_secs),
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("listening on {addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await
}
