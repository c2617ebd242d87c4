//! Tandem Sync server entry point.

use std::error::Error;
use std::sync::Arc;

use axum::http::HeaderValue;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use tandem_sync::adapters::clock::SystemClock;
use tandem_sync::adapters::http::{api_router, AppState};
use tandem_sync::adapters::pairing::{
    spawn_code_sweeper, InMemoryPairingRegistry, RandomCodeGenerator,
};
use tandem_sync::adapters::session::InMemorySessionStore;
use tandem_sync::config::{AppConfig, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config.server);
    tracing::info!(
        environment = ?config.server.environment,
        "Starting Tandem Sync server"
    );

    let clock = Arc::new(SystemClock);
    let store = Arc::new(InMemorySessionStore::new(config.live.channel_capacity));
    let registry = Arc::new(InMemoryPairingRegistry::new(
        config.pairing.clone(),
        Arc::new(RandomCodeGenerator),
        clock.clone(),
    ));
    let sweeper = spawn_code_sweeper(registry.clone(), config.pairing.sweep_interval());

    let state = AppState::new(store, registry, clock, config.live.clone());
    let app = api_router(state)
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(cors_layer(&config.server))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.abort();
    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    if server.is_production() {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() && !server.is_production() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new().allow_origin(AllowOrigin::list(origins))
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
