mod config;

use anyhow::Result;
use crate::config::AppConfig;
use oracle_api::{create_app, AppState};
use oracle_services::{provider_from_config, Broadcaster, IngestService, StateStore, SubscriberRegistry};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "bet_oracle=debug,oracle_services=debug,oracle_api=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("🚀 Starting Bet-Oracle live odds service");

    // Load configuration
    let config = AppConfig::new()?;
    let ingest_config = config.ingest_config()?;
    info!("✅ Configuration loaded successfully");
    info!("🌐 Server will bind to: {}", config.server_addr());

    // Shared state: one store, one subscriber registry
    let store = Arc::new(StateStore::new());
    let registry = Arc::new(SubscriberRegistry::new());
    let broadcaster = Broadcaster::new(registry.clone());

    let provider = provider_from_config(&config.provider_config())?;
    let ingest = IngestService::new(provider, store.clone(), broadcaster, ingest_config);

    let state = AppState::new(store, registry).with_subscriber_buffer(config.feed.subscriber_buffer);
    let app = create_app(state);
    let listener = TcpListener::bind(config.server_addr()).await?;

    // Ingest starts once everything it feeds is in place
    let shutdown = CancellationToken::new();
    let ingest_handle = {
        let shutdown = shutdown.clone();
        tokio::spawn(async move { ingest.run(shutdown).await })
    };

    info!("✅ All services started successfully");
    info!("⌨️  Press Ctrl+C to stop");

    let serve_result = axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown(shutdown.clone()))
        .await;

    // Clean shutdown
    shutdown.cancel();
    if let Err(e) = ingest_handle.await {
        error!("❌ Ingest task ended abnormally: {}", e);
    }

    serve_result?;
    info!("👋 Shut down gracefully");
    Ok(())
}

async fn wait_for_shutdown(shutdown: CancellationToken) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            match result {
                Ok(()) => info!("🛑 Shutdown requested"),
                Err(e) => {
                    error!("❌ Failed to listen for Ctrl+C: {}", e);
                    shutdown.cancelled().await;
                }
            }
        }
        _ = shutdown.cancelled() => {}
    }
}
