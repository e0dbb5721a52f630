use std::sync::Arc;

use clap::Parser;
use striform_api::{build_router, ApiState, DocumentStore, FileDocumentStore, InMemoryDocumentStore, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::parse();

    let store: Arc<dyn DocumentStore> = match &config.data_file {
        Some(path) => Arc::new(FileDocumentStore::open(path).await?),
        None => {
            tracing::warn!("no data file configured, documents live in memory only");
            Arc::new(InMemoryDocumentStore::new())
        }
    };

    let app = build_router(ApiState::new(store).with_cors_any(config.cors_any));

    let addr = config.addr()?;
    tracing::info!("Striform API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}
