//! pushdeploy demo application.
//!
//! Serves a static greeting on `/` and a static JSON document on `/data`.
//! Listens on `DEMO_LISTEN_ADDR` (default `127.0.0.1:8000`), the address the
//! nginx site template proxies to.

mod routes;

use anyhow::{Context, Result};
use pushdeploy_common::DemoServerConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config: DemoServerConfig = envy::prefixed("DEMO_")
        .from_env()
        .context("failed to load config from DEMO_* env vars")?;

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;

    tracing::info!(listen_addr = %config.listen_addr, "demo app ready");

    axum::serve(listener, routes::router())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!("demo app shut down");
    Ok(())
}

/// Wait for SIGINT (Ctrl-C) for graceful shutdown.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("received shutdown signal");
}
