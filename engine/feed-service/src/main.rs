//! Sports Feed Service
//!
//! Runs one refresh cycle before binding the HTTP server, then keeps the snapshot
//! current in the background until Ctrl+C or SIGTERM.

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

use feed_service::{
    graceful_shutdown, initialize_logging, load_configuration, rest_api, setup_signal_handlers,
};
use sports_feed::{HttpFetcher, RefreshScheduler, SnapshotStore};

#[tokio::main]
async fn main() -> Result<()> {
    let config = load_configuration()?;
    initialize_logging(&config.logging)?;

    info!("Starting Sports Feed Service v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration loaded: {:?}", config);

    let store = Arc::new(SnapshotStore::new());
    let fetcher =
        Arc::new(HttpFetcher::new(&config.feed.sources).context("Failed to create HTTP fetcher")?);
    let scheduler = RefreshScheduler::new(&config.feed, fetcher, Arc::clone(&store));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Startup blocks on the first cycle; a validation failure aborts the process.
    let refresh_handle =
        scheduler.start(shutdown_rx.clone()).await.context("Startup refresh failed")?;

    setup_signal_handlers(shutdown_tx)?;
    info!("Signal handlers configured");

    let routes = rest_api::create_routes(store);
    let addr = config.server.socket_addr()?;
    let mut server_shutdown = shutdown_rx;
    let (bound, server) = warp::serve(routes)
        .try_bind_with_graceful_shutdown(addr, async move {
            let _ = server_shutdown.wait_for(|stop| *stop).await;
        })
        .with_context(|| format!("Failed to bind HTTP server on {addr}"))?;

    info!("Listening on http://{}", bound);
    server.await;

    info!("Shutdown signal received. Initiating graceful shutdown...");
    graceful_shutdown(refresh_handle, config.server.shutdown_timeout()).await;

    info!("Sports Feed Service shutdown complete");
    Ok(())
}
