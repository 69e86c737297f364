//! Signal handling for graceful shutdown

use anyhow::Result;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{error, info, warn};

/// Flip `shutdown` to `true` on Ctrl+C or SIGTERM
pub fn setup_signal_handlers(shutdown: watch::Sender<bool>) -> Result<()> {
    #[cfg(unix)]
    let sigterm = {
        use signal_hook::consts::SIGTERM;
        use std::sync::atomic::AtomicBool;
        use std::sync::Arc;

        let flag = Arc::new(AtomicBool::new(false));
        signal_hook::flag::register(SIGTERM, Arc::clone(&flag))?;
        flag
    };

    tokio::spawn(async move {
        #[cfg(unix)]
        let terminate = async {
            use std::sync::atomic::Ordering;

            while !sigterm.load(Ordering::Relaxed) {
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
            info!("SIGTERM signal received");
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            result = tokio::signal::ctrl_c() => match result {
                Ok(()) => info!("Ctrl+C signal received"),
                Err(e) => error!("Failed to listen for Ctrl+C signal: {}", e),
            },
            _ = terminate => {}
        }

        let _ = shutdown.send(true);
    });

    Ok(())
}

/// Wait for the periodic refresh task to observe shutdown
pub async fn graceful_shutdown(refresh_handle: Option<JoinHandle<()>>, shutdown_timeout: Duration) {
    info!("Starting graceful shutdown...");

    let Some(handle) = refresh_handle else {
        info!("Graceful shutdown complete");
        return;
    };

    match timeout(shutdown_timeout, handle).await {
        Ok(Ok(())) => info!("Refresh task stopped gracefully"),
        Ok(Err(e)) => error!("Refresh task failed: {}", e),
        Err(_) => warn!("Refresh task did not stop within timeout, forcing shutdown"),
    }

    info!("Graceful shutdown complete");
}
