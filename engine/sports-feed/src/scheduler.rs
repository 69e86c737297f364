use crate::config::FeedConfig;
use crate::error::FeedResult;
use crate::fetcher::SourceFetcher;
use crate::normalizer::normalize;
use crate::store::{FeedState, SnapshotStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{error, info, warn};

/// Drives the fetch → normalize → publish cycle
///
/// One cycle runs at startup. When a refresh interval is configured, a single
/// background task repeats the cycle until the shutdown signal flips to `true`.
/// A failed periodic cycle is logged and the store keeps the last good state.
pub struct RefreshScheduler {
    fetcher: Arc<dyn SourceFetcher>,
    store: Arc<SnapshotStore>,
    teams_url: String,
    games_url: String,
    interval: Option<Duration>,
}

impl RefreshScheduler {
    pub fn new(config: &FeedConfig, fetcher: Arc<dyn SourceFetcher>, store: Arc<SnapshotStore>) -> Self {
        Self {
            fetcher,
            store,
            teams_url: config.sources.teams_url.clone(),
            games_url: config.sources.games_url.clone(),
            interval: config.scheduler.refresh_interval(),
        }
    }

    /// Run the startup cycle, then spawn the periodic task if one is configured.
    ///
    /// A startup cycle that fails validation is returned as an error and nothing
    /// is published. Returns the handle of the periodic task, if spawned.
    pub async fn start(self, shutdown: watch::Receiver<bool>) -> FeedResult<Option<JoinHandle<()>>> {
        info!("Running startup refresh");
        let state = self.run_cycle().await?;
        if state.raw.all_failed() {
            error!("Every source failed during startup; serving empty data until a refresh succeeds");
        }
        self.store.publish(state);

        match self.interval {
            Some(interval) => {
                info!("Periodic refresh every {}s", interval.as_secs());
                Ok(Some(tokio::spawn(self.run_periodic(interval, shutdown))))
            }
            None => {
                info!("Periodic refresh disabled");
                Ok(None)
            }
        }
    }

    /// Run one cycle and publish it
    pub async fn refresh_once(&self) -> FeedResult<()> {
        let state = self.run_cycle().await?;
        self.store.publish(state);
        Ok(())
    }

    async fn run_periodic(self, interval: Duration, mut shutdown: watch::Receiver<bool>) {
        loop {
            tokio::select! {
                biased;
                _ = wait_for_shutdown(&mut shutdown) => break,
                _ = sleep(interval) => {}
            }

            // An in-flight cycle is dropped on shutdown so nothing is published late.
            let outcome = tokio::select! {
                biased;
                _ = wait_for_shutdown(&mut shutdown) => break,
                outcome = self.refresh_once() => outcome,
            };

            if let Err(e) = outcome {
                error!("Refresh failed, keeping previous snapshot: {}", e);
            }
        }

        info!("Periodic refresh cancelled");
    }

    async fn run_cycle(&self) -> FeedResult<FeedState> {
        info!("Fetching sources");
        let raw = self.fetcher.fetch_all().await;
        for (url, reason) in raw.failures() {
            warn!("Source {} unavailable this cycle: {}", url, reason);
        }

        let normalized = normalize(&raw, &self.teams_url, &self.games_url)?;
        info!(
            "Normalized {} teams and {} games",
            normalized.teams.len(),
            normalized.games.len()
        );

        Ok(FeedState::new(raw, normalized))
    }
}

// Resolves once shutdown is requested or the sender is gone.
async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    let _ = shutdown.wait_for(|stop| *stop).await;
}
