//! Background retention sweeper.
//!
//! Runs [`ArtifactStore::sweep_now`] on a fixed period until stopped. The
//! first sweep happens immediately on start.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::ArtifactStore;

/// Shortest period the sweeper will run at.
const MIN_INTERVAL: Duration = Duration::from_millis(10);

/// Periodic sweep task for an [`ArtifactStore`].
pub struct RetentionSweeper {
    store: ArtifactStore,
    interval: Duration,
}

impl RetentionSweeper {
    pub fn new(store: ArtifactStore, interval: Duration) -> Self {
        Self {
            store,
            interval: interval.max(MIN_INTERVAL),
        }
    }

    /// Start the sweep loop on the current runtime.
    pub fn start(self) -> SweeperHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let interval = self.interval;

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let purged = self.store.sweep_now().await;
                        debug!(purged, "Sweeper tick");
                    }
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                }
            }

            info!("Retention sweeper stopped");
        });

        info!(interval_ms = interval.as_millis() as u64, "Retention sweeper started");

        SweeperHandle {
            shutdown: shutdown_tx,
            handle,
        }
    }
}

/// Handle for a running sweeper.
pub struct SweeperHandle {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl SweeperHandle {
    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Signal the loop to stop and wait for it to exit.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.handle.await {
            warn!(error = %e, "Retention sweeper task ended abnormally");
        }
    }
}
