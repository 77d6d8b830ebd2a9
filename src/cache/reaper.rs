//! Background expiry task for the cache
//!
//! The reaper wakes on a fixed interval and removes expired entries. It stops
//! when asked to, or once every cache handle (and with it every shutdown
//! sender) has been dropped.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use super::store::{Shared, MIN_REAP_INTERVAL};

/// Handle for controlling a spawned reaper task
#[derive(Debug, Clone)]
pub(super) struct Reaper {
    interval: Duration,
    shutdown_tx: mpsc::Sender<()>,
    task: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl Reaper {
    /// Spawns the reap loop for `shared` on the current runtime
    pub(super) fn spawn(shared: Arc<Shared>, interval: Duration) -> Self {
        let interval = interval.max(MIN_REAP_INTERVAL);
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // Skip the first tick (immediate)
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let removed = shared.reap_expired();
                        if removed > 0 {
                            debug!(removed, remaining = shared.len(), "Reaped expired cache entries");
                        }
                    }
                    // Explicit shutdown, or all senders dropped
                    _ = shutdown_rx.recv() => {
                        break;
                    }
                }
            }

            debug!("Cache reaper stopped");
        });

        debug!(?interval, "Cache reaper started");

        Self {
            interval,
            shutdown_tx,
            task: Arc::new(Mutex::new(Some(task))),
        }
    }

    pub(super) fn interval(&self) -> Duration {
        self.interval
    }

    pub(super) fn is_running(&self) -> bool {
        self.task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Signals the task to stop and waits for it to exit
    pub(super) async fn shutdown(&self) {
        // Fails only when the task has already exited
        let _ = self.shutdown_tx.send(()).await;

        let task = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(task) = task {
            if let Err(e) = task.await {
                warn!("Cache reaper ended abnormally: {}", e);
            }
        }
    }
}
