//! Periodic settlement in the background.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use super::service::SettlementService;
use crate::port::outbound::store::Store;

/// Handle for controlling a running sweep loop.
pub struct SweepHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl SweepHandle {
    /// Stop the loop and wait for an in-flight sweep to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        if let Err(e) = self.task.await {
            error!(error = %e, "Settlement sweep task ended abnormally");
        }
    }
}

impl<S: Store + 'static> SettlementService<S> {
    /// Run [`SettlementService::run_sweep`] every `interval` until shut down.
    ///
    /// The first sweep runs immediately. Must be called inside a tokio
    /// runtime.
    pub fn start(self: Arc<Self>, interval: Duration) -> SweepHandle {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!(interval_secs = interval.as_secs(), "Settlement sweep started");

            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        info!("Settlement sweep shutting down");
                        break;
                    }

                    _ = ticker.tick() => {
                        if let Err(e) = self.run_sweep().await {
                            error!(error = %e, "Settlement sweep failed");
                        }
                    }
                }
            }
        });

        SweepHandle { shutdown_tx, task }
    }
}
