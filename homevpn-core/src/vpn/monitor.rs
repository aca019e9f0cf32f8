//! Background status monitoring
//!
//! A single tokio task that recomputes the status, then waits for either the
//! configured interval or a shutdown signal. A stop request interrupts the
//! wait immediately but never an in-flight recompute.

use crate::vpn::engine::StatusEngine;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Handle to a running monitor task
///
/// [`MonitorHandle::stop`] is the graceful path. Dropping the handle without
/// it ends the task only at its next wait; use [`MonitorHandle::abort`] to
/// cancel an in-flight recompute as well.
pub struct MonitorHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl MonitorHandle {
    /// Spawn the monitor loop on the current tokio runtime
    pub fn spawn(engine: Arc<StatusEngine>) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(run(engine, shutdown_rx));
        Self { shutdown_tx, task }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Ask the loop to exit without waiting for it
    pub fn signal_stop(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// Cancel the task at its current await point
    ///
    /// A recompute in progress is abandoned before any command it has not
    /// yet started, so nothing runs after this returns.
    pub fn abort(self) {
        self.signal_stop();
        self.task.abort();
    }

    /// Ask the loop to exit and wait until it has
    pub async fn stop(self) {
        self.signal_stop();
        if let Err(e) = self.task.await {
            warn!("Status monitor task ended abnormally: {}", e);
        }
    }
}

async fn run(engine: Arc<StatusEngine>, mut shutdown_rx: watch::Receiver<bool>) {
    info!("Status monitor loop running");

    loop {
        if *shutdown_rx.borrow() {
            break;
        }

        engine.recompute_status().await;

        let interval = Duration::from_secs(engine.config().status_check_interval.max(1));
        debug!(interval_secs = interval.as_secs(), "Waiting for next status check");

        tokio::select! {
            biased;

            changed = shutdown_rx.changed() => {
                // A dropped sender means the handle is gone
                if changed.is_err() || *shutdown_rx.borrow() {
                    break;
                }
            }

            _ = tokio::time::sleep(interval) => {}
        }
    }

    info!("Status monitor loop exited");
}
