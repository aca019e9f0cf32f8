//! Observer registration for status and log events
//!
//! Two single-slot callbacks (last registration wins) plus a `watch` channel
//! for consumers that prefer to drain status updates on their own task.
//! Callbacks run synchronously on whichever thread produced the event and are
//! always invoked outside of any lock, so they may call back into the core.

use crate::vpn::state::Status;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::watch;

/// Callback receiving every computed status
pub type StatusCallback = Arc<dyn Fn(&Status) + Send + Sync>;

/// Callback receiving every timestamped activity-log line
pub type LogCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Fan-out point for engine events
pub struct Observers {
    status_callback: RwLock<Option<StatusCallback>>,
    log_callback: RwLock<Option<LogCallback>>,
    status_tx: watch::Sender<Status>,
}

impl Observers {
    pub fn new() -> Self {
        let (status_tx, _) = watch::channel(Status::default());
        Self {
            status_callback: RwLock::new(None),
            log_callback: RwLock::new(None),
            status_tx,
        }
    }

    pub fn set_status_callback(&self, callback: Option<StatusCallback>) {
        *self
            .status_callback
            .write()
            .unwrap_or_else(PoisonError::into_inner) = callback;
    }

    pub fn set_log_callback(&self, callback: Option<LogCallback>) {
        *self
            .log_callback
            .write()
            .unwrap_or_else(PoisonError::into_inner) = callback;
    }

    /// Receiver that always holds the most recently published status
    pub fn subscribe_status(&self) -> watch::Receiver<Status> {
        self.status_tx.subscribe()
    }

    /// Publish a status to the callback and to channel subscribers
    ///
    /// Fires even when the status is unchanged.
    pub fn notify_status(&self, status: &Status) {
        self.status_tx.send_replace(status.clone());

        let callback = self
            .status_callback
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(callback) = callback {
            callback(status);
        }
    }

    pub fn notify_log(&self, line: &str) {
        let callback = self
            .log_callback
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(callback) = callback {
            callback(line);
        }
    }
}

impl Default for Observers {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_last_registration_wins() {
        let observers = Observers::new();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let counter = first.clone();
        observers.set_log_callback(Some(Arc::new(move |_: &str| {
            counter.fetch_add(1, Ordering::SeqCst);
        })));
        let counter = second.clone();
        observers.set_log_callback(Some(Arc::new(move |_: &str| {
            counter.fetch_add(1, Ordering::SeqCst);
        })));

        observers.notify_log("12:00:00: hello");
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_cleared_callback_is_not_called() {
        let observers = Observers::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        observers.set_status_callback(Some(Arc::new(move |_: &Status| {
            counter.fetch_add(1, Ordering::SeqCst);
        })));
        observers.set_status_callback(None);

        observers.notify_status(&Status::default());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_watch_channel_sees_latest_status() {
        let observers = Observers::new();
        let rx = observers.subscribe_status();

        let status = Status {
            vpn_connected: true,
            current_ip: "192.168.1.42".to_string(),
            ..Status::default()
        };
        observers.notify_status(&status);

        assert_eq!(*rx.borrow(), status);
    }

    #[test]
    fn test_callback_may_reregister_itself() {
        let observers = Arc::new(Observers::new());
        let inner = observers.clone();
        observers.set_status_callback(Some(Arc::new(move |_: &Status| {
            inner.set_status_callback(None);
        })));

        observers.notify_status(&Status::default());
        observers.notify_status(&Status::default());
    }
}
