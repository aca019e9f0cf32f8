//! Bounded, timestamped activity log
//!
//! This is the user-facing log shown by presentation layers. Every entry is
//! also mirrored to `tracing` under the `homevpn::activity` target.

use crate::notify::Observers;
use chrono::Local;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

/// Maximum number of entries kept; older ones are evicted first
pub const MAX_LOG_ENTRIES: usize = 100;

/// Thread-safe append-only log with a capacity cap
pub struct ActivityLog {
    entries: Mutex<VecDeque<String>>,
    observers: Arc<Observers>,
}

impl ActivityLog {
    pub fn new(observers: Arc<Observers>) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(MAX_LOG_ENTRIES + 1)),
            observers,
        }
    }

    /// Timestamp and append a message, then notify the log observer
    pub fn append(&self, message: &str) {
        let line = format!("{}: {}", timestamp(), message);
        tracing::info!(target: "homevpn::activity", "{}", message);

        {
            let mut entries = self.lock();
            entries.push_back(line.clone());
            while entries.len() > MAX_LOG_ENTRIES {
                entries.pop_front();
            }
        }

        self.observers.notify_log(&line);
    }

    /// Current log contents, oldest first
    pub fn snapshot(&self) -> Vec<String> {
        self.lock().iter().cloned().collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Local wall-clock time as `HH:MM:SS`
pub fn timestamp() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_format() {
        let ts = timestamp();
        assert_eq!(ts.len(), 8);
        let parts: Vec<&str> = ts.split(':').collect();
        assert_eq!(parts.len(), 3);
        assert!(parts
            .iter()
            .all(|p| p.len() == 2 && p.chars().all(|c| c.is_ascii_digit())));
    }

    #[test]
    fn test_entries_are_prefixed_with_timestamp() {
        let log = ActivityLog::new(Arc::new(Observers::new()));
        log.append("VPN Connected");

        let entries = log.snapshot();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].len(), "HH:MM:SS: VPN Connected".len());
        assert!(entries[0].ends_with(": VPN Connected"));
    }
}
