//! Public operation surface consumed by presentation layers
//!
//! [`HomeVpnCore`] ties the configuration store, the status engine, the
//! monitor loop and the activity log together. Share it between UI handlers
//! with an `Arc`; every method takes `&self`.

use crate::config::file::{load_config_from_path, resolve_config_path, save_config_to_path};
use crate::config::HomeVpnConfig;
use crate::error::{ConfigError, HomeVpnError};
use crate::vpn::engine::{EngineTimings, StatusEngine};
use crate::vpn::monitor::MonitorHandle;
use crate::vpn::state::Status;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::warn;

/// HomeVPN core: configuration, status engine, monitor and logs
pub struct HomeVpnCore {
    engine: Arc<StatusEngine>,
    monitor: Mutex<Option<MonitorHandle>>,
}

impl HomeVpnCore {
    /// Create a core with default configuration and settle delays
    pub fn new() -> Result<Self, HomeVpnError> {
        Self::with_config(HomeVpnConfig::default())
    }

    pub fn with_config(config: HomeVpnConfig) -> Result<Self, HomeVpnError> {
        Self::with_timings(config, EngineTimings::default())
    }

    pub fn with_timings(
        config: HomeVpnConfig,
        timings: EngineTimings,
    ) -> Result<Self, HomeVpnError> {
        Ok(Self {
            engine: Arc::new(StatusEngine::new(config, timings)?),
            monitor: Mutex::new(None),
        })
    }

    /// Load settings from `path`, or from the default location
    ///
    /// Returns false when the file cannot be found or read; the current
    /// configuration then stays in effect. Malformed values are logged and
    /// skipped.
    pub fn load_config(&self, path: Option<&Path>) -> bool {
        let path = match resolve_config_path(path) {
            Ok(path) => path,
            Err(e) => {
                self.add_log(&format!("Cannot locate config file: {}", e));
                return false;
            }
        };

        let loaded = match load_config_from_path(&path, &self.engine.config()) {
            Ok(loaded) => loaded,
            Err(_) => {
                self.add_log(&format!(
                    "Config file not found, using defaults: {}",
                    path.display()
                ));
                return false;
            }
        };

        for warning in &loaded.warnings {
            self.add_log(&warning.to_string());
        }
        if let Err(e) = loaded.config.validate() {
            warn!("Loaded configuration is questionable: {}", e);
            let message = match e {
                ConfigError::ValidationError { message } => message,
                other => other.to_string(),
            };
            self.add_log(&format!("Configuration warning: {}", message));
        }

        self.engine.set_config(loaded.config);
        self.add_log(&format!("Configuration loaded from: {}", path.display()));
        true
    }

    /// Write the current settings to `path`, or to the default location
    ///
    /// Returns false, after logging, when the file cannot be written.
    pub fn save_config(&self, path: Option<&Path>) -> bool {
        let path = match resolve_config_path(path) {
            Ok(path) => path,
            Err(e) => {
                self.add_log(&format!("Cannot locate config file: {}", e));
                return false;
            }
        };

        match save_config_to_path(&self.engine.config(), &path) {
            Ok(()) => {
                self.add_log(&format!("Configuration saved to: {}", path.display()));
                true
            }
            Err(e) => {
                warn!("{}", e);
                self.add_log(&format!("Failed to save config to: {}", path.display()));
                false
            }
        }
    }

    pub fn get_config(&self) -> HomeVpnConfig {
        self.engine.config()
    }

    /// Replace the whole configuration; takes effect on the next recompute
    pub fn set_config(&self, config: HomeVpnConfig) {
        self.engine.set_config(config);
    }

    pub async fn connect_vpn(&self) -> Status {
        self.engine.connect_vpn().await
    }

    pub async fn disconnect_vpn(&self) -> Status {
        self.engine.disconnect_vpn().await
    }

    pub async fn mount_share(&self) -> Status {
        self.engine.mount_share().await
    }

    pub async fn unmount_share(&self) -> Status {
        self.engine.unmount_share().await
    }

    pub async fn recompute_status(&self) -> Status {
        self.engine.recompute_status().await
    }

    /// Start the background monitor
    ///
    /// Must be called from within a tokio runtime. Returns false if a monitor
    /// is already running.
    pub async fn start_monitor(&self) -> bool {
        let mut slot = self.monitor.lock().await;
        if slot.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return false;
        }

        *slot = Some(MonitorHandle::spawn(self.engine.clone()));
        self.add_log("Status monitor started");
        true
    }

    /// Stop the background monitor and wait for its current iteration
    ///
    /// Returns false if no monitor was running. Dropping the core instead
    /// cancels the monitor mid-iteration.
    pub async fn stop_monitor(&self) -> bool {
        let mut slot = self.monitor.lock().await;
        let Some(handle) = slot.take() else {
            return false;
        };

        handle.stop().await;
        self.add_log("Status monitor stopped");
        true
    }

    pub async fn is_monitor_running(&self) -> bool {
        self.monitor
            .lock()
            .await
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    pub fn get_status(&self) -> Status {
        self.engine.status()
    }

    /// Receiver updated with every computed status
    pub fn subscribe_status(&self) -> watch::Receiver<Status> {
        self.engine.observers().subscribe_status()
    }

    pub fn get_logs(&self) -> Vec<String> {
        self.engine.log().snapshot()
    }

    pub fn clear_logs(&self) {
        self.engine.log().clear();
    }

    /// Append a timestamped entry to the activity log
    pub fn add_log(&self, message: &str) {
        self.engine.log().append(message);
    }

    /// Register the status observer, replacing any previous one
    ///
    /// The callback runs on whichever thread computed the status.
    pub fn set_status_callback<F>(&self, callback: F)
    where
        F: Fn(&Status) + Send + Sync + 'static,
    {
        self.engine
            .observers()
            .set_status_callback(Some(Arc::new(callback)));
    }

    /// Register the log observer, replacing any previous one
    ///
    /// The callback must not append to the log itself.
    pub fn set_log_callback<F>(&self, callback: F)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.engine
            .observers()
            .set_log_callback(Some(Arc::new(callback)));
    }

    pub fn clear_status_callback(&self) {
        self.engine.observers().set_status_callback(None);
    }

    pub fn clear_log_callback(&self) {
        self.engine.observers().set_log_callback(None);
    }
}

// Drop cannot await the task, so a running monitor is cancelled outright.
// `stop_monitor` is the graceful path.
impl Drop for HomeVpnCore {
    fn drop(&mut self) {
        if let Some(handle) = self.monitor.get_mut().take() {
            handle.abort();
        }
    }
}
