//! Status engine
//!
//! Owns the configuration and the shared status, runs the configured
//! connect/disconnect/mount/unmount commands, and recomputes the status from
//! the external IP and the mount check after every action.

use crate::activity::ActivityLog;
use crate::config::HomeVpnConfig;
use crate::error::ProbeError;
use crate::notify::Observers;
use crate::vpn::command::CommandRunner;
use crate::vpn::ip_probe::IpProbe;
use crate::vpn::mount::MountChecker;
use crate::vpn::state::{is_vpn_ip, SharedStatus, Status, VPN_NOT_CONNECTED};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

/// Fixed waits between running an action command and re-checking status
///
/// Nothing polls for the external tooling to actually finish; these delays
/// assume it settles in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineTimings {
    /// Wait after the VPN connect command
    pub connect_settle: Duration,
    /// Wait after disconnect, mount and unmount commands
    pub action_settle: Duration,
}

impl EngineTimings {
    /// No settle delays at all
    pub fn immediate() -> Self {
        Self {
            connect_settle: Duration::ZERO,
            action_settle: Duration::ZERO,
        }
    }
}

impl Default for EngineTimings {
    fn default() -> Self {
        Self {
            connect_settle: Duration::from_secs(2),
            action_settle: Duration::from_secs(1),
        }
    }
}

/// The VPN/share state machine
pub struct StatusEngine {
    config: RwLock<HomeVpnConfig>,
    status: SharedStatus,
    observers: Arc<Observers>,
    log: Arc<ActivityLog>,
    runner: CommandRunner,
    probe: IpProbe,
    mount_checker: MountChecker,
    timings: EngineTimings,
}

impl StatusEngine {
    pub fn new(config: HomeVpnConfig, timings: EngineTimings) -> Result<Self, ProbeError> {
        let observers = Arc::new(Observers::new());
        let log = Arc::new(ActivityLog::new(observers.clone()));

        Ok(Self {
            config: RwLock::new(config),
            status: SharedStatus::new(),
            runner: CommandRunner::new(log.clone()),
            probe: IpProbe::new()?,
            mount_checker: MountChecker::new(),
            observers,
            log,
            timings,
        })
    }

    pub fn config(&self) -> HomeVpnConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_config(&self, config: HomeVpnConfig) {
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = config;
    }

    pub fn status(&self) -> Status {
        self.status.get()
    }

    pub fn observers(&self) -> &Arc<Observers> {
        &self.observers
    }

    pub fn log(&self) -> &Arc<ActivityLog> {
        &self.log
    }

    /// Run the connect command, wait for it to settle, then recompute
    pub async fn connect_vpn(&self) -> Status {
        self.log.append("Connecting to VPN...");
        let command = self.config().vpn_connect_cmd;
        self.runner.run(&command).await;

        sleep(self.timings.connect_settle).await;
        self.recompute_status().await
    }

    pub async fn disconnect_vpn(&self) -> Status {
        self.log.append("Disconnecting from VPN...");
        let command = self.config().vpn_disconnect_cmd;
        self.runner.run(&command).await;

        sleep(self.timings.action_settle).await;
        self.recompute_status().await
    }

    /// Mount the share, refusing while the VPN is down
    ///
    /// A refused mount never runs the mount command; it records
    /// `"VPN not connected"` as the last error and still notifies observers.
    pub async fn mount_share(&self) -> Status {
        // Check and error write happen under one lock
        let refused = self.status.update(|status| {
            if status.vpn_connected {
                return None;
            }
            status.last_error = VPN_NOT_CONNECTED.to_string();
            Some(status.clone())
        });
        if let Some(status) = refused {
            self.log
                .append("ERROR: Cannot mount share - VPN not connected");
            self.observers.notify_status(&status);
            return status;
        }

        self.log.append("Mounting network share...");
        let command = self.config().mount_cmd;
        self.runner.run(&command).await;

        sleep(self.timings.action_settle).await;
        self.recompute_status().await
    }

    pub async fn unmount_share(&self) -> Status {
        self.log.append("Unmounting network share...");
        let command = self.config().unmount_cmd;
        self.runner.run(&command).await;

        sleep(self.timings.action_settle).await;
        self.recompute_status().await
    }

    /// Recompute the status from the external IP and the mount check
    ///
    /// Probing and any corrective unmount happen without the status lock; the
    /// lock only covers swapping in the new status. A mounted share without a
    /// VPN is force-unmounted. Transitions are logged once per edge, and
    /// observers are notified every time, changed or not.
    #[tracing::instrument(skip(self))]
    pub async fn recompute_status(&self) -> Status {
        let config = self.config();

        let current_ip = self.probe.fetch_external_ip(&config.check_ip_url).await;
        let vpn_connected = is_vpn_ip(&current_ip, &config);
        let mut share_mounted = self.mount_checker.is_mounted(&config).await;

        let forced_unmount = !vpn_connected && share_mounted;
        if forced_unmount {
            self.runner.run(&config.unmount_cmd).await;
            share_mounted = false;
        }

        let (old, new) = self.status.update(|status| {
            let old = status.clone();
            status.current_ip = current_ip;
            status.vpn_connected = vpn_connected;
            status.share_mounted = share_mounted;
            if status.vpn_connected && !old.vpn_connected {
                status.last_error.clear();
            }
            (old, status.clone())
        });

        if forced_unmount {
            self.log.append("VPN disconnected, unmounting share");
        }
        if old.vpn_connected != new.vpn_connected {
            self.log.append(if new.vpn_connected {
                "VPN Connected"
            } else {
                "VPN Disconnected"
            });
        }
        if old.share_mounted != new.share_mounted {
            self.log.append(if new.share_mounted {
                "Share Mounted"
            } else {
                "Share Unmounted"
            });
        }

        if old == new {
            debug!(status = %new, "Status unchanged");
        } else {
            info!(status = %new, "Status updated");
        }

        self.observers.notify_status(&new);
        new
    }
}
