//! VPN and share status
//!
//! Defines the status record shared with presentation layers, the rule that
//! derives "connected" from the observed IP, and the locked wrapper the
//! engine keeps the status in.

use crate::config::HomeVpnConfig;
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Error recorded when a mount is requested without a VPN connection
pub const VPN_NOT_CONNECTED: &str = "VPN not connected";

/// Snapshot of the VPN connection and share mount state
///
/// `share_mounted` is never true while `vpn_connected` is false once a status
/// computation has completed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub vpn_connected: bool,
    pub share_mounted: bool,
    pub current_ip: String,
    pub last_error: String,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "vpn: {}, share: {}",
            if self.vpn_connected {
                "connected"
            } else {
                "disconnected"
            },
            if self.share_mounted {
                "mounted"
            } else {
                "unmounted"
            }
        )?;
        if !self.current_ip.is_empty() {
            write!(f, ", ip: {}", self.current_ip)?;
        }
        if !self.last_error.is_empty() {
            write!(f, ", error: {}", self.last_error)?;
        }
        Ok(())
    }
}

/// Decide whether `ip` means the VPN is up
///
/// `expected_ip` wins over `home_ip_prefix`; both are substring matches. With
/// neither configured, any plausible answer from the IP endpoint counts.
pub fn is_vpn_ip(ip: &str, config: &HomeVpnConfig) -> bool {
    let non_empty = |value: &Option<String>| value.clone().filter(|v| !v.is_empty());

    if let Some(expected) = non_empty(&config.expected_ip) {
        ip.contains(expected.as_str())
    } else if let Some(prefix) = non_empty(&config.home_ip_prefix) {
        ip.contains(prefix.as_str())
    } else {
        !ip.is_empty() && ip != "Error" && ip.len() > 5
    }
}

/// Thread-safe status holder
///
/// Held only for in-memory reads and writes, never across external commands
/// or network calls.
#[derive(Debug, Default)]
pub struct SharedStatus(Mutex<Status>);

impl SharedStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a copy of the current status
    pub fn get(&self) -> Status {
        self.lock().clone()
    }

    /// Run `f` with exclusive access to the status
    pub fn update<R>(&self, f: impl FnOnce(&mut Status) -> R) -> R {
        f(&mut self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, Status> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(expected: Option<&str>, prefix: Option<&str>) -> HomeVpnConfig {
        HomeVpnConfig {
            expected_ip: expected.map(str::to_string),
            home_ip_prefix: prefix.map(str::to_string),
            ..HomeVpnConfig::default()
        }
    }

    #[test]
    fn test_home_prefix_match() {
        let config = config(None, Some("192.168.1."));
        assert!(is_vpn_ip("192.168.1.42", &config));
        assert!(!is_vpn_ip("84.12.7.1", &config));
        assert!(!is_vpn_ip("", &config));
    }

    #[test]
    fn test_expected_ip_takes_precedence() {
        let config = config(Some("203.0.113.7"), Some("192.168.1."));
        assert!(is_vpn_ip("203.0.113.7", &config));
        assert!(!is_vpn_ip("192.168.1.42", &config));
    }

    #[test]
    fn test_heuristic_without_rules() {
        let config = config(None, None);
        assert!(!is_vpn_ip("", &config));
        assert!(!is_vpn_ip("Error", &config));
        assert!(!is_vpn_ip("1.2.3", &config));
        assert!(is_vpn_ip("10.0.0.1", &config));
    }

    #[test]
    fn test_empty_rules_count_as_unset() {
        let config = config(Some(""), Some(""));
        assert!(is_vpn_ip("10.0.0.1", &config));
    }

    #[test]
    fn test_shared_status_update() {
        let shared = SharedStatus::new();
        assert_eq!(shared.get(), Status::default());

        let old = shared.update(|status| {
            let old = status.clone();
            status.vpn_connected = true;
            old
        });
        assert!(!old.vpn_connected);
        assert!(shared.get().vpn_connected);
    }

    #[test]
    fn test_display() {
        let status = Status {
            vpn_connected: true,
            share_mounted: false,
            current_ip: "192.168.1.42".to_string(),
            last_error: String::new(),
        };
        assert_eq!(
            status.to_string(),
            "vpn: connected, share: unmounted, ip: 192.168.1.42"
        );
    }
}
