//! Configuration module
//!
//! Holds the HomeVPN settings record and its defaults. Reading and writing the
//! flat `key=value` file lives in [`file`].

use serde::{Deserialize, Serialize};
use crate::error::ConfigError;
use url::Url;

pub mod file;

/// Default endpoint used to discover the externally visible IP address
pub const DEFAULT_CHECK_IP_URL: &str = "https://ipinfo.io/ip";

/// Default prefix identifying an address that belongs to the home network
pub const DEFAULT_HOME_IP_PREFIX: &str = "192.168.1.";

/// Default directory where the network share is mounted
pub const DEFAULT_MOUNT_POINT: &str = "/mnt/homeshare";

/// Default status polling interval in seconds
pub const DEFAULT_STATUS_CHECK_INTERVAL: u64 = 30;

/// HomeVPN configuration
///
/// Replaced wholesale on reload or `set_config`; never mutated field by field
/// while the engine is reading it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeVpnConfig {
    /// Shell command that brings the VPN up
    pub vpn_connect_cmd: String,

    /// Shell command that tears the VPN down
    pub vpn_disconnect_cmd: String,

    /// Shell command that mounts the network share
    pub mount_cmd: String,

    /// Shell command that unmounts the network share
    pub unmount_cmd: String,

    /// URL answering a plain-text external IP address
    pub check_ip_url: String,

    /// Substring the external IP must contain while connected
    pub expected_ip: Option<String>,

    /// Home network prefix, consulted when `expected_ip` is unset
    pub home_ip_prefix: Option<String>,

    /// Directory the share is mounted on
    pub mount_point: String,

    /// Command whose zero exit status means "share is mounted"
    ///
    /// Falls back to `mountpoint -q <mount_point>` when unset.
    pub mount_check_cmd: Option<String>,

    /// Seconds between two status checks of the monitor loop
    pub status_check_interval: u64,
}

impl HomeVpnConfig {
    /// Command used to ask whether the share is currently mounted
    pub fn effective_mount_check_cmd(&self) -> String {
        match self.mount_check_cmd.as_deref() {
            Some(cmd) if !cmd.trim().is_empty() => cmd.to_string(),
            _ => format!(
                "mountpoint -q {} 2>/dev/null",
                shell_quote(&self.mount_point)
            ),
        }
    }

    /// Validate the configuration
    ///
    /// Problems reported here are advisory: the engine still runs with an
    /// invalid configuration and simply reports failures through its log.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |message: String| Err(ConfigError::ValidationError { message });

        let commands = [
            ("vpn_connect_cmd", &self.vpn_connect_cmd),
            ("vpn_disconnect_cmd", &self.vpn_disconnect_cmd),
            ("mount_cmd", &self.mount_cmd),
            ("unmount_cmd", &self.unmount_cmd),
        ];
        for (key, cmd) in commands {
            if cmd.trim().is_empty() {
                return invalid(format!("{} cannot be empty", key));
            }
        }

        if let Some((key, _)) = self.multi_line_value() {
            return invalid(format!("{} cannot span several lines", key));
        }

        if self.status_check_interval == 0 {
            return invalid("status_check_interval cannot be zero".to_string());
        }

        if !self.check_ip_url.is_empty() {
            let url = match Url::parse(&self.check_ip_url) {
                Ok(url) => url,
                Err(e) => return invalid(format!("check_ip_url is not a valid URL: {}", e)),
            };
            if !matches!(url.scheme(), "http" | "https") {
                return invalid(format!(
                    "check_ip_url must use http or https, got: {}",
                    url.scheme()
                ));
            }
        }

        if self.mount_point.trim().is_empty() && self.mount_check_cmd.is_none() {
            return invalid("mount_point cannot be empty without a mount_check_cmd".to_string());
        }

        Ok(())
    }

    /// First setting whose value contains a line break
    ///
    /// The file format stores one setting per line, so such a value cannot be
    /// saved.
    pub fn multi_line_value(&self) -> Option<(&'static str, &str)> {
        let values = [
            ("vpn_connect_cmd", Some(self.vpn_connect_cmd.as_str())),
            ("vpn_disconnect_cmd", Some(self.vpn_disconnect_cmd.as_str())),
            ("mount_cmd", Some(self.mount_cmd.as_str())),
            ("unmount_cmd", Some(self.unmount_cmd.as_str())),
            ("check_ip_url", Some(self.check_ip_url.as_str())),
            ("expected_ip", self.expected_ip.as_deref()),
            ("home_ip_prefix", self.home_ip_prefix.as_deref()),
            ("mount_point", Some(self.mount_point.as_str())),
            ("mount_check_cmd", self.mount_check_cmd.as_deref()),
        ];
        values.into_iter().find_map(|(key, value)| {
            value
                .filter(|v| v.contains(['\n', '\r']))
                .map(|v| (key, v))
        })
    }
}

/// Single-quote `value` for `sh`, so it stays one word whatever it contains
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}

impl Default for HomeVpnConfig {
    fn default() -> Self {
        Self {
            vpn_connect_cmd: "echo 'VPN Connect'".to_string(),
            vpn_disconnect_cmd: "echo 'VPN Disconnect'".to_string(),
            mount_cmd: "echo 'Mount'".to_string(),
            unmount_cmd: "echo 'Unmount'".to_string(),
            check_ip_url: DEFAULT_CHECK_IP_URL.to_string(),
            expected_ip: None,
            home_ip_prefix: Some(DEFAULT_HOME_IP_PREFIX.to_string()),
            mount_point: DEFAULT_MOUNT_POINT.to_string(),
            mount_check_cmd: None,
            status_check_interval: DEFAULT_STATUS_CHECK_INTERVAL,
        }
    }
}
