//! CLI command implementations
//!
//! This module contains the implementation of all CLI subcommands.

pub mod config;
pub mod monitor;
pub mod share;
pub mod vpn;

use colored::Colorize;
use homevpn_core::{error::HomeVpnError, vpn::Status, HomeVpnCore};
use std::path::Path;

/// Build a core with the configuration loaded
///
/// With `echo_log`, activity-log lines are printed as they happen.
pub(crate) fn open_core(
    config_path: Option<&Path>,
    echo_log: bool,
) -> Result<HomeVpnCore, HomeVpnError> {
    let core = HomeVpnCore::new()?;
    if echo_log {
        core.set_log_callback(|line| println!("{}", line.dimmed()));
    }
    core.load_config(config_path);
    Ok(core)
}

/// One-line coloured status summary
pub(crate) fn print_status(status: &Status) {
    let vpn = if status.vpn_connected {
        "Connected".green().bold()
    } else {
        "Disconnected".red().bold()
    };
    let share = if status.share_mounted {
        "Mounted".green().bold()
    } else {
        "Unmounted".red().bold()
    };
    let ip = if status.current_ip.is_empty() {
        "unknown".yellow()
    } else {
        status.current_ip.cyan()
    };

    println!("VPN:   {}", vpn);
    println!("Share: {}", share);
    println!("IP:    {}", ip);
    if !status.last_error.is_empty() {
        println!("Error: {}", status.last_error.yellow());
    }
}

pub(crate) fn to_json<T: serde::Serialize>(value: &T) -> Result<String, HomeVpnError> {
    serde_json::to_string_pretty(value).map_err(|e| HomeVpnError::Io(std::io::Error::other(e)))
}
