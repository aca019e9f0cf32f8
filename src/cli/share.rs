//! Network share commands

use super::{open_core, print_status};
use homevpn_core::error::HomeVpnError;
use std::path::Path;

/// Run the mount command
///
/// The share can only be mounted over the VPN, so the current status is
/// checked first.
pub async fn run_mount(config_path: Option<&Path>) -> Result<(), HomeVpnError> {
    let core = open_core(config_path, true)?;
    core.recompute_status().await;

    let status = core.mount_share().await;
    print_status(&status);

    if status.share_mounted {
        Ok(())
    } else if !status.last_error.is_empty() {
        Err(HomeVpnError::Rejected(status.last_error))
    } else {
        Err(HomeVpnError::Rejected(
            "share is still unmounted after running the mount command".to_string(),
        ))
    }
}

/// Run the unmount command
pub async fn run_unmount(config_path: Option<&Path>) -> Result<(), HomeVpnError> {
    let core = open_core(config_path, true)?;
    let status = core.unmount_share().await;
    print_status(&status);
    Ok(())
}
