//! VPN connection commands

use super::{open_core, print_status, to_json};
use homevpn_core::error::HomeVpnError;
use std::path::Path;

/// Run the status command
pub async fn run_status(config_path: Option<&Path>, json: bool) -> Result<(), HomeVpnError> {
    // Keep stdout machine readable
    let core = open_core(config_path, !json)?;

    let status = core.recompute_status().await;
    if json {
        println!("{}", to_json(&status)?);
    } else {
        print_status(&status);
    }
    Ok(())
}

/// Run the connect command
pub async fn run_connect(config_path: Option<&Path>) -> Result<(), HomeVpnError> {
    let core = open_core(config_path, true)?;
    let status = core.connect_vpn().await;
    print_status(&status);

    if status.vpn_connected {
        Ok(())
    } else {
        Err(HomeVpnError::Rejected(
            "VPN is still disconnected after running the connect command".to_string(),
        ))
    }
}

/// Run the disconnect command
pub async fn run_disconnect(config_path: Option<&Path>) -> Result<(), HomeVpnError> {
    let core = open_core(config_path, true)?;
    let status = core.disconnect_vpn().await;
    print_status(&status);

    if status.vpn_connected {
        Err(HomeVpnError::Rejected(
            "VPN is still connected after running the disconnect command".to_string(),
        ))
    } else {
        Ok(())
    }
}
