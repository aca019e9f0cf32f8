//! Configuration commands

use super::to_json;
use homevpn_core::config::file::resolve_config_path;
use homevpn_core::error::HomeVpnError;
use homevpn_core::HomeVpnCore;
use std::path::Path;

/// Run the config show command
pub fn run_show(config_path: Option<&Path>, json: bool) -> Result<(), HomeVpnError> {
    let core = HomeVpnCore::new()?;
    let loaded = core.load_config(config_path);
    let config = core.get_config();

    if json {
        println!("{}", to_json(&config)?);
        return Ok(());
    }

    if !loaded {
        println!("# No configuration file found, showing defaults");
    }
    print!("{}", homevpn_core::config::file::render_config(&config));

    for line in core.get_logs() {
        eprintln!("{}", line);
    }
    Ok(())
}

/// Run the config save command
pub fn run_save(config_path: Option<&Path>) -> Result<(), HomeVpnError> {
    let path = resolve_config_path(config_path)?;
    let core = HomeVpnCore::new()?;
    core.load_config(Some(&path));

    if core.save_config(Some(&path)) {
        println!("Configuration saved to {}", path.display());
        Ok(())
    } else {
        Err(HomeVpnError::Rejected(format!(
            "failed to save configuration to {}",
            path.display()
        )))
    }
}

/// Run the config path command
pub fn run_path(config_path: Option<&Path>) -> Result<(), HomeVpnError> {
    let path = resolve_config_path(config_path)?;
    println!("{}", path.display());
    Ok(())
}
