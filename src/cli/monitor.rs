//! Live status monitoring

use super::{open_core, print_status};
use colored::Colorize;
use homevpn_core::error::HomeVpnError;
use std::path::Path;
use tracing::info;

/// Run the monitor command until Ctrl+C
pub async fn run_monitor(config_path: Option<&Path>) -> Result<(), HomeVpnError> {
    let core = open_core(config_path, true)?;

    let interval = core.get_config().status_check_interval;
    println!(
        "{} (every {}s, Ctrl+C to stop)",
        "Monitoring HomeVPN status".bold(),
        interval
    );

    // Print a summary only when something actually changed
    let mut updates = core.subscribe_status();
    let printer = tokio::spawn(async move {
        let mut last = None;
        while updates.changed().await.is_ok() {
            let status = updates.borrow_and_update().clone();
            if last.as_ref() != Some(&status) {
                print_status(&status);
                last = Some(status);
            }
        }
    });

    core.start_monitor().await;

    tokio::signal::ctrl_c().await?;
    info!("Ctrl+C received, stopping monitor");

    core.stop_monitor().await;
    drop(core);
    printer.abort();
    Ok(())
}
