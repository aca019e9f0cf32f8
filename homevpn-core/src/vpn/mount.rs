//! Network share mount detection

use crate::config::HomeVpnConfig;
use crate::vpn::command;
use tracing::{debug, warn};

/// Answers "is the configured share currently mounted"
///
/// Runs the configured check command (or `mountpoint -q <mount_point>`); a
/// zero exit status means mounted. A check that cannot be launched counts as
/// not mounted.
#[derive(Debug, Default, Clone, Copy)]
pub struct MountChecker;

impl MountChecker {
    pub fn new() -> Self {
        Self
    }

    #[tracing::instrument(skip(self, config), fields(mount_point = %config.mount_point))]
    pub async fn is_mounted(&self, config: &HomeVpnConfig) -> bool {
        let check = config.effective_mount_check_cmd();
        match command::exit_status(&check).await {
            Ok(status) => {
                debug!(%status, "Mount check finished");
                status.success()
            }
            Err(e) => {
                warn!("Mount check could not run: {}", e);
                false
            }
        }
    }
}
