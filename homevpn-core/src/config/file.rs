//! `key=value` configuration file I/O
//!
//! The file is line oriented: blank lines and `#` comments are skipped, values
//! may be wrapped in double quotes, and unknown keys are ignored so older
//! builds can read newer files.

use crate::config::HomeVpnConfig;
use crate::error::ConfigError;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default configuration file name, relative to the user's home directory
const CONFIG_FILE_NAME: &str = ".homeVPN";

/// Environment variable overriding the configuration file location
pub const CONFIG_PATH_ENV: &str = "HOMEVPN_CONFIG";

/// Outcome of reading a configuration file
///
/// Malformed values do not abort loading; they are collected in `warnings`
/// and the previous value of the field is kept.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: HomeVpnConfig,
    pub warnings: Vec<ConfigError>,
}

/// Get the default configuration file path
///
/// Returns `$HOMEVPN_CONFIG` if set, otherwise `~/.homeVPN`.
pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        if !path.is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    let home = std::env::var("HOME").map_err(|_| ConfigError::NoHomeDirectory)?;
    if home.is_empty() {
        return Err(ConfigError::NoHomeDirectory);
    }
    Ok(PathBuf::from(home).join(CONFIG_FILE_NAME))
}

/// Use `path` if given, the default location otherwise
pub fn resolve_config_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    match path {
        Some(path) => Ok(path.to_path_buf()),
        None => get_config_path(),
    }
}

/// Apply the settings found in `contents` on top of `base`
pub fn parse_config(contents: &str, base: &HomeVpnConfig) -> LoadedConfig {
    let mut config = base.clone();
    let mut warnings = Vec::new();

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            debug!("Skipping config line without '=': {}", line);
            continue;
        };
        let key = key.trim();
        let value = unquote(value.trim());

        match key {
            "vpn_connect_cmd" | "vpn_connect" => config.vpn_connect_cmd = value.to_string(),
            "vpn_disconnect_cmd" | "vpn_disconnect" => {
                config.vpn_disconnect_cmd = value.to_string()
            }
            "mount_cmd" => config.mount_cmd = value.to_string(),
            "unmount_cmd" => config.unmount_cmd = value.to_string(),
            "check_ip_url" => config.check_ip_url = value.to_string(),
            "expected_ip" => config.expected_ip = non_empty(value),
            "home_ip_prefix" | "home_ip" => config.home_ip_prefix = non_empty(value),
            "mount_point" => config.mount_point = value.to_string(),
            "mount_check_cmd" => config.mount_check_cmd = non_empty(value),
            "status_check_interval" => match value.parse::<u64>() {
                Ok(secs) if secs > 0 => config.status_check_interval = secs,
                _ => warnings.push(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: value.to_string(),
                }),
            },
            unknown => debug!("Ignoring unknown config key: {}", unknown),
        }
    }

    LoadedConfig { config, warnings }
}

/// Load configuration from a specific file, starting from `base`
pub fn load_config_from_path<P: AsRef<Path>>(
    path: P,
    base: &HomeVpnConfig,
) -> Result<LoadedConfig, ConfigError> {
    let contents = std::fs::read_to_string(&path).map_err(|e| {
        debug!("Failed to read config file {:?}: {}", path.as_ref(), e);
        ConfigError::LoadFailed {
            path: path.as_ref().to_string_lossy().to_string(),
        }
    })?;

    Ok(parse_config(&contents, base))
}

/// Render a configuration in the on-disk format
pub fn render_config(config: &HomeVpnConfig) -> String {
    let optional = |value: &Option<String>| value.as_deref().map(quote).unwrap_or_default();

    let mut out = String::from("# HomeVPN Configuration\n");
    let entries = [
        ("vpn_connect_cmd", quote(&config.vpn_connect_cmd)),
        ("vpn_disconnect_cmd", quote(&config.vpn_disconnect_cmd)),
        ("mount_cmd", quote(&config.mount_cmd)),
        ("unmount_cmd", quote(&config.unmount_cmd)),
        ("check_ip_url", quote(&config.check_ip_url)),
        ("expected_ip", optional(&config.expected_ip)),
        ("home_ip_prefix", optional(&config.home_ip_prefix)),
        ("mount_point", quote(&config.mount_point)),
        ("mount_check_cmd", optional(&config.mount_check_cmd)),
        (
            "status_check_interval",
            config.status_check_interval.to_string(),
        ),
    ];
    for (key, value) in entries {
        out.push_str(key);
        out.push('=');
        out.push_str(&value);
        out.push('\n');
    }
    out
}

/// Save configuration to a specific file, overwriting it
///
/// Refuses values containing a line break, which could not be read back.
pub fn save_config_to_path<P: AsRef<Path>>(
    config: &HomeVpnConfig,
    path: P,
) -> Result<(), ConfigError> {
    if let Some((key, value)) = config.multi_line_value() {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        });
    }

    let save_failed = || ConfigError::SaveFailed {
        path: path.as_ref().to_string_lossy().to_string(),
    };

    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|_| save_failed())?;
        }
    }

    std::fs::write(&path, render_config(config)).map_err(|_| save_failed())?;

    info!("Saved HomeVPN configuration to {:?}", path.as_ref());
    Ok(())
}

fn unquote(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

// Values that would be altered by trimming or unquoting get wrapped in quotes.
fn quote(value: &str) -> String {
    let needs_quotes = value.trim() != value
        || (value.len() >= 2 && value.starts_with('"') && value.ends_with('"'));
    if needs_quotes {
        format!("\"{}\"", value)
    } else {
        value.to_string()
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
