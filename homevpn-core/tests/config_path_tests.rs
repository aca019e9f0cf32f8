//! Tests for default configuration path resolution
//!
//! Kept in their own test binary because they modify process environment.

use homevpn_core::config::file::{get_config_path, CONFIG_PATH_ENV};
use homevpn_core::error::ConfigError;
use std::path::PathBuf;

#[test]
fn test_default_path_resolution() {
    std::env::set_var(CONFIG_PATH_ENV, "/tmp/override.homeVPN");
    assert_eq!(
        get_config_path().unwrap(),
        PathBuf::from("/tmp/override.homeVPN")
    );

    std::env::remove_var(CONFIG_PATH_ENV);
    std::env::set_var("HOME", "/home/alice");
    assert_eq!(
        get_config_path().unwrap(),
        PathBuf::from("/home/alice/.homeVPN")
    );

    std::env::remove_var("HOME");
    assert_eq!(get_config_path().unwrap_err(), ConfigError::NoHomeDirectory);
}
