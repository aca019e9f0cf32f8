//! Shared fixtures for HomeVPN core integration tests
//!
//! Commands are real shell snippets: each appends its name to a `calls` file
//! and the mount/unmount commands create or remove a marker file that the
//! mount check looks for.

#![allow(dead_code)]

use homevpn_core::config::HomeVpnConfig;
use homevpn_core::vpn::EngineTimings;
use homevpn_core::HomeVpnCore;
use std::path::PathBuf;
use tempfile::TempDir;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

pub const HOME_IP: &str = "192.168.1.42";
pub const AWAY_IP: &str = "84.12.7.1";

pub struct ShareFixture {
    dir: TempDir,
}

impl ShareFixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    pub fn marker(&self) -> PathBuf {
        self.dir.path().join("mounted")
    }

    pub fn calls_path(&self) -> PathBuf {
        self.dir.path().join("calls")
    }

    /// Names of the commands run so far, in order
    pub fn calls(&self) -> Vec<String> {
        std::fs::read_to_string(self.calls_path())
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    pub fn count_calls(&self, name: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == name).count()
    }

    /// Pretend the share got mounted behind the engine's back
    pub fn set_mounted(&self) {
        std::fs::write(self.marker(), "").expect("failed to write marker");
    }

    pub fn is_mounted(&self) -> bool {
        self.marker().exists()
    }

    pub fn config(&self, check_ip_url: &str) -> HomeVpnConfig {
        let calls = self.calls_path().display().to_string();
        let marker = self.marker().display().to_string();

        HomeVpnConfig {
            vpn_connect_cmd: format!("echo connect >> '{}'", calls),
            vpn_disconnect_cmd: format!("echo disconnect >> '{}'", calls),
            mount_cmd: format!("echo mount >> '{}' && touch '{}'", calls, marker),
            unmount_cmd: format!("echo unmount >> '{}' && rm -f '{}'", calls, marker),
            check_ip_url: check_ip_url.to_string(),
            expected_ip: None,
            home_ip_prefix: Some("192.168.1.".to_string()),
            mount_point: self.dir.path().display().to_string(),
            mount_check_cmd: Some(format!("test -f '{}'", marker)),
            status_check_interval: 30,
        }
    }
}

/// Start an IP endpoint answering `ip` on `/ip`
pub async fn ip_server(ip: &str) -> MockServer {
    let server = MockServer::start().await;
    mount_ip(&server, ip).await;
    server
}

/// Replace whatever the endpoint answers with `ip`
pub async fn set_ip(server: &MockServer, ip: &str) {
    server.reset().await;
    mount_ip(server, ip).await;
}

async fn mount_ip(server: &MockServer, ip: &str) {
    Mock::given(method("GET"))
        .and(path("/ip"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!("{}\n", ip)))
        .mount(server)
        .await;
}

pub fn ip_url(server: &MockServer) -> String {
    format!("{}/ip", server.uri())
}

/// Core without settle delays
pub fn core(config: HomeVpnConfig) -> HomeVpnCore {
    HomeVpnCore::with_timings(config, EngineTimings::immediate()).expect("failed to build core")
}

pub fn count_entries(logs: &[String], suffix: &str) -> usize {
    logs.iter()
        .filter(|line| line.ends_with(&format!(": {}", suffix)))
        .count()
}
