//! Tests for the public HomeVpnCore surface: observers and logs

mod common;

use common::{core, count_entries, ip_server, ip_url, ShareFixture, HOME_IP};
use homevpn_core::vpn::Status;
use homevpn_core::HomeVpnCore;
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;
use tokio::time::timeout;

#[tokio::test]
async fn test_status_callback_may_read_back_into_core() {
    let fixture = ShareFixture::new();
    let server = ip_server(HOME_IP).await;
    let core = Arc::new(core(fixture.config(&ip_url(&server))));

    let observed = Arc::new(Mutex::new(Vec::new()));
    let sink = observed.clone();
    let weak: Weak<HomeVpnCore> = Arc::downgrade(&core);
    core.set_status_callback(move |status| {
        if let Some(core) = weak.upgrade() {
            // Neither call may deadlock while the engine is notifying
            let snapshot = core.get_status();
            let _ = core.get_logs();
            sink.lock().unwrap().push((status.clone(), snapshot));
        }
    });

    timeout(Duration::from_secs(15), core.recompute_status())
        .await
        .expect("recompute deadlocked");

    let observed = observed.lock().unwrap();
    assert_eq!(observed.len(), 1);
    assert_eq!(observed[0].0, observed[0].1);
}

#[tokio::test]
async fn test_log_callback_receives_timestamped_lines() {
    let fixture = ShareFixture::new();
    let core = core(fixture.config(""));
    let lines = Arc::new(Mutex::new(Vec::new()));
    let sink = lines.clone();
    core.set_log_callback(move |line| sink.lock().unwrap().push(line.to_string()));

    core.add_log("hello");
    core.clear_log_callback();
    core.add_log("unseen");

    let lines = lines.lock().unwrap();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with(": hello"));
    assert_eq!(core.get_logs().len(), 2);
}

#[tokio::test]
async fn test_subscribers_see_latest_status() {
    let fixture = ShareFixture::new();
    let server = ip_server(HOME_IP).await;
    let core = core(fixture.config(&ip_url(&server)));
    let mut updates = core.subscribe_status();

    core.recompute_status().await;

    timeout(Duration::from_secs(5), updates.changed())
        .await
        .expect("no status published")
        .unwrap();
    let status: Status = updates.borrow_and_update().clone();
    assert!(status.vpn_connected);
    assert_eq!(status.current_ip, HOME_IP);
}

#[tokio::test]
async fn test_clear_logs() {
    let fixture = ShareFixture::new();
    let core = core(fixture.config(""));

    core.recompute_status().await;
    core.add_log("something happened");
    assert!(!core.get_logs().is_empty());

    core.clear_logs();
    assert!(core.get_logs().is_empty());
}

#[tokio::test]
async fn test_set_config_applies_on_next_recompute() {
    let fixture = ShareFixture::new();
    let server = ip_server(HOME_IP).await;
    let core = core(fixture.config(&ip_url(&server)));
    assert!(core.recompute_status().await.vpn_connected);

    let mut config = core.get_config();
    config.home_ip_prefix = Some("10.8.".to_string());
    core.set_config(config.clone());
    assert_eq!(core.get_config(), config);

    assert!(!core.recompute_status().await.vpn_connected);
    assert_eq!(count_entries(&core.get_logs(), "VPN Disconnected"), 1);
}

#[tokio::test]
async fn test_concurrent_operations_keep_invariant() {
    let fixture = ShareFixture::new();
    let server = ip_server(HOME_IP).await;
    let core = Arc::new(core(fixture.config(&ip_url(&server))));
    core.connect_vpn().await;

    let tasks: Vec<_> = (0..4)
        .map(|i| {
            let core = core.clone();
            tokio::spawn(async move {
                for _ in 0..3 {
                    let status = if i % 2 == 0 {
                        core.mount_share().await
                    } else {
                        core.recompute_status().await
                    };
                    assert!(!(status.share_mounted && !status.vpn_connected));
                }
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap();
    }

    let status = core.get_status();
    assert!(status.vpn_connected);
    assert!(status.share_mounted);
}
