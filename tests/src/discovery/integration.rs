// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

#![cfg(test)]
use std::time::Duration;

use lanwake_common::config::ScannerConfig;
use lanwake_common::error::ScanError;
use lanwake_common::interface;
use lanwake_common::models::machine::MachineInfo;
use lanwake_core::registry::ScannerRegistry;
use lanwake_core::scanner::WorkerState;
use lanwake_core::stream::ChannelSink;
use lanwake_core::wake;
use pnet::util::MacAddr;
use tokio::sync::mpsc;

#[cfg(target_os = "linux")]
use crate::utils::{NetnsContext, TARGET_IP};

fn test_config() -> ScannerConfig {
    ScannerConfig::default().with_probe_window(Duration::from_secs(1))
}

fn decode(frame: &str) -> MachineInfo {
    let data = frame
        .lines()
        .find_map(|line| line.strip_prefix("data: "))
        .expect("every frame carries a data line");
    serde_json::from_str(data).expect("data is a MachineInfo")
}

#[test]
fn test_unknown_interface_is_not_registered() {
    let registry = ScannerRegistry::with_config(test_config());

    let err = registry
        .get_or_create("lanwake-does-not-exist0")
        .err()
        .expect("resolution should fail");

    assert!(matches!(err, ScanError::InterfaceNotFound(_)));
    assert!(err.is_resolution_error());
    assert!(registry.is_empty());
}

#[test]
#[cfg(target_os = "linux")]
fn test_loopback_cannot_be_scanned() {
    let result = interface::resolve("lo");
    assert!(
        matches!(result, Err(ScanError::NoHardwareAddress(_))),
        "loopback should be rejected for lacking a MAC"
    );
}

#[tokio::test]
#[cfg(target_os = "linux")]
async fn test_privileged_discovery_netns() {
    let ctx: NetnsContext = match NetnsContext::new("disc1") {
        Some(c) => c,
        None => {
            eprintln!("Skipping netns test: Requires root privileges or 'ip' command.");
            return;
        }
    };

    let registry = ScannerRegistry::with_config(test_config());
    let scanner = registry
        .get_or_create(&ctx.host_if)
        .expect("scanner should come up on the veth end");

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(scanner.worker_state(), WorkerState::Idle);
    assert_eq!(scanner.windows_completed(), 0);

    let (frames_tx, mut frames_rx) = mpsc::channel::<String>(16);
    let session = scanner.attach();
    let serving = tokio::spawn(async move {
        let mut sink = ChannelSink::new(frames_tx);
        session.serve(&mut sink).await
    });

    let frame = tokio::time::timeout(Duration::from_secs(5), frames_rx.recv())
        .await
        .expect("the namespaced end should answer within a window")
        .expect("the session should still be running");

    let found: MachineInfo = decode(&frame);
    assert_eq!(found.ip, TARGET_IP);
    if let Some(expected) = ctx.target_mac() {
        assert_eq!(found.mac.to_string(), expected);
    }
    assert!(frame.starts_with("event: found\n"));

    drop(frames_rx);
    let _ = tokio::time::timeout(Duration::from_secs(2), serving).await;
    assert_eq!(scanner.observer_count(), 0);
}

#[tokio::test]
#[cfg(target_os = "linux")]
async fn test_privileged_late_observer_replay() {
    let ctx: NetnsContext = match NetnsContext::new("disc2") {
        Some(c) => c,
        None => {
            eprintln!("Skipping netns test: Requires root privileges or 'ip' command.");
            return;
        }
    };

    let registry = ScannerRegistry::with_config(test_config());
    let scanner = registry
        .get_or_create(&ctx.host_if)
        .expect("scanner should come up on the veth end");

    let first = scanner.attach();
    let mut waited = Duration::ZERO;
    while scanner.cached_hosts().is_empty() && waited < Duration::from_secs(5) {
        tokio::time::sleep(Duration::from_millis(50)).await;
        waited += Duration::from_millis(50);
    }

    let second = scanner.attach();
    assert!(
        second.replay().iter().any(|m| m.ip == TARGET_IP),
        "the late observer should be handed the cached target"
    );

    drop(first);
    drop(second);
    assert_eq!(scanner.observer_count(), 0);
}

#[tokio::test]
#[cfg(target_os = "linux")]
async fn test_privileged_wake_over_veth() {
    let ctx: NetnsContext = match NetnsContext::new("wake1") {
        Some(c) => c,
        None => {
            eprintln!("Skipping netns test: Requires root privileges or 'ip' command.");
            return;
        }
    };

    let info = interface::resolve(&ctx.host_if).expect("veth end should resolve");
    let mac = MacAddr::new(0x02, 0x00, 0x5e, 0x10, 0x00, 0x01);

    let result = wake::send_magic_packet(info.broadcast(), mac).await;
    assert!(result.is_ok(), "Wake failed: {:?}", result.err());
}
