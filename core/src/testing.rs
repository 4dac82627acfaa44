// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Fakes shared by the unit tests of this crate.

use std::collections::{HashMap, VecDeque};
use std::net::Ipv4Addr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use lanwake_common::interface::{self, InterfaceInfo};
use lanwake_protocols::arp::ArpReply;
use pnet::datalink::NetworkInterface;
use pnet::ipnetwork::IpNetwork;
use pnet::util::MacAddr;

use crate::probe::{ArpProbe, ProbeError};
use crate::stream::{EventSink, SinkError};

pub(crate) const LOCAL_MAC: MacAddr = MacAddr(0x02, 0, 0, 0, 0, 0x01);

/// `eth0` on 192.168.1.10/24.
pub(crate) fn mock_interface_info() -> InterfaceInfo {
    let intf = NetworkInterface {
        name: "eth0".to_string(),
        description: String::new(),
        index: 2,
        mac: Some(LOCAL_MAC),
        ips: vec![IpNetwork::V4("192.168.1.10/24".parse().unwrap())],
        flags: 0,
    };
    interface::resolve_from(&[intf], "eth0").unwrap()
}

/// Polls `condition` for up to two seconds.
pub(crate) async fn eventually(condition: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    condition()
}

#[derive(Default)]
struct MockState {
    hosts: HashMap<Ipv4Addr, MacAddr>,
    stray: Vec<ArpReply>,
    requests: Vec<Ipv4Addr>,
    pending: VecDeque<ArpReply>,
}

/// A pretend link segment. Hosts added to it answer requests for their address.
#[derive(Clone, Default)]
pub(crate) struct MockNetwork {
    state: Arc<Mutex<MockState>>,
}

impl MockNetwork {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_host(&self, ip: Ipv4Addr, mac: MacAddr) {
        self.state.lock().unwrap().hosts.insert(ip, mac);
    }

    pub(crate) fn remove_host(&self, ip: Ipv4Addr) {
        self.state.lock().unwrap().hosts.remove(&ip);
    }

    /// A reply that shows up once per window regardless of what was asked.
    pub(crate) fn add_stray_reply(&self, ip: Ipv4Addr, mac: MacAddr) {
        self.state.lock().unwrap().stray.push(ArpReply {
            sender_mac: mac,
            sender_ip: ip,
        });
    }

    pub(crate) fn request_count(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }

    pub(crate) fn requests(&self) -> Vec<Ipv4Addr> {
        self.state.lock().unwrap().requests.clone()
    }

    pub(crate) fn probe(&self) -> MockProbe {
        MockProbe {
            network: self.clone(),
        }
    }
}

pub(crate) struct MockProbe {
    network: MockNetwork,
}

impl ArpProbe for MockProbe {
    fn request(&mut self, target: Ipv4Addr) -> anyhow::Result<()> {
        let mut state = self.network.state.lock().unwrap();
        if state.requests.len() % 255 == 0 {
            let stray = state.stray.clone();
            state.pending.extend(stray);
        }
        state.requests.push(target);
        if let Some(mac) = state.hosts.get(&target).copied() {
            state.pending.push_back(ArpReply {
                sender_mac: mac,
                sender_ip: target,
            });
        }
        Ok(())
    }

    fn read_reply(&mut self, deadline: Instant) -> Result<ArpReply, ProbeError> {
        loop {
            if let Some(reply) = self.network.state.lock().unwrap().pending.pop_front() {
                return Ok(reply);
            }
            if Instant::now() >= deadline {
                return Err(ProbeError::Timeout);
            }
            std::thread::sleep(Duration::from_millis(1));
        }
    }
}

pub(crate) type Frames = Arc<Mutex<Vec<String>>>;

/// Sink that keeps every frame it was given.
pub(crate) struct RecordingSink {
    frames: Frames,
    fail_after: Option<usize>,
}

impl RecordingSink {
    pub(crate) fn new() -> (Self, Frames) {
        let frames: Frames = Arc::default();
        let sink = Self {
            frames: Arc::clone(&frames),
            fail_after: None,
        };
        (sink, frames)
    }

    /// Accepts `count` frames, then reports the observer as gone.
    pub(crate) fn failing_after(count: usize) -> (Self, Frames) {
        let (mut sink, frames) = Self::new();
        sink.fail_after = Some(count);
        (sink, frames)
    }
}

#[async_trait]
impl EventSink for RecordingSink {
    async fn send_frame(&mut self, frame: String) -> Result<(), SinkError> {
        let mut frames = self.frames.lock().unwrap();
        if Some(frames.len()) == self.fail_after {
            return Err(SinkError::Closed);
        }
        frames.push(frame);
        Ok(())
    }
}
