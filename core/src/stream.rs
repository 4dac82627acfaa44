// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Delivery of discoveries to one observer as Server-Sent Events.
//!
//! A [`StreamSession`] is created by [`crate::scanner::Scanner::attach`] and
//! counts as a connected client for as long as it lives. Serving it first
//! replays every cached host, then forwards live discoveries until the
//! observer goes away. Dropping the session detaches it, whichever way
//! serving ended.

use std::io;
use std::sync::Arc;

use async_trait::async_trait;
use lanwake_common::debug;
use lanwake_common::models::machine::MachineInfo;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::scanner::{ObserverId, Shared};

/// Name of the SSE event carrying a discovered host.
pub const FOUND_EVENT: &str = "found";

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("observer went away")]
    Closed,

    #[error("failed to write event: {0}")]
    Write(#[from] io::Error),

    #[error("failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Where a session writes its frames.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Writes one complete frame, flushing it to the observer.
    async fn send_frame(&mut self, frame: String) -> Result<(), SinkError>;

    /// Resolves once the observer has gone away. Sinks that can not tell
    /// never resolve and get noticed on the next failed write instead.
    async fn closed(&self) {
        std::future::pending::<()>().await
    }
}

/// Sink backed by a channel, the receiving half usually being an HTTP body.
pub struct ChannelSink {
    tx: mpsc::Sender<String>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<String>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl EventSink for ChannelSink {
    async fn send_frame(&mut self, frame: String) -> Result<(), SinkError> {
        self.tx.send(frame).await.map_err(|_| SinkError::Closed)
    }

    async fn closed(&self) {
        self.tx.closed().await
    }
}

/// Encodes `machine` as a `found` event: `event: found\ndata: <json>\n\n`.
pub fn sse_frame(machine: &MachineInfo) -> Result<String, serde_json::Error> {
    let data: String = serde_json::to_string(machine)?;
    Ok(format!("event: {FOUND_EVENT}\ndata: {data}\n\n"))
}

pub struct StreamSession {
    id: ObserverId,
    replay: Vec<MachineInfo>,
    events: mpsc::Receiver<MachineInfo>,
    shared: Arc<Shared>,
}

impl StreamSession {
    pub(crate) fn new(
        id: ObserverId,
        replay: Vec<MachineInfo>,
        events: mpsc::Receiver<MachineInfo>,
        shared: Arc<Shared>,
    ) -> Self {
        Self {
            id,
            replay,
            events,
            shared,
        }
    }

    pub fn id(&self) -> ObserverId {
        self.id
    }

    /// Hosts that were cached when the session attached.
    pub fn replay(&self) -> &[MachineInfo] {
        &self.replay
    }

    /// Streams the replay and then live events into `sink`.
    ///
    /// Only returns on failure: a failed write, or the sink reporting that
    /// its observer is gone. The session detaches when this returns.
    pub async fn serve<S>(mut self, sink: &mut S) -> Result<(), SinkError>
    where
        S: EventSink + ?Sized,
    {
        let replay: Vec<MachineInfo> = std::mem::take(&mut self.replay);
        debug!(
            verbosity = 1,
            "Replaying {} cached hosts to observer #{}",
            replay.len(),
            self.id
        );
        for machine in &replay {
            sink.send_frame(sse_frame(machine)?).await?;
        }

        // The worker may have parked between attach and now.
        self.shared.notify_worker();

        loop {
            let machine: MachineInfo = tokio::select! {
                event = self.events.recv() => match event {
                    Some(machine) => machine,
                    None => return Err(SinkError::Closed),
                },
                _ = sink.closed() => return Err(SinkError::Closed),
            };
            sink.send_frame(sse_frame(&machine)?).await?;
        }
    }
}

impl Drop for StreamSession {
    fn drop(&mut self) {
        self.shared.detach(self.id);
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::Scanner;
    use crate::testing::{MockNetwork, RecordingSink, eventually, mock_interface_info};
    use lanwake_common::config::ScannerConfig;
    use pnet::util::MacAddr;
    use std::net::Ipv4Addr;
    use std::time::Duration;

    const MAC_A: MacAddr = MacAddr(0xaa, 0xbb, 0xcc, 0x00, 0x00, 0x01);
    const IP_A: Ipv4Addr = Ipv4Addr::new(192, 168, 1, 20);
    const MAC_B: MacAddr = MacAddr(0xaa, 0xbb, 0xcc, 0x00, 0x00, 0x02);
    const IP_B: Ipv4Addr = Ipv4Addr::new(192, 168, 1, 30);

    fn scanner_on(network: &MockNetwork) -> Scanner {
        let config = ScannerConfig::default()
            .with_probe_window(Duration::from_millis(40))
            .with_observer_queue(16);
        Scanner::new(mock_interface_info(), network.probe(), config).unwrap()
    }

    #[test]
    fn frame_matches_wire_format() {
        let machine = MachineInfo::new(MAC_A, IP_A);
        assert_eq!(
            sse_frame(&machine).unwrap(),
            "event: found\ndata: {\"mac\":\"aa:bb:cc:00:00:01\",\"ip\":\"192.168.1.20\"}\n\n"
        );
    }

    #[tokio::test]
    async fn late_observer_gets_cached_hosts_first() {
        let network = MockNetwork::new();
        network.add_host(IP_A, MAC_A);
        let scanner = scanner_on(&network);

        let first = scanner.attach();
        assert!(eventually(|| scanner.cached_hosts().len() == 1).await);

        // A goes quiet before the second observer attaches, so every A frame
        // it receives must come from the replay.
        network.remove_host(IP_A);
        let settled: u64 = scanner.windows_completed() + 1;
        assert!(eventually(|| scanner.windows_completed() > settled).await);

        let second = scanner.attach();
        assert_eq!(second.replay(), &[MachineInfo::new(MAC_A, IP_A)]);
        network.add_host(IP_B, MAC_B);

        let (mut sink, frames) = RecordingSink::new();
        tokio::spawn(async move { second.serve(&mut sink).await });

        let cached: String = sse_frame(&MachineInfo::new(MAC_A, IP_A)).unwrap();
        let live: String = sse_frame(&MachineInfo::new(MAC_B, IP_B)).unwrap();
        assert!(eventually(|| frames.lock().unwrap().contains(&live)).await);

        let frames = frames.lock().unwrap();
        let first_live: usize = frames.iter().position(|f| *f == live).unwrap();
        assert_eq!(frames[0], cached);
        assert_eq!(frames[..first_live].iter().filter(|f| **f == cached).count(), 1);
        assert_eq!(frames.iter().filter(|f| **f == cached).count(), 1);
        drop(first);
    }

    #[tokio::test]
    async fn failed_replay_write_detaches_the_session() {
        let network = MockNetwork::new();
        network.add_host(IP_A, MAC_A);
        network.add_host(IP_B, MAC_B);
        let scanner = scanner_on(&network);

        let keeper = scanner.attach();
        assert!(eventually(|| scanner.cached_hosts().len() == 2).await);

        let (mut sink, frames) = RecordingSink::failing_after(1);
        let session = scanner.attach();
        assert_eq!(session.replay().len(), 2);
        assert_eq!(scanner.observer_count(), 2);

        let result = tokio::time::timeout(Duration::from_secs(2), session.serve(&mut sink))
            .await
            .expect("a failed replay write should end the session");

        assert!(matches!(result, Err(SinkError::Closed)));
        assert_eq!(frames.lock().unwrap().len(), 1);
        assert_eq!(scanner.observer_count(), 1);
        drop(keeper);
    }

    #[tokio::test]
    async fn dropping_a_session_detaches_it() {
        let network = MockNetwork::new();
        let scanner = scanner_on(&network);

        let first = scanner.attach();
        let second = scanner.attach();
        assert_eq!(scanner.observer_count(), 2);
        assert_ne!(first.id(), second.id());

        drop(first);
        assert_eq!(scanner.observer_count(), 1);
        drop(second);
        assert_eq!(scanner.observer_count(), 0);
    }

    #[tokio::test]
    async fn failed_write_ends_only_that_session() {
        let network = MockNetwork::new();
        network.add_host(IP_A, MAC_A);
        let scanner = scanner_on(&network);

        let (mut healthy, healthy_frames) = RecordingSink::new();
        let (mut broken, _) = RecordingSink::failing_after(0);
        let healthy_session = scanner.attach();
        let broken_session = scanner.attach();

        tokio::spawn(async move { healthy_session.serve(&mut healthy).await });
        let broken_task = tokio::spawn(async move { broken_session.serve(&mut broken).await });

        let result = tokio::time::timeout(Duration::from_secs(2), broken_task)
            .await
            .expect("the broken session should end")
            .unwrap();
        assert!(matches!(result, Err(SinkError::Closed)));

        assert_eq!(scanner.observer_count(), 1);
        let expected: String = sse_frame(&MachineInfo::new(MAC_A, IP_A)).unwrap();
        assert!(eventually(|| healthy_frames.lock().unwrap().contains(&expected)).await);
    }

    #[tokio::test]
    async fn channel_sink_notices_a_vanished_observer() {
        let network = MockNetwork::new();
        let scanner = scanner_on(&network);

        let (tx, rx) = mpsc::channel::<String>(8);
        let mut sink = ChannelSink::new(tx);
        let session = scanner.attach();
        let task = tokio::spawn(async move { session.serve(&mut sink).await });

        assert!(eventually(|| scanner.windows_completed() >= 1).await);
        drop(rx);

        let result = tokio::time::timeout(Duration::from_secs(2), task)
            .await
            .expect("the session should end once the receiver is gone")
            .unwrap();
        assert!(matches!(result, Err(SinkError::Closed)));
        assert_eq!(scanner.observer_count(), 0);
    }
}
