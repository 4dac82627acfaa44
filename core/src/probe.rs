// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! The link capability a scanner probes through.
//!
//! [`ArpProbe`] is small: fire a request, block for the next
//! reply. [`PnetArpProbe`] implements it on top of a raw `pnet` datalink
//! channel and requires **root privileges** (or `CAP_NET_RAW`).

use std::io;
use std::net::Ipv4Addr;
use std::time::Instant;

use anyhow::{Context, bail};
use lanwake_common::{debug, error::ScanError, interface::InterfaceInfo};
use lanwake_protocols::arp::{self, ArpReply};
use pnet::datalink::{DataLinkReceiver, DataLinkSender};
use pnet::util::MacAddr;
use thiserror::Error;

use crate::network::channel;

#[derive(Debug, Error)]
pub enum ProbeError {
    /// The deadline passed without another reply. Ends a probing window normally.
    #[error("no ARP reply before the deadline")]
    Timeout,

    #[error("failed to read from the link: {0}")]
    Read(#[from] io::Error),
}

pub trait ArpProbe: Send {
    /// Broadcasts a request for `target`. Fire-and-forget.
    fn request(&mut self, target: Ipv4Addr) -> anyhow::Result<()>;

    /// Blocks until the next ARP reply arrives or `deadline` passes.
    fn read_reply(&mut self, deadline: Instant) -> Result<ArpReply, ProbeError>;
}

impl<P: ArpProbe + ?Sized> ArpProbe for Box<P> {
    fn request(&mut self, target: Ipv4Addr) -> anyhow::Result<()> {
        (**self).request(target)
    }

    fn read_reply(&mut self, deadline: Instant) -> Result<ArpReply, ProbeError> {
        (**self).read_reply(deadline)
    }
}

pub struct PnetArpProbe {
    local_mac: MacAddr,
    local_ip: Ipv4Addr,
    tx: Box<dyn DataLinkSender>,
    rx: Box<dyn DataLinkReceiver>,
}

impl PnetArpProbe {
    /// Opens a raw channel on the resolved interface.
    pub fn dial(info: &InterfaceInfo) -> Result<Self, ScanError> {
        let (tx, rx) = channel::open_arp_channel(info.interface())
            .map_err(|e| ScanError::dial_failed(info.name(), e))?;
        Ok(Self::from_channel(info.local_mac(), info.local_ip(), tx, rx))
    }

    pub fn from_channel(
        local_mac: MacAddr,
        local_ip: Ipv4Addr,
        tx: Box<dyn DataLinkSender>,
        rx: Box<dyn DataLinkReceiver>,
    ) -> Self {
        Self {
            local_mac,
            local_ip,
            tx,
            rx,
        }
    }
}

impl ArpProbe for PnetArpProbe {
    fn request(&mut self, target: Ipv4Addr) -> anyhow::Result<()> {
        let packet: Vec<u8> = arp::create_request(self.local_mac, self.local_ip, target)?;
        match self.tx.send_to(&packet, None) {
            Some(result) => result.with_context(|| format!("sending ARP request for {target}")),
            None => bail!("link refused the ARP request for {target}"),
        }
    }

    fn read_reply(&mut self, deadline: Instant) -> Result<ArpReply, ProbeError> {
        while Instant::now() < deadline {
            let frame: &[u8] = match self.rx.next() {
                Ok(frame) => frame,
                Err(e) if is_read_timeout(&e) => continue,
                Err(e) => return Err(ProbeError::Read(e)),
            };

            match arp::parse_reply(frame) {
                // Our own replies to other hosts' requests show up on the wire too.
                Ok(Some(reply)) if reply.sender_mac != self.local_mac => return Ok(reply),
                Ok(_) => {}
                Err(e) => debug!(verbosity = 2, "Dropping malformed frame: {e}"),
            }
        }

        Err(ProbeError::Timeout)
    }
}

fn is_read_timeout(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
    )
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
    use pnet::datalink::NetworkInterface;
    use pnet::packet::Packet;
    use pnet::packet::arp::{ArpHardwareTypes, ArpOperation, ArpOperations, MutableArpPacket};
    use pnet::packet::ethernet::{EtherTypes, EthernetPacket, MutableEthernetPacket};
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    const LOCAL_MAC: MacAddr = MacAddr(0x02, 0, 0, 0, 0, 0x01);
    const LOCAL_IP: Ipv4Addr = Ipv4Addr::new(192, 168, 1, 10);

    struct RecordingSender {
        sent: Arc<Mutex<Vec<Vec<u8>>>>,
    }

    impl DataLinkSender for RecordingSender {
        fn build_and_send(
            &mut self,
            _num_packets: usize,
            _packet_size: usize,
            _func: &mut dyn FnMut(&mut [u8]),
        ) -> Option<io::Result<()>> {
            None
        }

        fn send_to(
            &mut self,
            packet: &[u8],
            _dst: Option<NetworkInterface>,
        ) -> Option<io::Result<()>> {
            self.sent.lock().unwrap().push(packet.to_vec());
            Some(Ok(()))
        }
    }

    struct ScriptedReceiver {
        frames: VecDeque<io::Result<Vec<u8>>>,
        current: Vec<u8>,
    }

    impl DataLinkReceiver for ScriptedReceiver {
        fn next(&mut self) -> io::Result<&[u8]> {
            match self.frames.pop_front() {
                Some(Ok(frame)) => {
                    self.current = frame;
                    Ok(&self.current)
                }
                Some(Err(e)) => Err(e),
                None => {
                    std::thread::sleep(Duration::from_millis(1));
                    Err(io::Error::new(io::ErrorKind::TimedOut, "Timed out"))
                }
            }
        }
    }

    fn arp_frame(operation: ArpOperation, sender_mac: MacAddr, sender_ip: Ipv4Addr) -> Vec<u8> {
        let mut buffer = vec![0u8; 42];
        {
            let mut eth = MutableEthernetPacket::new(&mut buffer).unwrap();
            eth.set_source(sender_mac);
            eth.set_destination(LOCAL_MAC);
            eth.set_ethertype(EtherTypes::Arp);
        }
        {
            let mut arp_pkt = MutableArpPacket::new(&mut buffer[14..]).unwrap();
            arp_pkt.set_hardware_type(ArpHardwareTypes::Ethernet);
            arp_pkt.set_protocol_type(EtherTypes::Ipv4);
            arp_pkt.set_hw_addr_len(6);
            arp_pkt.set_proto_addr_len(4);
            arp_pkt.set_operation(operation);
            arp_pkt.set_sender_hw_addr(sender_mac);
            arp_pkt.set_sender_proto_addr(sender_ip);
            arp_pkt.set_target_hw_addr(LOCAL_MAC);
            arp_pkt.set_target_proto_addr(LOCAL_IP);
        }
        buffer
    }

    fn probe_with(frames: Vec<io::Result<Vec<u8>>>) -> (PnetArpProbe, Arc<Mutex<Vec<Vec<u8>>>>) {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let tx = Box::new(RecordingSender { sent: sent.clone() });
        let rx = Box::new(ScriptedReceiver {
            frames: frames.into(),
            current: Vec::new(),
        });
        (PnetArpProbe::from_channel(LOCAL_MAC, LOCAL_IP, tx, rx), sent)
    }

    #[test]
    fn request_sends_broadcast_who_has() {
        let (mut probe, sent) = probe_with(vec![]);
        probe.request(Ipv4Addr::new(192, 168, 1, 20)).unwrap();

        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        let eth = EthernetPacket::new(&sent[0]).unwrap();
        assert_eq!(eth.get_destination(), MacAddr::broadcast());
        let arp_pkt = pnet::packet::arp::ArpPacket::new(eth.payload()).unwrap();
        assert_eq!(arp_pkt.get_target_proto_addr(), Ipv4Addr::new(192, 168, 1, 20));
        assert_eq!(arp_pkt.get_sender_proto_addr(), LOCAL_IP);
    }

    #[test]
    fn read_reply_skips_noise_until_a_foreign_reply() {
        let peer_mac = MacAddr::new(0xaa, 0xbb, 0xcc, 0x00, 0x00, 0x01);
        let peer_ip = Ipv4Addr::new(192, 168, 1, 20);
        let (mut probe, _) = probe_with(vec![
            Err(io::Error::new(io::ErrorKind::TimedOut, "Timed out")),
            Ok(arp_frame(ArpOperations::Request, peer_mac, peer_ip)),
            Ok(arp_frame(ArpOperations::Reply, LOCAL_MAC, LOCAL_IP)),
            Ok(vec![0u8; 4]),
            Ok(arp_frame(ArpOperations::Reply, peer_mac, peer_ip)),
        ]);

        let reply = probe
            .read_reply(Instant::now() + Duration::from_secs(1))
            .expect("the foreign reply should be returned");

        assert_eq!(reply.sender_mac, peer_mac);
        assert_eq!(reply.sender_ip, peer_ip);
    }

    #[test]
    fn read_reply_times_out_at_deadline() {
        let (mut probe, _) = probe_with(vec![]);
        let started = Instant::now();
        let result = probe.read_reply(started + Duration::from_millis(20));

        assert!(matches!(result, Err(ProbeError::Timeout)));
        assert!(started.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn read_reply_surfaces_link_errors() {
        let (mut probe, _) = probe_with(vec![Err(io::Error::new(
            io::ErrorKind::BrokenPipe,
            "link went away",
        ))]);
        let result = probe.read_reply(Instant::now() + Duration::from_secs(1));
        assert!(matches!(result, Err(ProbeError::Read(_))));
    }
}
