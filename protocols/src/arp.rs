// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use crate::ethernet;
use crate::utils::{ARP_LEN, MIN_ETH_FRAME_NO_FCS};
use anyhow::Context;
use pnet::datalink::MacAddr;
use pnet::packet::Packet;
use pnet::packet::arp::{ArpHardwareTypes, ArpOperations, ArpPacket, MutableArpPacket};
use pnet::packet::ethernet::{EtherTypes, EthernetPacket};
use std::net::Ipv4Addr;

/// Sender fields of an ARP reply: who answered and for which address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArpReply {
    pub sender_mac: MacAddr,
    pub sender_ip: Ipv4Addr,
}

/// Builds a broadcast "who-has `dst_addr`" frame, padded to the minimum Ethernet size.
pub fn create_request(
    src_mac: MacAddr,
    src_addr: Ipv4Addr,
    dst_addr: Ipv4Addr,
) -> anyhow::Result<Vec<u8>> {
    let eth_header = ethernet::make_header(src_mac, MacAddr::broadcast(), EtherTypes::Arp)?;

    let mut arp_buffer: [u8; ARP_LEN] = [0u8; ARP_LEN];
    {
        let mut arp_packet: MutableArpPacket = MutableArpPacket::new(&mut arp_buffer)
            .context("failed to create mutable ARP packet")?;
        arp_packet.set_hardware_type(ArpHardwareTypes::Ethernet);
        arp_packet.set_protocol_type(EtherTypes::Ipv4);
        arp_packet.set_hw_addr_len(6);
        arp_packet.set_proto_addr_len(4);
        arp_packet.set_operation(ArpOperations::Request);
        arp_packet.set_sender_hw_addr(src_mac);
        arp_packet.set_target_hw_addr(MacAddr::zero());
        arp_packet.set_sender_proto_addr(src_addr);
        arp_packet.set_target_proto_addr(dst_addr);
    }

    let mut final_packet: Vec<u8> = Vec::with_capacity(MIN_ETH_FRAME_NO_FCS);
    final_packet.extend_from_slice(&eth_header);
    final_packet.extend_from_slice(&arp_buffer);
    final_packet.resize(MIN_ETH_FRAME_NO_FCS, 0u8);

    Ok(final_packet)
}

/// Extracts the sender of an ARP reply.
///
/// Frames that are not ARP, and ARP frames that are not replies, yield `None`.
/// An ARP frame too short to hold a full packet is an error.
pub fn parse_reply(frame: &[u8]) -> anyhow::Result<Option<ArpReply>> {
    let eth_packet: EthernetPacket = ethernet::get_packet_from_u8(frame)?;
    if eth_packet.get_ethertype() != EtherTypes::Arp {
        return Ok(None);
    }

    let payload: &[u8] = eth_packet.payload();
    anyhow::ensure!(
        payload.len() >= ARP_LEN,
        "truncated or invalid ARP packet (payload len {})",
        payload.len()
    );
    let arp_packet: ArpPacket = ArpPacket::new(payload).context("failed to parse ARP packet")?;

    if arp_packet.get_operation() != ArpOperations::Reply {
        return Ok(None);
    }

    Ok(Some(ArpReply {
        sender_mac: arp_packet.get_sender_hw_addr(),
        sender_ip: arp_packet.get_sender_proto_addr(),
    }))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
