// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Wake-on-LAN over UDP broadcast.

use std::net::{Ipv4Addr, SocketAddrV4};

use anyhow::Context;
use lanwake_common::debug;
use lanwake_protocols::utils::WOL_PORT;
use lanwake_protocols::wol;
use pnet::util::MacAddr;
use tokio::net::UdpSocket;

/// Sends a magic packet for `mac` to `broadcast` on the discard port.
pub async fn send_magic_packet(broadcast: Ipv4Addr, mac: MacAddr) -> anyhow::Result<()> {
    send_magic_packet_to(SocketAddrV4::new(broadcast, WOL_PORT), mac).await
}

pub(crate) async fn send_magic_packet_to(target: SocketAddrV4, mac: MacAddr) -> anyhow::Result<()> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))
        .await
        .context("binding the wake-up socket")?;
    socket
        .set_broadcast(true)
        .context("enabling broadcast on the wake-up socket")?;

    let packet = wol::create_magic_packet(mac);
    let sent: usize = socket
        .send_to(&packet, target)
        .await
        .with_context(|| format!("sending the magic packet to {target}"))?;

    debug!(verbosity = 1, "Sent {sent} byte magic packet for {mac} to {target}");
    Ok(())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
