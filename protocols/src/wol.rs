// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Wake-on-LAN magic packet.

use pnet::datalink::MacAddr;

use crate::utils::{WOL_PACKET_LEN, WOL_SYNC_LEN};

/// Six `0xff` bytes followed by the target MAC repeated sixteen times.
pub fn create_magic_packet(mac: MacAddr) -> [u8; WOL_PACKET_LEN] {
    let mac_bytes: [u8; 6] = [mac.0, mac.1, mac.2, mac.3, mac.4, mac.5];
    let mut packet: [u8; WOL_PACKET_LEN] = [0xff; WOL_PACKET_LEN];
    for chunk in packet[WOL_SYNC_LEN..].chunks_exact_mut(mac_bytes.len()) {
        chunk.copy_from_slice(&mac_bytes);
    }
    packet
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
