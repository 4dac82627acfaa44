// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

// Data Link Layer
pub const ARP_LEN: usize = 28;
pub const ETH_HDR_LEN: usize = 14;
pub const MIN_ETH_FRAME_NO_FCS: usize = 60;
// Wake-on-LAN
pub const WOL_SYNC_LEN: usize = 6;
pub const WOL_MAC_REPEAT: usize = 16;
pub const WOL_PACKET_LEN: usize = WOL_SYNC_LEN + WOL_MAC_REPEAT * 6;
pub const WOL_PORT: u16 = 9;
