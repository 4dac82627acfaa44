// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Wire formats spoken by lanwake: ARP over Ethernet for discovery and the
//! Wake-on-LAN magic packet for waking hosts up.

pub mod arp;
pub mod ethernet;
pub mod utils;
pub mod wol;
