// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # Machine Model
//!
//! A [`MachineInfo`] is one host that answered an ARP request: its hardware
//! address and the IPv4 address it claimed in the reply.
//!
//! On the wire it is always `{"mac":"xx:xx:xx:xx:xx:xx","ip":"a.b.c.d"}` with a
//! lowercase, colon separated MAC. Clients post the same shape back to request
//! a wake-up, where the `ip` field is optional.

use std::net::Ipv4Addr;
use std::str::FromStr;

use pnet::util::MacAddr;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MachineInfo {
    #[serde(with = "mac_string")]
    pub mac: MacAddr,
    pub ip: Ipv4Addr,
}

impl MachineInfo {
    pub fn new(mac: MacAddr, ip: Ipv4Addr) -> Self {
        Self { mac, ip }
    }

    /// Canonical cache key: lowercase colon-hex.
    pub fn key(&self) -> String {
        self.mac.to_string()
    }
}

/// Body of a wake-up request. Only the MAC matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct WakeTarget {
    #[serde(with = "mac_string")]
    pub mac: MacAddr,
    #[serde(default)]
    pub ip: Option<Ipv4Addr>,
}

mod mac_string {
    use super::*;
    use serde::{Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(mac: &MacAddr, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(mac)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<MacAddr, D::Error> {
        let raw: String = String::deserialize(deserializer)?;
        MacAddr::from_str(raw.trim()).map_err(|e| de::Error::custom(format!("invalid MAC '{raw}': {e}")))
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
