// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use std::net::Ipv4Addr;

use colored::*;
use lanwake_common::utils::{mac, redact};
use pnet::ipnetwork::{IpNetwork, Ipv4Network};
use pnet::util::MacAddr;

use crate::terminal::colors;

pub type Detail = (String, ColoredString);

pub fn mac_str(mac: &MacAddr, redacted: bool) -> String {
    if redacted {
        redact::mac_addr(mac)
    } else {
        mac.to_string()
    }
}

pub fn ipv4_str(ip: &Ipv4Addr, redacted: bool) -> String {
    if redacted {
        redact::ipv4_addr(ip)
    } else {
        ip.to_string()
    }
}

pub fn mac_to_detail(mac: &MacAddr, redacted: bool) -> Detail {
    let value: ColoredString = mac_str(mac, redacted).color(colors::MAC_ADDR);
    if mac::is_locally_administered(*mac) {
        let note: ColoredString = "(random)".color(colors::SEPARATOR);
        return ("MAC".to_string(), format!("{value} {note}").normal());
    }
    ("MAC".to_string(), value)
}

pub fn vendor_to_detail(mac: &MacAddr) -> Option<Detail> {
    mac::get_vendor(*mac).map(|vendor| ("Vendor".to_string(), vendor.color(colors::MAC_ADDR)))
}

pub fn ipv4_net_to_detail(network: &Ipv4Network) -> Detail {
    let address: ColoredString = network.ip().to_string().color(colors::IPV4_ADDR);
    let prefix: ColoredString = network.prefix().to_string().color(colors::IPV4_PREFIX);
    (
        "IPv4".to_string(),
        format!("{address}/{prefix}").color(colors::SEPARATOR),
    )
}

/// IPv4 networks only; ARP has nothing to say about IPv6.
pub fn ip_nets_to_details(ips: &[IpNetwork]) -> Vec<Detail> {
    ips.iter()
        .filter_map(|ip| match ip {
            IpNetwork::V4(network) => Some(ipv4_net_to_detail(network)),
            IpNetwork::V6(_) => None,
        })
        .collect()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
