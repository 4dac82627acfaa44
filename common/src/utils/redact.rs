// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Privacy-preserving rendering of scan results for screenshots and shared logs.

use std::net::Ipv4Addr;

use pnet::util::MacAddr;

/// Keeps the vendor half of a MAC and masks the device half.
///
/// # Examples
/// ```
/// use pnet::util::MacAddr;
/// use lanwake_common::utils::redact;
///
/// let mac = MacAddr::new(0x2c, 0xcf, 0x67, 0xf2, 0x51, 0xe3);
/// assert_eq!(redact::mac_addr(&mac), "2c:cf:67:XX:XX:XX");
/// ```
pub fn mac_addr(mac: &MacAddr) -> String {
    format!("{:02x}:{:02x}:{:02x}:XX:XX:XX", mac.0, mac.1, mac.2)
}

/// Masks the last octet of an address.
///
/// # Examples
/// ```
/// use std::net::Ipv4Addr;
/// use lanwake_common::utils::redact;
///
/// assert_eq!(redact::ipv4_addr(&Ipv4Addr::new(192, 168, 1, 42)), "192.168.1.X");
/// ```
pub fn ipv4_addr(ip: &Ipv4Addr) -> String {
    let [a, b, c, _] = ip.octets();
    format!("{a}.{b}.{c}.X")
}
