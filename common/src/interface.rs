// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Resolution of a network interface name into everything an ARP scanner needs:
//! the subnet to probe, the broadcast address and the local sender identity.

use std::net::Ipv4Addr;

use pnet::datalink::{self, NetworkInterface};
use pnet::ipnetwork::{IpNetwork, Ipv4Network};
use pnet::util::MacAddr;

use crate::error::ScanError;
use crate::{debug, warn};

/// Above this many probe targets per window the subnet is bigger than a /24.
const LARGE_SUBNET_HOSTS: usize = 255;

/// Lazy sequence over the host addresses of an IPv4 subnet.
///
/// For network address `P` and mask `M` this yields `P | host` for every
/// `host` in `0 .. !M`. The network address itself is part of the sequence,
/// the broadcast address never is, so a /L subnet yields `2^(32-L) - 1`
/// addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubnetHosts {
    network: u32,
    next: u32,
    end: u32,
}

impl SubnetHosts {
    pub fn new(network: Ipv4Network) -> Self {
        Self {
            network: u32::from(network.network()),
            next: 0,
            end: !u32::from(network.mask()),
        }
    }
}

impl Iterator for SubnetHosts {
    type Item = Ipv4Addr;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let addr = Ipv4Addr::from(self.network | self.next);
        self.next += 1;
        Some(addr)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.end - self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SubnetHosts {}

/// Network address with every host bit set, computed octet by octet.
pub fn broadcast_address(network: Ipv4Network) -> Ipv4Addr {
    let addr: [u8; 4] = network.network().octets();
    let mask: [u8; 4] = network.mask().octets();
    Ipv4Addr::from(std::array::from_fn::<u8, 4, _>(|i| addr[i] | !mask[i]))
}

/// Everything a scanner knows about its interface. Never changes after resolution.
#[derive(Debug, Clone)]
pub struct InterfaceInfo {
    name: String,
    interface: NetworkInterface,
    network: Ipv4Network,
    local_mac: MacAddr,
    broadcast: Ipv4Addr,
    addresses: SubnetHosts,
}

impl InterfaceInfo {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn interface(&self) -> &NetworkInterface {
        &self.interface
    }

    /// The first IPv4 network configured on the interface.
    pub fn network(&self) -> Ipv4Network {
        self.network
    }

    /// Our own address on the subnet, used as the ARP sender address.
    pub fn local_ip(&self) -> Ipv4Addr {
        self.network.ip()
    }

    pub fn local_mac(&self) -> MacAddr {
        self.local_mac
    }

    pub fn broadcast(&self) -> Ipv4Addr {
        self.broadcast
    }

    /// Probe targets in enumeration order. Cheap to call repeatedly.
    pub fn addresses(&self) -> SubnetHosts {
        self.addresses
    }

    pub fn host_count(&self) -> usize {
        self.addresses.len()
    }
}

/// Resolves `name` against the interfaces currently present on the host.
pub fn resolve(name: &str) -> Result<InterfaceInfo, ScanError> {
    resolve_from(&datalink::interfaces(), name)
}

/// Resolves `name` against an explicit list of interfaces.
///
/// When the interface carries several IPv4 networks the first one wins.
pub fn resolve_from(interfaces: &[NetworkInterface], name: &str) -> Result<InterfaceInfo, ScanError> {
    let interface: &NetworkInterface = interfaces
        .iter()
        .find(|intf| intf.name == name)
        .ok_or_else(|| ScanError::InterfaceNotFound(name.to_string()))?;

    // Loopback reports an all-zero MAC on Linux rather than none at all.
    let local_mac: MacAddr = interface
        .mac
        .filter(|mac| *mac != MacAddr::zero())
        .ok_or_else(|| ScanError::NoHardwareAddress(name.to_string()))?;

    let network: Ipv4Network = interface
        .get_ipv4_nets()
        .into_iter()
        .next()
        .ok_or_else(|| ScanError::NoIPv4Address(name.to_string()))?;

    let addresses = SubnetHosts::new(network);
    if addresses.len() > LARGE_SUBNET_HOSTS {
        warn!(
            "{name} is on {network}, every window will probe {} addresses",
            addresses.len()
        );
    }

    debug!(
        verbosity = 1,
        "Resolved {name} to {network} ({} targets, broadcast {})",
        addresses.len(),
        broadcast_address(network)
    );

    Ok(InterfaceInfo {
        name: name.to_string(),
        interface: interface.clone(),
        network,
        local_mac,
        broadcast: broadcast_address(network),
        addresses,
    })
}

/// Lists every interface on the host together with the outcome of resolving it.
pub fn describe_interfaces() -> Vec<(NetworkInterface, Result<InterfaceInfo, ScanError>)> {
    let interfaces: Vec<NetworkInterface> = datalink::interfaces();
    interfaces
        .iter()
        .map(|intf| (intf.clone(), resolve_from(&interfaces, &intf.name)))
        .collect()
}

pub trait NetworkInterfaceExtension {
    fn get_ipv4_nets(&self) -> Vec<Ipv4Network>;
}

impl NetworkInterfaceExtension for NetworkInterface {
    fn get_ipv4_nets(&self) -> Vec<Ipv4Network> {
        self.ips
            .iter()
            .filter_map(|ip| match ip {
                IpNetwork::V4(ipv4) => Some(*ipv4),
                IpNetwork::V6(_) => None,
            })
            .collect()
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
