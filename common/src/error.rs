// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Reasons a scanner can not be brought up for an interface.
///
/// All of these are fatal to the scanner's creation and end up as a
/// request-level error for whoever asked for it.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("no network interface named '{0}'")]
    InterfaceNotFound(String),

    /// ARP is meaningless on links without a hardware address (e.g. loopback, tun).
    #[error("interface '{0}' does not have a MAC address")]
    NoHardwareAddress(String),

    #[error("no IPv4 addresses could be found on '{0}'")]
    NoIPv4Address(String),

    #[error("failed to open an ARP channel on '{interface}': {source}")]
    ProbeDialFailed {
        interface: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to start the probing worker for '{interface}': {source}")]
    WorkerSpawnFailed {
        interface: String,
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    pub fn dial_failed(interface: &str, source: impl Into<anyhow::Error>) -> Self {
        Self::ProbeDialFailed {
            interface: interface.to_string(),
            source: source.into(),
        }
    }

    /// True for errors caused by the interface name itself rather than the host.
    pub fn is_resolution_error(&self) -> bool {
        matches!(
            self,
            Self::InterfaceNotFound(_) | Self::NoHardwareAddress(_) | Self::NoIPv4Address(_)
        )
    }
}
