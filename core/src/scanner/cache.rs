// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use std::collections::HashMap;

use lanwake_common::models::machine::MachineInfo;

/// Every host a scanner has heard from, keyed by hardware address.
///
/// Replies are never merged: the latest one for a MAC replaces the entry.
#[derive(Debug, Clone, Default)]
pub struct ScanCache {
    entries: HashMap<String, MachineInfo>,
}

impl ScanCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `machine`, returning the entry it replaced.
    pub fn upsert(&mut self, machine: MachineInfo) -> Option<MachineInfo> {
        self.entries.insert(machine.key(), machine)
    }

    pub fn get(&self, mac: &str) -> Option<&MachineInfo> {
        self.entries.get(mac)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copies the current entries out, in no particular order.
    pub fn snapshot(&self) -> Vec<MachineInfo> {
        self.entries.values().copied().collect()
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
