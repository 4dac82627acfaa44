// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use std::time::Duration;

/// Length of one probing window when nothing else is configured.
pub const DEFAULT_PROBE_WINDOW: Duration = Duration::from_secs(10);

/// Number of undelivered events buffered per observer before new ones are dropped.
pub const DEFAULT_OBSERVER_QUEUE: usize = 64;

/// Global presentation options for the terminal.
///
/// Built from the CLI flags; the core crates never look at it.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Skips the startup banner line.
    pub no_banner: bool,

    /// Masks the device specific half of MAC addresses in terminal output.
    ///
    /// Only affects what gets printed. The `/discover` event stream always
    /// carries full addresses since clients need them to send wake-ups.
    pub redact: bool,

    /// Controls the visual density of the terminal output.
    ///
    /// # Levels
    /// * **0** (Default): Headers, trees and colors.
    /// * **1**: One line per host.
    /// * **2**: Raw `mac ip` pairs, suitable for piping.
    pub quiet: u8,
}

/// Tunables for a single interface scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScannerConfig {
    /// How long the worker keeps reading replies after broadcasting the
    /// requests of one window.
    pub probe_window: Duration,

    /// Capacity of each observer's live delivery queue.
    ///
    /// Publishing never blocks the worker, so a slow observer whose queue is
    /// full simply misses the live event. It still gets the host on the next
    /// replay since the cache keeps everything.
    pub observer_queue: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            probe_window: DEFAULT_PROBE_WINDOW,
            observer_queue: DEFAULT_OBSERVER_QUEUE,
        }
    }
}

impl ScannerConfig {
    pub fn with_probe_window(mut self, probe_window: Duration) -> Self {
        self.probe_window = probe_window;
        self
    }

    pub fn with_observer_queue(mut self, observer_queue: usize) -> Self {
        self.observer_queue = observer_queue.max(1);
        self
    }
}
