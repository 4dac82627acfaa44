// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use lanwake_common::interface::InterfaceInfo;
use lanwake_common::models::machine::MachineInfo;
use lanwake_common::{debug, warn};

use crate::probe::{ArpProbe, ProbeError};
use crate::scanner::Shared;

/// Pause after a window that ended on a link error, so a dead link does
/// not turn the loop into a busy spin.
const READ_ERROR_BACKOFF: Duration = Duration::from_secs(1);

pub(super) struct Worker<P> {
    shared: Arc<Shared>,
    info: InterfaceInfo,
    probe: P,
    window: Duration,
}

impl<P: ArpProbe> Worker<P> {
    pub(super) fn new(shared: Arc<Shared>, info: InterfaceInfo, probe: P, window: Duration) -> Self {
        Self {
            shared,
            info,
            probe,
            window,
        }
    }

    /// Runs for the lifetime of the process.
    pub(super) fn run(mut self) {
        loop {
            self.shared.wait_for_observers();
            if !self.probe_window() {
                thread::sleep(READ_ERROR_BACKOFF);
            }
        }
    }

    /// Broadcasts one request per subnet address, then collects replies
    /// until the window closes. Returns false if a link error cut it short.
    fn probe_window(&mut self) -> bool {
        let name: &str = self.shared.interface();
        let mut sent: usize = 0;

        debug!(
            verbosity = 1,
            "Window on {name} opened: probing {} addresses",
            self.info.host_count()
        );
        for target in self.info.addresses() {
            match self.probe.request(target) {
                Ok(()) => sent += 1,
                Err(e) => debug!(verbosity = 2, "ARP request for {target} on {name} failed: {e:#}"),
            }
        }

        let deadline: Instant = Instant::now() + self.window;
        let mut replies: usize = 0;
        let mut clean: bool = true;

        loop {
            match self.probe.read_reply(deadline) {
                Ok(reply) => {
                    replies += 1;
                    self.shared
                        .publish(MachineInfo::new(reply.sender_mac, reply.sender_ip));
                }
                Err(ProbeError::Timeout) => break,
                Err(e) => {
                    warn!("Probing window on {name} cut short: {e}");
                    clean = false;
                    break;
                }
            }
        }

        self.shared.finish_window();
        debug!(
            verbosity = 1,
            "Window on {name} closed: {sent} requests sent, {replies} replies"
        );
        clean
    }
}
