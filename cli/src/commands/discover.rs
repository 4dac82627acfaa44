// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Watches one interface from the terminal.
//!
//! The terminal is just another observer: it attaches a session to the
//! scanner and reads the same `found` events an HTTP client would get.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use colored::*;
use lanwake_common::config::ScannerConfig;
use lanwake_common::models::machine::MachineInfo;
use lanwake_common::{debug, info};
use lanwake_core::registry::ScannerRegistry;
use lanwake_core::scanner::Scanner;
use lanwake_core::stream::{EventSink, SinkError};
use tracing::info_span;

use crate::terminal::colors;
use crate::terminal::print::Print;
use crate::terminal::spinner::SpinnerGuard;

pub async fn discover(iface: &str, scanner_cfg: ScannerConfig) -> anyhow::Result<()> {
    Print::header("host discovery");

    let registry = Arc::new(ScannerRegistry::with_config(scanner_cfg));
    let scanner: Arc<Scanner> = lookup_scanner(registry, iface).await?;
    info!(
        "Watching {} ({}), press Ctrl+C to stop",
        iface,
        scanner.interface().network()
    );

    let _guard: SpinnerGuard = run_spinner(Arc::clone(&scanner));
    let started: Instant = Instant::now();
    let mut sink = TerminalSink::default();

    let session = scanner.attach();
    tokio::select! {
        result = session.serve(&mut sink) => {
            if let Err(e) = result {
                debug!(verbosity = 1, "Terminal session ended: {e}");
            }
        }
        signal = tokio::signal::ctrl_c() => signal?,
    }

    Print::watch_summary(sink.seen.len(), started.elapsed());
    Ok(())
}

/// Resolving the interface and opening the raw socket both block.
async fn lookup_scanner(
    registry: Arc<ScannerRegistry>,
    iface: &str,
) -> anyhow::Result<Arc<Scanner>> {
    let iface: String = iface.to_string();
    let scanner = tokio::task::spawn_blocking(move || registry.get_or_create(&iface)).await??;
    Ok(scanner)
}

fn run_spinner(scanner: Arc<Scanner>) -> SpinnerGuard {
    let span = info_span!("discover", indicatif.pb_show = true);
    let _enter = span.enter();

    SpinnerGuard::with_status(span.clone(), move || {
        let count: usize = scanner.cached_hosts().len();
        let label: &str = if count == 1 { "host" } else { "hosts" };
        let window: Duration = scanner.config().probe_window;
        format!(
            "{} {label} so far, window {} of {}s...",
            count.to_string().green().bold(),
            scanner.windows_completed() + 1,
            window.as_secs()
        )
        .color(colors::TEXT_DEFAULT)
        .italic()
    })
}

/// Decodes `found` frames and prints each host the first time it is seen.
#[derive(Default)]
struct TerminalSink {
    seen: HashSet<MachineInfo>,
}

#[async_trait]
impl EventSink for TerminalSink {
    async fn send_frame(&mut self, frame: String) -> Result<(), SinkError> {
        let Some(machine) = decode_frame(&frame)? else {
            return Ok(());
        };
        if self.seen.insert(machine) {
            Print::host(self.seen.len() - 1, &machine);
        }
        Ok(())
    }
}

fn decode_frame(frame: &str) -> Result<Option<MachineInfo>, serde_json::Error> {
    frame
        .lines()
        .find_map(|line| line.strip_prefix("data: "))
        .map(serde_json::from_str)
        .transpose()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
