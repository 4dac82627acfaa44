// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # Terminal UI & Logging
//!
//! Wires the `tracing` subscriber so that `info!`, `warn!`, etc. print cleanly
//! to stderr without breaking the progress bar, and runs the spinner shown
//! while `discover` is watching an interface.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use colored::*;
use indicatif::ProgressStyle;
use tracing::Span;
use tracing_indicatif::{IndicatifLayer, span_ext::IndicatifSpanExt};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::terminal::logging;

const TICK_STRINGS: &[&str] = &[
    "▁▁▁▁▁", "▁▂▂▂▁", "▁▄▂▄▁", "▂▄▆▄▂", "▄▆█▆▄", "▂▄▆▄▂", "▁▄▂▄▁", "▁▂▂▂▁",
];

/// Installs the global subscriber.
///
/// The layer stack is: an `EnvFilter` (`RUST_LOG`, or a default derived from
/// `-v`), the `LanwakeFormatter`, and an indicatif layer that keeps log lines
/// above the spinner.
pub fn init_logging(verbosity: u8, quiet: u8) {
    let style = ProgressStyle::with_template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(TICK_STRINGS);
    let indicatif_layer = IndicatifLayer::new().with_progress_style(style);

    let default_filter: &str = if verbosity > 0 {
        "info,lanwake=debug,lanwake_core=debug,lanwake_common=debug,mio=error"
    } else {
        "info,mio=error"
    };
    let filter_layer =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let formatting_layer = tracing_subscriber::fmt::layer()
        .event_format(logging::LanwakeFormatter {
            max_verbosity: verbosity,
            raw_only: quiet >= 2,
        })
        .with_writer(indicatif_layer.get_stderr_writer());

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(formatting_layer)
        .with(indicatif_layer)
        .init();
}

async fn run_spinner_loop<F>(span: Span, running: Arc<AtomicBool>, status_fn: F)
where
    F: Fn() -> ColoredString + Send + Sync + 'static,
{
    let mut interval = tokio::time::interval(Duration::from_millis(100));
    let mut last_text = String::new();

    while running.load(Ordering::Relaxed) {
        interval.tick().await;

        let current_text: String = status_fn().to_string();
        if current_text != last_text {
            span.pb_set_message(&current_text);
            last_text = current_text;
        }
    }
}

/// Keeps the spinner spinning until dropped.
pub struct SpinnerGuard {
    running: Arc<AtomicBool>,
    handle: tokio::task::JoinHandle<()>,
}

impl SpinnerGuard {
    pub fn with_status<F>(span: Span, status_fn: F) -> Self
    where
        F: Fn() -> ColoredString + Send + Sync + 'static,
    {
        let running = Arc::new(AtomicBool::new(true));
        let run_clone = Arc::clone(&running);

        let handle = tokio::spawn(async move {
            run_spinner_loop(span, run_clone, status_fn).await;
        });

        Self { running, handle }
    }
}

impl Drop for SpinnerGuard {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        self.handle.abort();
    }
}
