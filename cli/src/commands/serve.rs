// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use std::future::IntoFuture;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use anyhow::Context;
use is_root::is_root;
use lanwake_common::config::ScannerConfig;
use lanwake_common::{info, success, warn};
use lanwake_core::registry::ScannerRegistry;
use tokio::net::TcpListener;

use crate::server::{self, AppState};
use crate::terminal::print::{self, Print};

pub async fn serve(
    port: u16,
    iface: Option<String>,
    scanner_cfg: ScannerConfig,
) -> anyhow::Result<()> {
    Print::header("wol backend");
    print::aligned_line("Port", port.to_string());
    print::aligned_line("Interface", iface.as_deref().unwrap_or("(unset)"));
    print::aligned_line("Window", format!("{}s", scanner_cfg.probe_window.as_secs()));

    match iface {
        None => warn!("IFACE is not set, /discover and /wake will fail until it is"),
        Some(_) if !is_root() => {
            warn!("Not running as root, opening the ARP channel will most likely fail")
        }
        Some(_) => {}
    }

    let registry = Arc::new(ScannerRegistry::with_config(scanner_cfg));
    let app = server::router(AppState::new(registry, iface));

    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    success!("Listening on {addr}");

    // Event streams never end on their own, so shutdown does not wait for them.
    tokio::select! {
        result = axum::serve(listener, app).into_future() => result.context("serving HTTP")?,
        _ = shutdown_signal() => info!("Shutting down"),
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Could not listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
}
