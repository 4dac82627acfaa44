// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # Command Line Interface Definitions
//!
//! The argument schema for every command lives here; each command's
//! execution lives in its own submodule. `From<&CommandLine>` turns the
//! global flags into a [`Config`], and [`ScannerOptions`] into a
//! [`ScannerConfig`], so the core crates never see `clap` types.
//!
//! `PORT` and `IFACE` are read from the environment when the flags are
//! omitted, which is how container deployments configure the server.

pub mod discover;
pub mod info;
pub mod serve;
pub mod wake;

use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand};
use lanwake_common::config::{Config, DEFAULT_OBSERVER_QUEUE, ScannerConfig};
use pnet::util::MacAddr;

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Parser)]
#[command(name = "lanwake")]
#[command(about = "Finds machines on the local link and wakes them up.")]
#[command(version)]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Keep logs and colors but hide the banner
    #[arg(long = "no-banner", global = true)]
    pub no_banner: bool,

    /// Reduce UI visual density (-q: one line per host, -qq: raw `mac ip` pairs)
    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Mask the device half of MAC addresses and the host part of IPs in the terminal
    #[arg(long = "redact", global = true)]
    pub redact: bool,

    /// Increase logging detail (-v: debug logs, -vv: per packet logs)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbosity: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP backend (`/`, `/discover`, `/wake`)
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short = 'p', long, env = "PORT", default_value_t = DEFAULT_PORT)]
        port: u16,

        /// Interface to scan and wake through
        #[arg(short = 'i', long, env = "IFACE")]
        iface: Option<String>,

        #[command(flatten)]
        scanner: ScannerOptions,
    },

    /// Watch an interface and print machines as they answer
    #[command(alias = "d")]
    Discover {
        /// Interface to scan
        #[arg(short = 'i', long, env = "IFACE")]
        iface: String,

        #[command(flatten)]
        scanner: ScannerOptions,
    },

    /// Send a Wake-on-LAN magic packet
    #[command(alias = "w")]
    Wake {
        /// Hardware address of the machine to wake
        #[arg(value_name = "MAC")]
        mac: MacAddr,

        /// Interface whose broadcast address receives the packet
        #[arg(short = 'i', long, env = "IFACE")]
        iface: String,
    },

    /// Display local network interfaces and whether they can be scanned
    #[command(alias = "i")]
    Info,
}

#[derive(Args, Debug, Clone, Copy)]
pub struct ScannerOptions {
    /// Seconds spent collecting replies after each round of requests
    #[arg(long = "window", value_name = "SECS", default_value_t = 10)]
    pub window_secs: u64,

    /// Live events buffered per observer before new ones are dropped
    #[arg(long = "queue", value_name = "N", default_value_t = DEFAULT_OBSERVER_QUEUE)]
    pub queue: usize,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl From<&CommandLine> for Config {
    fn from(cmd: &CommandLine) -> Self {
        Self {
            no_banner: cmd.no_banner,
            redact: cmd.redact,
            quiet: cmd.quiet,
        }
    }
}

impl From<ScannerOptions> for ScannerConfig {
    fn from(opts: ScannerOptions) -> Self {
        ScannerConfig::default()
            .with_probe_window(Duration::from_secs(opts.window_secs.max(1)))
            .with_observer_queue(opts.queue)
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
