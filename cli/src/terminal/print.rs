// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use std::fmt::Display;
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::bail;
use colored::*;
use lanwake_common::config::Config;
use lanwake_common::error::ScanError;
use lanwake_common::interface::InterfaceInfo;
use lanwake_common::models::machine::MachineInfo;
use lanwake_common::success;
use pnet::datalink::NetworkInterface;
use unicode_width::UnicodeWidthStr;

use crate::terminal::{colors, format};

pub const TOTAL_WIDTH: usize = 64;

/// Width of the key column in `aligned_line`.
const KEY_WIDTH: usize = 10;

static PRINT: OnceLock<Print> = OnceLock::new();

/// Prints a line verbatim, above the spinner and without a status symbol.
#[macro_export]
macro_rules! lprint {
    () => {
        $crate::lprint!("")
    };
    ($($arg:tt)*) => {
        tracing::info!(
            target: "lanwake::print",
            raw_msg = %format_args!($($arg)*)
        )
    };
}

pub trait WithDefaultColor {
    fn with_default(self, default_color: Color) -> ColoredString;
}

impl WithDefaultColor for &str {
    fn with_default(self, default_color: Color) -> ColoredString {
        self.color(default_color)
    }
}

impl WithDefaultColor for String {
    fn with_default(self, default_color: Color) -> ColoredString {
        self.color(default_color)
    }
}

impl WithDefaultColor for ColoredString {
    fn with_default(self, _default_color: Color) -> ColoredString {
        self
    }
}

#[derive(Default)]
pub struct Print {
    no_banner: bool,
    q_level: u8,
    redact: bool,
}

impl Print {
    fn new(cfg: &Config) -> Self {
        Self {
            no_banner: cfg.no_banner,
            q_level: cfg.quiet,
            redact: cfg.redact,
        }
    }

    pub fn init(cfg: &Config) -> anyhow::Result<()> {
        if PRINT.set(Self::new(cfg)).is_err() {
            bail!("terminal has already been initialized")
        }
        Ok(())
    }

    fn get() -> &'static Self {
        PRINT.get_or_init(Self::default)
    }

    pub fn banner() {
        let p = Self::get();
        if p.no_banner || p.q_level > 0 {
            return;
        }

        let text_content: String = format!("⟦ LANWAKE v{} ⟧", env!("CARGO_PKG_VERSION"));
        let text_width: usize = UnicodeWidthStr::width(text_content.as_str());
        let sep: ColoredString = "═"
            .repeat(TOTAL_WIDTH.saturating_sub(text_width) / 2)
            .bright_black();

        lprint!("{}{}{}", sep, text_content.bright_green().bold(), sep);
    }

    pub fn header(msg: &str) {
        let p = Self::get();
        if p.q_level > 0 {
            return;
        }

        let formatted: String = format!("⟦ {} ⟧", msg.to_uppercase());
        let dash_count: usize = TOTAL_WIDTH.saturating_sub(formatted.chars().count());
        let left: usize = dash_count / 2;
        let right: usize = dash_count - left;

        lprint!(
            "{}{}{}",
            "─".repeat(left).bright_black(),
            formatted.bright_green(),
            "─".repeat(right).bright_black()
        );
    }

    /// Prints one discovered host in the density picked with `-q`.
    pub fn host(idx: usize, machine: &MachineInfo) {
        let p = Self::get();
        let mac: String = format::mac_str(&machine.mac, p.redact);
        let ip: String = format::ipv4_str(&machine.ip, p.redact);

        match p.q_level {
            0 => {
                if idx > 0 {
                    lprint!();
                }
                tree_head(idx, &ip);
                let mut details: Vec<format::Detail> =
                    vec![format::mac_to_detail(&machine.mac, p.redact)];
                if let Some(vendor) = format::vendor_to_detail(&machine.mac) {
                    details.push(vendor);
                }
                as_tree(details);
            }
            1 => lprint!(
                "{} {:<15} {}",
                format!("[{}]", idx.to_string().color(colors::ACCENT)).color(colors::SEPARATOR),
                ip.color(colors::PRIMARY),
                mac.color(colors::MAC_ADDR)
            ),
            _ => lprint!("{mac} {ip}"),
        }
    }

    pub fn interface(idx: usize, intf: &NetworkInterface, resolved: &Result<InterfaceInfo, ScanError>) {
        let p = Self::get();
        if p.q_level >= 2 {
            if resolved.is_ok() {
                lprint!("{}", intf.name);
            }
            return;
        }

        if idx > 0 {
            lprint!();
        }
        tree_head(idx, &intf.name);

        let mut details: Vec<format::Detail> = format::ip_nets_to_details(&intf.ips);
        if let Some(mac) = intf.mac {
            details.push(format::mac_to_detail(&mac, p.redact));
        }

        let status: ColoredString = match resolved {
            Ok(info) => format!("scannable, {} targets", info.host_count()).green(),
            Err(e) => e.to_string().yellow(),
        };
        details.push(("ARP".to_string(), status));
        as_tree(details);
    }

    pub fn watch_summary(hosts_len: usize, elapsed: Duration) {
        let p = Self::get();
        let active_hosts: ColoredString = format!("{hosts_len} hosts").bold().green();
        let elapsed: ColoredString = format!("{:.0}s", elapsed.as_secs_f64()).bold().yellow();
        let output: ColoredString =
            format!("Discovery stopped: {active_hosts} seen in {elapsed}").color(colors::TEXT_DEFAULT);

        match p.q_level {
            0 => {
                divider();
                centerln(&output.to_string());
            }
            1 => success!("{output}"),
            _ => {}
        }
    }

    pub fn end_of_program() {
        let p = Self::get();
        if p.q_level > 0 {
            return;
        }
        divider();
    }
}

pub fn divider() {
    lprint!("{}", "═".repeat(TOTAL_WIDTH).color(colors::SEPARATOR));
}

pub fn aligned_line<V>(key: &str, value: V)
where
    V: Display + WithDefaultColor,
{
    let dots: String = ".".repeat((KEY_WIDTH + 1).saturating_sub(key.len()));
    let colon: String = format!(
        "{}{}",
        dots.color(colors::SEPARATOR),
        ":".color(colors::SEPARATOR)
    );
    let value: ColoredString = value.with_default(colors::TEXT_DEFAULT);
    lprint!(
        "{} {}{} {}",
        ">".color(colors::SEPARATOR),
        key.color(colors::PRIMARY),
        colon,
        value
    );
}

pub fn tree_head(idx: usize, name: &str) {
    let idx_str: String = format!("[{}]", idx.to_string().color(colors::ACCENT));
    lprint!(
        "{} {}",
        idx_str.color(colors::SEPARATOR),
        name.color(colors::PRIMARY)
    );
}

pub fn as_tree(details: Vec<format::Detail>) {
    let padding_width: usize = details.iter().map(|(key, _)| key.len()).max().unwrap_or(0);

    for (i, (key, value)) in details.iter().enumerate() {
        let last: bool = i + 1 == details.len();
        let branch: ColoredString = if !last { "├─" } else { "└─" }.bright_black();

        let dots_count: usize = padding_width.saturating_sub(key.len());
        let dots: ColoredString = ".".repeat(dots_count).color(colors::SEPARATOR);

        lprint!(
            " {} {}{}{} {}",
            branch,
            key.color(colors::TEXT_DEFAULT),
            dots,
            ":".color(colors::SEPARATOR),
            value
        );
    }
}

pub fn centerln(msg: &str) {
    let width: usize = console::measure_text_width(msg);
    let space: String = " ".repeat(TOTAL_WIDTH.saturating_sub(width) / 2);
    lprint!("{}{}{}", space, msg, space);
}
