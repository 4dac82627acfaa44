// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use colored::*;
use is_root::is_root;
use lanwake_common::interface;

use crate::lprint;
use crate::terminal::colors;
use crate::terminal::print::{self, Print};

pub fn info() -> anyhow::Result<()> {
    Print::header("about the tool");
    lprint!(
        "{}",
        "lanwake finds machines on the local link and wakes them up.".color(colors::TEXT_DEFAULT)
    );
    lprint!();
    print::aligned_line("Version", env!("CARGO_PKG_VERSION"));
    print::aligned_line("License", "MPL-2.0");
    print::aligned_line("Repository", env!("CARGO_PKG_REPOSITORY"));
    let privileges: ColoredString = if is_root() {
        "root".green().bold()
    } else {
        "unprivileged (raw sockets need root or CAP_NET_RAW)".yellow()
    };
    print::aligned_line("Privileges", privileges);

    Print::header("network interfaces");
    let described = interface::describe_interfaces();
    for (idx, (intf, resolved)) in described.iter().enumerate() {
        Print::interface(idx, intf, resolved);
    }

    Ok(())
}
