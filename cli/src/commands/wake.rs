// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use lanwake_common::interface::{self, InterfaceInfo};
use lanwake_common::success;
use lanwake_core::wake;
use pnet::util::MacAddr;

use crate::terminal::print::{self, Print};

pub async fn wake(mac: MacAddr, iface: &str) -> anyhow::Result<()> {
    Print::header("wake on lan");

    let info: InterfaceInfo = interface::resolve(iface)?;
    print::aligned_line("Target", mac.to_string());
    print::aligned_line("Broadcast", info.broadcast().to_string());

    wake::send_magic_packet(info.broadcast(), mac).await?;
    success!("Sending wake-up message for {mac} to {}", info.broadcast());
    Ok(())
}
