// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! The ARP scanning engine.
//!
//! A [`registry::ScannerRegistry`] hands out one [`scanner::Scanner`] per
//! interface. Each scanner owns a worker thread that sleeps while nobody is
//! watching and probes the subnet in bounded windows while at least one
//! [`stream::StreamSession`] is attached. Sessions replay the cache, then
//! follow live discoveries until their observer goes away.

pub mod network;
pub mod probe;
pub mod registry;
pub mod scanner;
pub mod stream;
pub mod wake;

#[cfg(test)]
mod testing;
