// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Process-wide lookup of scanners by interface name.
//!
//! Scanners are created lazily on first use and then live as long as the
//! registry. Creation happens under the registry lock, so two concurrent
//! lookups for the same interface can never end up with two workers
//! probing the same link.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use lanwake_common::config::ScannerConfig;
use lanwake_common::error::ScanError;
use lanwake_common::interface;
use lanwake_common::success;

use crate::probe::PnetArpProbe;
use crate::scanner::Scanner;

/// Builds the scanner for an interface the registry has not seen yet.
pub trait ScannerFactory: Send + Sync {
    fn create(&self, interface: &str) -> Result<Scanner, ScanError>;
}

/// Resolves the interface and probes it over a raw `pnet` channel.
#[derive(Debug, Clone, Default)]
pub struct PnetScannerFactory {
    config: ScannerConfig,
}

impl PnetScannerFactory {
    pub fn new(config: ScannerConfig) -> Self {
        Self { config }
    }
}

impl ScannerFactory for PnetScannerFactory {
    fn create(&self, interface: &str) -> Result<Scanner, ScanError> {
        let info = interface::resolve(interface)?;
        let probe = PnetArpProbe::dial(&info)?;
        Scanner::new(info, probe, self.config)
    }
}

pub struct ScannerRegistry {
    scanners: Mutex<HashMap<String, Arc<Scanner>>>,
    factory: Box<dyn ScannerFactory>,
}

impl Default for ScannerRegistry {
    fn default() -> Self {
        Self::with_config(ScannerConfig::default())
    }
}

impl ScannerRegistry {
    pub fn new(factory: impl ScannerFactory + 'static) -> Self {
        Self {
            scanners: Mutex::new(HashMap::new()),
            factory: Box::new(factory),
        }
    }

    /// A registry backed by real raw sockets.
    pub fn with_config(config: ScannerConfig) -> Self {
        Self::new(PnetScannerFactory::new(config))
    }

    /// Returns the scanner for `interface`, creating it on first use.
    ///
    /// A failed creation leaves nothing behind; the next call tries again.
    pub fn get_or_create(&self, interface: &str) -> Result<Arc<Scanner>, ScanError> {
        let mut scanners = self.scanners.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(scanner) = scanners.get(interface) {
            return Ok(Arc::clone(scanner));
        }

        let scanner = Arc::new(self.factory.create(interface)?);
        scanners.insert(interface.to_string(), Arc::clone(&scanner));
        success!(
            "Scanner ready on {interface} ({} targets)",
            scanner.interface().host_count()
        );
        Ok(scanner)
    }

    pub fn len(&self) -> usize {
        self.scanners.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
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
