// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! A per-interface ARP scanner.
//!
//! The scanner is a small monitor: one mutex guards the observer count, the
//! [`ScanCache`] and the list of per-observer delivery queues, and one
//! condition variable lets the worker sleep while nobody is listening.
//!
//! ### Lifecycle
//! - **Idle**: no observers, the worker is parked on the condition variable.
//! - **Probing**: at least one observer, the worker broadcasts a request for
//!   every subnet address and collects replies until the window closes, then
//!   checks the observer count again.
//!
//! Discoveries go to the cache first and foremost. Every registered queue is
//! offered a copy without blocking; a full queue just misses the event.

mod cache;
mod worker;

use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;

use lanwake_common::config::ScannerConfig;
use lanwake_common::error::ScanError;
use lanwake_common::interface::InterfaceInfo;
use lanwake_common::models::machine::MachineInfo;
use lanwake_common::{debug, info, success};
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::probe::ArpProbe;
use crate::stream::StreamSession;

pub use cache::ScanCache;

pub type ObserverId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Idle,
    Probing,
}

struct ScannerState {
    connected_clients: usize,
    cache: ScanCache,
    observers: HashMap<ObserverId, mpsc::Sender<MachineInfo>>,
    next_observer: ObserverId,
    worker: WorkerState,
    windows_completed: u64,
}

/// State shared between a [`Scanner`], its worker thread and its sessions.
pub(crate) struct Shared {
    interface: String,
    state: Mutex<ScannerState>,
    wakeup: Condvar,
}

impl Shared {
    fn new(interface: &str) -> Self {
        Self {
            interface: interface.to_string(),
            state: Mutex::new(ScannerState {
                connected_clients: 0,
                cache: ScanCache::new(),
                observers: HashMap::new(),
                next_observer: 0,
                worker: WorkerState::Idle,
                windows_completed: 0,
            }),
            wakeup: Condvar::new(),
        }
    }

    // Nothing inside the critical sections can leave the state half-written,
    // so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, ScannerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn interface(&self) -> &str {
        &self.interface
    }

    pub(crate) fn notify_worker(&self) {
        self.wakeup.notify_one();
    }

    /// Registers a new observer and snapshots the cache in the same critical
    /// section, so every later discovery lands in `queue`.
    fn attach(&self, queue: mpsc::Sender<MachineInfo>) -> (ObserverId, Vec<MachineInfo>) {
        let mut state = self.lock();
        let id: ObserverId = state.next_observer;
        state.next_observer += 1;
        state.observers.insert(id, queue);
        state.connected_clients += 1;
        let replay: Vec<MachineInfo> = state.cache.snapshot();
        let connected: usize = state.connected_clients;
        self.wakeup.notify_one();
        drop(state);

        info!(
            "A device connected to {} ({connected} listening)",
            self.interface
        );
        (id, replay)
    }

    pub(crate) fn detach(&self, id: ObserverId) {
        let mut state = self.lock();
        state.observers.remove(&id);
        state.connected_clients = state.connected_clients.saturating_sub(1);
        let connected: usize = state.connected_clients;
        drop(state);

        info!(
            "A device disconnected from {} ({connected} listening)",
            self.interface
        );
    }

    /// Blocks the calling worker until at least one observer is attached.
    fn wait_for_observers(&self) {
        let mut state = self.lock();
        if state.connected_clients == 0 {
            info!("No listening clients on {}, pausing worker...", self.interface);
            state.worker = WorkerState::Idle;
        }
        while state.connected_clients == 0 {
            state = self
                .wakeup
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        state.worker = WorkerState::Probing;
    }

    fn publish(&self, machine: MachineInfo) {
        let mut state = self.lock();

        state.observers.retain(|id, queue| match queue.try_send(machine) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                debug!(verbosity = 2, "Observer #{id} is lagging, live event dropped");
                true
            }
            Err(TrySendError::Closed(_)) => false,
        });

        let previous: Option<MachineInfo> = state.cache.upsert(machine);
        drop(state);

        match previous {
            None => success!("Found {} at {}", machine.mac, machine.ip),
            Some(old) if old.ip != machine.ip => {
                info!("{} moved from {} to {}", machine.mac, old.ip, machine.ip)
            }
            Some(_) => {}
        }
    }

    fn finish_window(&self) {
        self.lock().windows_completed += 1;
    }
}

/// The scanner for one interface. Shared behind an `Arc` by the registry.
pub struct Scanner {
    info: InterfaceInfo,
    config: ScannerConfig,
    shared: Arc<Shared>,
}

impl Scanner {
    /// Spawns the worker thread, parked until the first [`Scanner::attach`].
    pub fn new<P>(info: InterfaceInfo, probe: P, config: ScannerConfig) -> Result<Self, ScanError>
    where
        P: ArpProbe + 'static,
    {
        let shared = Arc::new(Shared::new(info.name()));
        let worker = worker::Worker::new(
            Arc::clone(&shared),
            info.clone(),
            probe,
            config.probe_window,
        );

        thread::Builder::new()
            .name(format!("arp-{}", info.name()))
            .spawn(move || worker.run())
            .map_err(|source| ScanError::WorkerSpawnFailed {
                interface: info.name().to_string(),
                source,
            })?;

        Ok(Self {
            info,
            config,
            shared,
        })
    }

    pub fn interface(&self) -> &InterfaceInfo {
        &self.info
    }

    pub fn config(&self) -> ScannerConfig {
        self.config
    }

    /// Starts a session for a new observer and wakes the worker if it was parked.
    pub fn attach(&self) -> StreamSession {
        let (queue_tx, queue_rx) = mpsc::channel(self.config.observer_queue.max(1));
        let (id, replay) = self.shared.attach(queue_tx);
        StreamSession::new(id, replay, queue_rx, Arc::clone(&self.shared))
    }

    pub fn observer_count(&self) -> usize {
        self.shared.lock().connected_clients
    }

    pub fn worker_state(&self) -> WorkerState {
        self.shared.lock().worker
    }

    pub fn windows_completed(&self) -> u64 {
        self.shared.lock().windows_completed
    }

    pub fn cached_hosts(&self) -> Vec<MachineInfo> {
        self.shared.lock().cache.snapshot()
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
