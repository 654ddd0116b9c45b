// SPDX-FileCopyrightText: 2026 Rubrica Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Connectivity monitor.
//!
//! Probes the status endpoint once at start and then on a fixed cadence,
//! publishing the result on a watch channel. Probe failures never escape:
//! they are logged and read as `Disconnected`. There is no backoff.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use rubrica_core::{ConnectivityState, StatusBackend};

struct Shared {
    backend: Arc<dyn StatusBackend>,
    state: watch::Sender<ConnectivityState>,
}

impl Shared {
    async fn probe(&self) -> ConnectivityState {
        let next = match self.backend.probe_status().await {
            Ok(reply) => ConnectivityState::from_label(reply.status.as_deref()),
            Err(e) => {
                if self.state.borrow().is_connected() {
                    warn!(error = %e, "status probe failed");
                } else {
                    debug!(error = %e, "status probe failed");
                }
                ConnectivityState::Disconnected
            }
        };

        self.state.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            info!(from = %current, to = %next, "connectivity changed");
            *current = next.clone();
            true
        });
        next
    }
}

struct Running {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Polls backend health and exposes the latest connectivity state.
///
/// The state starts as `Disconnected` and changes only on probe results.
/// Dropping the monitor cancels its polling task.
pub struct ConnectivityMonitor {
    shared: Arc<Shared>,
    interval: Duration,
    running: Mutex<Option<Running>>,
}

impl ConnectivityMonitor {
    pub fn new(backend: Arc<dyn StatusBackend>, interval: Duration) -> Self {
        let (state, _) = watch::channel(ConnectivityState::Disconnected);
        Self {
            shared: Arc::new(Shared { backend, state }),
            interval,
            running: Mutex::new(None),
        }
    }

    /// Spawns the polling task. Must be called inside a Tokio runtime.
    ///
    /// The first probe runs immediately. Calling `start` on a running
    /// monitor does nothing.
    pub fn start(&self) {
        let mut running = self.running.lock().unwrap_or_else(PoisonError::into_inner);
        if running.as_ref().is_some_and(|r| !r.handle.is_finished()) {
            return;
        }

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(poll_loop(
            self.shared.clone(),
            self.interval,
            cancel.clone(),
        ));
        info!(interval_secs = self.interval.as_secs_f64(), "connectivity monitor started");
        *running = Some(Running { cancel, handle });
    }

    /// Cancels the polling task and waits for it to exit.
    ///
    /// A probe in progress is abandoned; its result is not published.
    pub async fn stop(&self) {
        let running = self
            .running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some(Running { cancel, handle }) = running else {
            return;
        };

        cancel.cancel();
        if let Err(e) = handle.await {
            warn!(error = %e, "connectivity monitor task ended abnormally");
        }
        info!("connectivity monitor stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|r| !r.handle.is_finished())
    }

    /// The state produced by the latest completed probe.
    pub fn state(&self) -> ConnectivityState {
        self.shared.state.borrow().clone()
    }

    /// Observes state transitions.
    pub fn subscribe(&self) -> watch::Receiver<ConnectivityState> {
        self.shared.state.subscribe()
    }

    /// Runs one probe outside the schedule and returns the resulting state.
    pub async fn probe_once(&self) -> ConnectivityState {
        self.shared.probe().await
    }
}

impl Drop for ConnectivityMonitor {
    fn drop(&mut self) {
        let running = self
            .running
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(running) = running {
            running.cancel.cancel();
        }
    }
}

async fn poll_loop(shared: Arc<Shared>, interval: Duration, cancel: CancellationToken) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    _ = shared.probe() => {}
                }
            }
        }
    }
    debug!("connectivity poll loop exited");
}
