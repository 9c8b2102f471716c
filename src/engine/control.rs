// src/engine/control.rs

//! Asynchronous control inputs.
//!
//! Signal listeners only flip atomics here. The tick loop reads and acts on
//! them at the top of its next tick, so no reload or shutdown logic ever
//! runs concurrently with a registry scan.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::signal::unix::{SignalKind, signal};
use tracing::debug;

use crate::errors::{IdlemonError, Result};
use crate::idle::PingTimer;

#[derive(Debug)]
pub struct ControlFlags {
    running: AtomicBool,
    reload_requested: AtomicBool,
    ping: PingTimer,
}

impl Default for ControlFlags {
    fn default() -> Self {
        Self {
            running: AtomicBool::new(true),
            reload_requested: AtomicBool::new(false),
            ping: PingTimer::new(),
        }
    }
}

impl ControlFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn request_shutdown(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn request_reload(&self) {
        self.reload_requested.store(true, Ordering::SeqCst);
    }

    /// Returns whether a reload was requested, clearing the request.
    pub fn take_reload(&self) -> bool {
        self.reload_requested.swap(false, Ordering::SeqCst)
    }

    pub fn ping(&self) -> &PingTimer {
        &self.ping
    }
}

/// Spawn listeners that map signals onto `flags`:
///
/// - SIGUSR1: reset the ping timer
/// - SIGUSR2: request a config reload
/// - SIGINT, SIGTERM: request shutdown
///
/// Must be called from within a Tokio runtime.
pub fn install_signal_handlers(flags: Arc<ControlFlags>) -> Result<()> {
    let mut usr1 = signal(SignalKind::user_defined1()).map_err(IdlemonError::Signal)?;
    let mut usr2 = signal(SignalKind::user_defined2()).map_err(IdlemonError::Signal)?;
    let mut int = signal(SignalKind::interrupt()).map_err(IdlemonError::Signal)?;
    let mut term = signal(SignalKind::terminate()).map_err(IdlemonError::Signal)?;

    {
        let flags = Arc::clone(&flags);
        tokio::spawn(async move {
            while usr1.recv().await.is_some() {
                debug!("SIGUSR1: ping");
                flags.ping().ping();
            }
        });
    }

    {
        let flags = Arc::clone(&flags);
        tokio::spawn(async move {
            while usr2.recv().await.is_some() {
                debug!("SIGUSR2: reload requested");
                flags.request_reload();
            }
        });
    }

    tokio::spawn(async move {
        tokio::select! {
            _ = int.recv() => debug!("SIGINT: shutdown requested"),
            _ = term.recv() => debug!("SIGTERM: shutdown requested"),
        }
        flags.request_shutdown();
    });

    Ok(())
}
