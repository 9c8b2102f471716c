// src/idle/signal.rs

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

const NEVER: u64 = 0;

/// Cooperative idle timer, reset by `idlemon --ping` (SIGUSR1).
///
/// Only an atomic timestamp is stored so that a signal listener can update
/// it without coordinating with the tick loop.
#[derive(Debug, Default)]
pub struct PingTimer {
    /// Unix-epoch milliseconds of the last ping; `0` when never pinged.
    last_ping_ms: AtomicU64,
}

impl PingTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ping(&self) {
        self.ping_at(now_ms());
    }

    pub fn ping_at(&self, at_ms: u64) {
        // Keep 0 reserved for "never".
        self.last_ping_ms.store(at_ms.max(1), Ordering::SeqCst);
    }

    /// Milliseconds since the last ping, `u64::MAX` if there never was one.
    pub fn idle_ms(&self) -> u64 {
        self.idle_ms_at(now_ms())
    }

    pub fn idle_ms_at(&self, now_ms: u64) -> u64 {
        match self.last_ping_ms.load(Ordering::SeqCst) {
            NEVER => u64::MAX,
            last => now_ms.saturating_sub(last),
        }
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}
