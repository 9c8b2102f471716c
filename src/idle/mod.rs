// src/idle/mod.rs

//! Idle-time sources.
//!
//! - [`IdleSource`] is the desktop side: how long since the last user input,
//!   and whether the screensaver is active.
//! - [`signal::PingTimer`] is the cooperative side: `idlemon --ping` resets
//!   it to zero.
//!
//! Each tick the two are merged into one [`IdleState`].

pub mod signal;
#[cfg(feature = "x11")]
pub mod x11;

use crate::errors::Result;
use crate::types::IdleBackend;

pub use signal::PingTimer;

/// One reading from an [`IdleSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IdleSample {
    pub idle_ms: u64,
    /// Screensaver engaged.
    pub active: bool,
}

/// The idle state the scheduler acts on for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IdleState {
    pub idle_ms: u64,
    pub active: bool,
}

impl IdleState {
    /// Combine the desktop sample with the ping timer: the smaller idle time
    /// wins, the active flag comes from the desktop.
    pub fn merge(sample: IdleSample, signal_idle_ms: u64) -> Self {
        Self {
            idle_ms: sample.idle_ms.min(signal_idle_ms),
            active: sample.active,
        }
    }
}

/// Source of desktop idle information.
pub trait IdleSource: Send {
    fn query(&mut self) -> Result<IdleSample>;
}

/// Reports "idle forever, never active", leaving the ping timer as the only
/// input.
#[derive(Debug, Clone, Copy, Default)]
pub struct PingOnlyIdleSource;

impl IdleSource for PingOnlyIdleSource {
    fn query(&mut self) -> Result<IdleSample> {
        Ok(IdleSample {
            idle_ms: u64::MAX,
            active: false,
        })
    }
}

/// Open the idle source selected on the command line.
pub fn open_idle_source(backend: IdleBackend) -> Result<Box<dyn IdleSource>> {
    match backend {
        IdleBackend::Signal => Ok(Box::new(PingOnlyIdleSource)),
        #[cfg(feature = "x11")]
        IdleBackend::X11 => Ok(Box::new(x11::X11IdleSource::connect()?)),
        #[cfg(not(feature = "x11"))]
        IdleBackend::X11 => Err(crate::errors::IdlemonError::IdleSource(
            "built without the `x11` feature".to_string(),
        )),
    }
}

impl<S: IdleSource + ?Sized> IdleSource for Box<S> {
    fn query(&mut self) -> Result<IdleSample> {
        (**self).query()
    }
}
