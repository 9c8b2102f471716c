// src/types.rs

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;

/// Log verbosity, shared by the `[log] level` config key and `--log-level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!(
                "invalid log level: {other} (expected error, warn, info, debug or trace)"
            )),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        };
        f.write_str(s)
    }
}

/// When a task fires.
///
/// - `Elapsed(ms)`: once the session has been idle for at least `ms`.
/// - `OnActive`: edge-triggered by the idle source's "active" flag (the
///   screensaver engaging), independent of elapsed idle time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delay {
    Elapsed(u64),
    OnActive,
}

impl fmt::Display for Delay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delay::Elapsed(ms) => write!(f, "{ms}ms"),
            Delay::OnActive => f.write_str("active"),
        }
    }
}

/// Which idle source feeds the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum IdleBackend {
    /// X11 MIT-SCREEN-SAVER extension, merged with the ping timer.
    X11,
    /// Only the cooperative ping timer (`idlemon --ping`).
    Signal,
}

impl Default for IdleBackend {
    fn default() -> Self {
        if cfg!(feature = "x11") {
            IdleBackend::X11
        } else {
            IdleBackend::Signal
        }
    }
}
