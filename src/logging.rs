// src/logging.rs

//! Logging setup for `idlemon` using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the log level:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `IDLEMON_LOG` environment variable (e.g. "info", "debug")
//! 3. `[log] level` from the config file, re-applied on every reload
//! 4. default to `info`
//!
//! Logs are sent to STDERR; task processes inherit stdout.

use std::fmt;
use std::io::IsTerminal;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::{FormatTime, SystemTime};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{Registry, reload};

use crate::config::LogSettings;
use crate::types::LogLevel;

/// Handle for adjusting the installed subscriber after a config (re)load.
#[derive(Clone)]
pub struct LogHandle {
    filter: reload::Handle<LevelFilter, Registry>,
    time: Arc<AtomicBool>,
    /// Level fixed by the CLI flag or environment; config changes are ignored.
    pinned: bool,
}

impl fmt::Debug for LogHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogHandle")
            .field("time", &self.time.load(Ordering::Relaxed))
            .field("pinned", &self.pinned)
            .finish_non_exhaustive()
    }
}

impl LogHandle {
    /// Apply `[log]` settings from the config.
    pub fn apply(&self, settings: &LogSettings) {
        self.time.store(settings.time, Ordering::Relaxed);
        if self.pinned {
            return;
        }
        if let Err(err) = self.filter.reload(level_filter(settings.level)) {
            tracing::warn!(error = %err, "failed to update log level");
        }
    }
}

/// Timestamp formatter that can be switched off at runtime.
#[derive(Debug, Clone)]
struct ToggleTime {
    enabled: Arc<AtomicBool>,
}

impl FormatTime for ToggleTime {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        if self.enabled.load(Ordering::Relaxed) {
            SystemTime.format_time(w)
        } else {
            Ok(())
        }
    }
}

/// Initialise global logging subscriber.
///
/// Safe to call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<LogHandle> {
    let pinned_level = cli_level.or_else(|| {
        std::env::var("IDLEMON_LOG")
            .ok()
            .and_then(|s| s.parse::<LogLevel>().ok())
    });
    let level = pinned_level.unwrap_or_default();

    let (filter, filter_handle) = reload::Layer::new(level_filter(level));
    let time = Arc::new(AtomicBool::new(true));

    let ansi = std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal();

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_timer(ToggleTime {
            enabled: Arc::clone(&time),
        })
        .with_target(false)
        .with_ansi(ansi)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .context("installing tracing subscriber")?;

    Ok(LogHandle {
        filter: filter_handle,
        time,
        pinned: pinned_level.is_some(),
    })
}

fn level_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Trace => LevelFilter::TRACE,
    }
}
