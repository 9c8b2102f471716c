// src/engine/runtime.rs

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use crate::errors::Result;
use crate::exec::ProcessBackend;
use crate::fs::FileSystem;
use crate::idle::{IdleSource, IdleState};
use crate::logging::LogHandle;

use super::control::ControlFlags;
use super::scheduler::Scheduler;

/// Options that influence how the runtime behaves.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeOptions {
    /// Time between ticks.
    pub tick: Duration,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(1),
        }
    }
}

/// The tick loop around a [`Scheduler`].
///
/// Each tick, in order:
/// 1. stop if shutdown was requested;
/// 2. reload the config if requested (keeping the old one on error);
/// 3. sample the idle source and merge it with the ping timer;
/// 4. advance every task against this and the previous tick's state.
pub struct Runtime<B: ProcessBackend, S: IdleSource> {
    scheduler: Scheduler<B>,
    idle_source: S,
    flags: Arc<ControlFlags>,
    fs: Box<dyn FileSystem>,
    config_path: PathBuf,
    log: Option<LogHandle>,
    options: RuntimeOptions,
    previous: IdleState,
}

impl<B: ProcessBackend, S: IdleSource> fmt::Debug for Runtime<B, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("config_path", &self.config_path)
            .field("options", &self.options)
            .field("previous", &self.previous)
            .finish_non_exhaustive()
    }
}

impl<B: ProcessBackend, S: IdleSource> Runtime<B, S> {
    pub fn new(
        scheduler: Scheduler<B>,
        idle_source: S,
        flags: Arc<ControlFlags>,
        fs: Box<dyn FileSystem>,
        config_path: PathBuf,
        options: RuntimeOptions,
    ) -> Self {
        Self {
            scheduler,
            idle_source,
            flags,
            fs,
            config_path,
            log: None,
            options,
            previous: IdleState::default(),
        }
    }

    /// Re-apply `[log]` settings through this handle after each reload.
    pub fn with_log_handle(mut self, log: LogHandle) -> Self {
        self.log = Some(log);
        self
    }

    pub fn scheduler(&self) -> &Scheduler<B> {
        &self.scheduler
    }

    /// Idle state seen on the last completed tick.
    pub fn previous_state(&self) -> IdleState {
        self.previous
    }

    /// Main loop. Returns once shutdown is requested, or with the first
    /// fatal error (idle source failure, fork failure).
    pub async fn run(mut self) -> Result<()> {
        info!(tasks = self.scheduler.registry().len(), "idlemon started");

        let mut interval = tokio::time::interval(self.options.tick);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            if !self.tick()? {
                break;
            }
        }

        self.scheduler.shutdown();
        info!("finished");
        Ok(())
    }

    /// Run a single tick. Returns `false` when the loop should stop.
    pub fn tick(&mut self) -> Result<bool> {
        if !self.flags.is_running() {
            info!("shutdown requested");
            return Ok(false);
        }

        if self.flags.take_reload() {
            self.reload();
        }

        let sample = self.idle_source.query()?;
        let current = IdleState::merge(sample, self.flags.ping().idle_ms());
        debug!(idle_ms = current.idle_ms, active = current.active, "loop");

        self.scheduler.advance_all_tasks(&current, &self.previous)?;
        self.previous = current;
        Ok(true)
    }

    fn reload(&mut self) {
        match self.scheduler.reload(self.fs.as_ref(), &self.config_path) {
            Ok(report) => {
                info!(
                    carried = report.carried.len(),
                    added = report.added.len(),
                    retained = report.retained.len(),
                    dropped = report.dropped.len(),
                    "config: reloaded"
                );
                if let Some(log) = &self.log {
                    log.apply(&self.scheduler.settings().log);
                }
            }
            Err(err) => {
                error!(
                    path = %self.config_path.display(),
                    error = %err,
                    "config: reload failed; keeping previous configuration"
                );
            }
        }
    }
}
