// src/engine/scheduler.rs

use std::path::Path;

use tracing::{debug, info, warn};

use crate::config::{Config, GlobalSettings, load_and_validate};
use crate::engine::reconcile::{ReconcileReport, reconcile, registry_from_tasks};
use crate::errors::Result;
use crate::exec::ProcessBackend;
use crate::fs::FileSystem;
use crate::idle::IdleState;
use crate::task::{Task, TaskRegistry, TaskState, TaskStep};

/// Owns the live configuration: global settings, the task registry and the
/// process backend the tasks run on.
///
/// Everything here is synchronous and driven from one thread: the runtime
/// calls [`Scheduler::advance_all_tasks`] once per tick and
/// [`Scheduler::reload`] at the top of a tick when a reload was requested.
#[derive(Debug)]
pub struct Scheduler<B: ProcessBackend> {
    settings: GlobalSettings,
    registry: TaskRegistry,
    backend: B,
}

impl<B: ProcessBackend> Scheduler<B> {
    /// An empty scheduler with default settings. Call [`Scheduler::install`]
    /// or [`Scheduler::reload`] to give it tasks.
    pub fn new(backend: B) -> Self {
        Self {
            settings: GlobalSettings::default(),
            registry: TaskRegistry::new(),
            backend,
        }
    }

    /// Construct a scheduler directly from a validated [`Config`].
    pub fn from_config(cfg: Config, backend: B) -> Result<Self> {
        let mut scheduler = Self::new(backend);
        scheduler.install(cfg)?;
        Ok(scheduler)
    }

    pub fn settings(&self) -> &GlobalSettings {
        &self.settings
    }

    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Load `path` and merge it into the live state.
    ///
    /// On any load error the live settings and tasks are left untouched.
    pub fn reload(&mut self, fs: &dyn FileSystem, path: &Path) -> Result<ReconcileReport> {
        let cfg = load_and_validate(fs, path)?;
        let report = self.install(cfg)?;
        info!(path = %path.display(), "config: loaded");
        Ok(report)
    }

    /// Merge a validated config into the live state and swap it in.
    pub fn install(&mut self, cfg: Config) -> Result<ReconcileReport> {
        let candidate = registry_from_tasks(cfg.tasks.into_iter().map(Task::from_config))?;
        let (merged, report) = reconcile(&self.registry, candidate)?;

        self.registry = merged;
        self.settings = cfg.settings;

        debug!(
            carried = ?report.carried,
            added = ?report.added,
            retained = ?report.retained,
            dropped = ?report.dropped,
            "config: reconciled tasks"
        );
        Ok(report)
    }

    /// Advance every task once against the current and previous idle state.
    ///
    /// Finished temporary tasks are swap-removed; the slot is then visited
    /// again because it now holds the former last task.
    pub fn advance_all_tasks(&mut self, current: &IdleState, previous: &IdleState) -> Result<()> {
        let mut index = 0;
        while let Some(task) = self.registry.get_mut(index) {
            match task.advance(&mut self.backend, current, previous)? {
                TaskStep::Retain => index += 1,
                TaskStep::Remove => {
                    if let Some(task) = self.registry.remove_at(index) {
                        debug!(task = %task.name(), "removed temporary task");
                    }
                }
            }
        }
        Ok(())
    }

    /// Tear down the registry. Running children are not killed; they are
    /// left to finish on their own.
    pub fn shutdown(self) -> B {
        let running: Vec<&str> = self
            .registry
            .iter()
            .filter(|t| matches!(t.state(), TaskState::Started { .. }))
            .map(|t| t.name())
            .collect();
        if !running.is_empty() {
            warn!(tasks = ?running, "abandoning running tasks at shutdown");
        }
        self.backend
    }
}
