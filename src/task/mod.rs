// src/task/mod.rs

//! Tasks and their lifecycle.
//!
//! - [`Task`] owns one command and its `Pending -> Started -> Completed ->
//!   Pending` state machine.
//! - [`registry::TaskRegistry`] is the unordered collection of live tasks.

pub mod registry;

use tracing::{debug, info};

use crate::config::TaskConfig;
use crate::errors::{IdlemonError, Result};
use crate::exec::{Completion, Pid, ProcessBackend, SpawnError};
use crate::idle::IdleState;
use crate::types::Delay;

pub use registry::TaskRegistry;

/// Lifecycle state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Waiting for its trigger condition.
    Pending,
    /// A child process is running.
    Started { pid: Pid },
    /// The last run finished; waiting for the user to come back before
    /// re-arming.
    Completed,
}

/// What the caller should do with a task after advancing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStep {
    Retain,
    /// The task was temporary and has finished: drop it from the registry.
    Remove,
}

/// One schedulable command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    name: String,
    argv: Vec<String>,
    delay: Delay,
    state: TaskState,
    /// Kept only to let a run finish after the task left the config.
    temporary: bool,
}

impl Task {
    pub fn new(name: impl Into<String>, argv: Vec<String>, delay: Delay) -> Self {
        Self {
            name: name.into(),
            argv,
            delay,
            state: TaskState::Pending,
            temporary: false,
        }
    }

    pub fn from_config(cfg: TaskConfig) -> Self {
        Self::new(cfg.name, cfg.argv, cfg.delay)
    }

    /// Builder-style state override (for tests and tooling that need a task
    /// mid-lifecycle).
    pub fn with_state(mut self, state: TaskState) -> Self {
        self.state = state;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    pub fn delay(&self) -> Delay {
        self.delay
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    /// Pid of the running child, only while `Started`.
    pub fn pid(&self) -> Option<Pid> {
        match self.state {
            TaskState::Started { pid } => Some(pid),
            TaskState::Pending | TaskState::Completed => None,
        }
    }

    pub fn is_temporary(&self) -> bool {
        self.temporary
    }

    /// Take over the state (and with it the running child) of the task this
    /// one replaces on reload.
    pub(crate) fn inherit_state(&mut self, previous: &Task) {
        self.state = previous.state;
    }

    /// Copy of a running task that is kept until its child exits.
    pub(crate) fn into_temporary(self) -> Task {
        Task {
            temporary: true,
            ..self
        }
    }

    /// Advance the state machine by one tick.
    ///
    /// Only a fork failure is returned as an error; every other problem with
    /// this task is logged and ends the run.
    pub fn advance<B: ProcessBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        current: &IdleState,
        previous: &IdleState,
    ) -> Result<TaskStep> {
        match self.state {
            TaskState::Pending => {
                if self.should_start(current) {
                    self.start(backend)?;
                }
                Ok(TaskStep::Retain)
            }
            TaskState::Started { pid } => {
                let Some(completion) = Completion::from_status(backend.poll(pid)) else {
                    return Ok(TaskStep::Retain);
                };
                completion.log(&self.name);
                info!(task = %self.name, pid, "task complete");
                self.state = TaskState::Completed;

                // The run ended this tick, so the completed policy applies now.
                Ok(self.settle(current, previous))
            }
            TaskState::Completed => Ok(self.settle(current, previous)),
        }
    }

    fn should_start(&self, current: &IdleState) -> bool {
        match self.delay {
            Delay::OnActive => current.active,
            Delay::Elapsed(ms) => current.idle_ms >= ms,
        }
    }

    fn should_reset(&self, current: &IdleState, previous: &IdleState) -> bool {
        match self.delay {
            Delay::OnActive => current.active != previous.active,
            Delay::Elapsed(_) => current.idle_ms < previous.idle_ms,
        }
    }

    fn start<B: ProcessBackend + ?Sized>(&mut self, backend: &mut B) -> Result<()> {
        match backend.spawn(&self.argv) {
            Ok(pid) => {
                info!(task = %self.name, pid, "task started");
                self.state = TaskState::Started { pid };
                Ok(())
            }
            Err(SpawnError::Fork(source)) => Err(IdlemonError::Fork {
                task: self.name.clone(),
                source,
            }),
            Err(err) => {
                debug!(task = %self.name, error = ?err, "spawn failed");
                if let Some(completion) = err.completion() {
                    completion.log(&self.name);
                }
                self.state = TaskState::Completed;
                Ok(())
            }
        }
    }

    fn settle(&mut self, current: &IdleState, previous: &IdleState) -> TaskStep {
        if self.temporary {
            return TaskStep::Remove;
        }
        if self.should_reset(current, previous) {
            debug!(task = %self.name, "task reset");
            self.state = TaskState::Pending;
        }
        TaskStep::Retain
    }
}
