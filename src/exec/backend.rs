// src/exec/backend.rs

//! Pluggable process backend.
//!
//! Tasks talk to a `ProcessBackend` instead of spawning processes directly.
//! Production code uses [`TokioProcessBackend`]; tests provide a backend that
//! records spawns and reports scripted exit statuses without touching the OS.

use std::collections::HashMap;
use std::io;
use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;

use tokio::process::{Child, Command};
use tracing::debug;

use super::outcome::{ProcessStatus, SpawnError};

/// Process id as reported by the backend.
pub type Pid = u32;

/// Trait abstracting how task processes are started and reaped.
///
/// Neither method may block: the scheduler calls both from its single tick
/// loop.
pub trait ProcessBackend: Send {
    /// Start `argv[0]` with `argv` as its argument vector and the inherited
    /// environment.
    fn spawn(&mut self, argv: &[String]) -> Result<Pid, SpawnError>;

    /// Non-blocking check on a child previously returned by `spawn`.
    ///
    /// Once a finished status has been returned for `pid`, the backend
    /// forgets it; polling it again yields a wait error.
    fn poll(&mut self, pid: Pid) -> ProcessStatus;
}

/// Real backend built on `tokio::process`.
///
/// Must be used from within a Tokio runtime, which reaps children through its
/// SIGCHLD driver. Children are not killed when the backend is dropped.
#[derive(Debug, Default)]
pub struct TokioProcessBackend {
    children: HashMap<Pid, Child>,
}

impl TokioProcessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of children spawned and not yet reaped.
    pub fn outstanding(&self) -> usize {
        self.children.len()
    }
}

impl ProcessBackend for TokioProcessBackend {
    fn spawn(&mut self, argv: &[String]) -> Result<Pid, SpawnError> {
        let (program, args) = argv.split_first().ok_or_else(|| {
            SpawnError::Exec(io::Error::new(io::ErrorKind::InvalidInput, "empty argv"))
        })?;

        let child = Command::new(program)
            .args(args)
            .spawn()
            .map_err(SpawnError::classify)?;

        let pid = child.id().ok_or_else(|| {
            SpawnError::Exec(io::Error::other("child exited before its pid was read"))
        })?;

        debug!(pid, program = %program, "spawned child process");
        self.children.insert(pid, child);
        Ok(pid)
    }

    fn poll(&mut self, pid: Pid) -> ProcessStatus {
        let Some(child) = self.children.get_mut(&pid) else {
            return ProcessStatus::WaitError(format!("no child process with pid {pid}"));
        };

        match child.try_wait() {
            Ok(None) => ProcessStatus::Running,
            Ok(Some(status)) => {
                self.children.remove(&pid);
                status_from_exit(status)
            }
            Err(err) => {
                self.children.remove(&pid);
                ProcessStatus::WaitError(err.to_string())
            }
        }
    }
}

fn status_from_exit(status: ExitStatus) -> ProcessStatus {
    if let Some(code) = status.code() {
        ProcessStatus::Exited(code)
    } else if let Some(sig) = status.signal() {
        ProcessStatus::Signaled(sig)
    } else {
        ProcessStatus::WaitError(format!("unrecognised exit status: {status}"))
    }
}
