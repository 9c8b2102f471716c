// src/exec/outcome.rs

//! Classification of child process results.

use std::io;

use thiserror::Error;
use tracing::{error, warn};

/// Exit status a child uses to report that its program was not found.
pub const EXIT_NOT_FOUND: i32 = 254;
/// Exit status a child uses to report any other failure to exec.
pub const EXIT_EXEC_FAILED: i32 = 255;

/// Result of a non-blocking poll on a child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessStatus {
    Running,
    Exited(i32),
    Signaled(i32),
    WaitError(String),
}

/// Why a task's run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Success,
    NotFound,
    FailedToStart,
    NonZero(i32),
    Signaled(i32),
    WaitFailed(String),
}

impl Completion {
    /// Classify a finished poll. Returns `None` while the child is running.
    pub fn from_status(status: ProcessStatus) -> Option<Self> {
        let completion = match status {
            ProcessStatus::Running => return None,
            ProcessStatus::Exited(0) => Completion::Success,
            ProcessStatus::Exited(EXIT_NOT_FOUND) => Completion::NotFound,
            ProcessStatus::Exited(EXIT_EXEC_FAILED) => Completion::FailedToStart,
            ProcessStatus::Exited(code) => Completion::NonZero(code),
            ProcessStatus::Signaled(sig) => Completion::Signaled(sig),
            ProcessStatus::WaitError(msg) => Completion::WaitFailed(msg),
        };
        Some(completion)
    }

    /// Log the outcome for `task`. A clean exit logs nothing here.
    pub fn log(&self, task: &str) {
        match self {
            Completion::Success => {}
            Completion::NotFound => error!(task = %task, "task not found"),
            Completion::FailedToStart => error!(task = %task, "task failed to start"),
            Completion::NonZero(code) => {
                error!(task = %task, exit_code = code, "task exited with non-zero status")
            }
            Completion::Signaled(sig) => warn!(task = %task, signal = sig, "task received signal"),
            Completion::WaitFailed(msg) => error!(task = %task, error = %msg, "task wait failed"),
        }
    }
}

/// Failure to create a child process.
#[derive(Debug, Error)]
pub enum SpawnError {
    /// The program does not exist (same meaning as exit status 254).
    #[error("program not found: {0}")]
    NotFound(#[source] io::Error),
    /// The program exists but could not be executed (exit status 255).
    #[error("failed to exec: {0}")]
    Exec(#[source] io::Error),
    /// No process could be created at all. Fatal for the scheduler.
    #[error("fork failed: {0}")]
    Fork(#[source] io::Error),
}

impl SpawnError {
    pub fn classify(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => SpawnError::NotFound(err),
            io::ErrorKind::WouldBlock | io::ErrorKind::OutOfMemory => SpawnError::Fork(err),
            _ => SpawnError::Exec(err),
        }
    }

    /// The completion a task records when its spawn failed this way, or
    /// `None` if the failure is fatal.
    pub fn completion(&self) -> Option<Completion> {
        match self {
            SpawnError::NotFound(_) => Some(Completion::NotFound),
            SpawnError::Exec(_) => Some(Completion::FailedToStart),
            SpawnError::Fork(_) => None,
        }
    }
}
