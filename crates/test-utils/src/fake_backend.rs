use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard};

use idlemon::exec::{Pid, ProcessBackend, ProcessStatus, SpawnError};

#[derive(Debug)]
struct State {
    next_pid: Pid,
    spawned: Vec<(Pid, Vec<String>)>,
    statuses: HashMap<Pid, ProcessStatus>,
    polls: Vec<Pid>,
    spawn_error: Option<io::ErrorKind>,
}

/// A fake process backend that:
/// - records every spawn and hands out increasing pids
/// - reports `Running` for a child until a test calls `finish`
/// - can be told to fail the next spawns with a given `io::ErrorKind`
///
/// Clones share state, so a test can keep a handle after moving one into a
/// scheduler.
#[derive(Debug, Clone)]
pub struct FakeProcessBackend {
    state: Arc<Mutex<State>>,
}

impl FakeProcessBackend {
    pub fn new() -> Self {
        Self::starting_at(100)
    }

    /// Hand out pids starting at `pid`.
    pub fn starting_at(pid: Pid) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                next_pid: pid,
                spawned: Vec::new(),
                statuses: HashMap::new(),
                polls: Vec::new(),
                spawn_error: None,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// Report `status` on the next poll of `pid`.
    pub fn finish(&self, pid: Pid, status: ProcessStatus) {
        self.lock().statuses.insert(pid, status);
    }

    /// Make spawns fail with `kind` until cleared with `None`.
    pub fn fail_spawns(&self, kind: Option<io::ErrorKind>) {
        self.lock().spawn_error = kind;
    }

    /// Argument vectors of every spawn, in order.
    pub fn spawned(&self) -> Vec<Vec<String>> {
        self.lock().spawned.iter().map(|(_, argv)| argv.clone()).collect()
    }

    pub fn spawn_count(&self) -> usize {
        self.lock().spawned.len()
    }

    /// Pid handed out by the last successful spawn.
    pub fn last_pid(&self) -> Option<Pid> {
        self.lock().spawned.last().map(|(pid, _)| *pid)
    }

    /// Every pid polled, in order.
    pub fn polls(&self) -> Vec<Pid> {
        self.lock().polls.clone()
    }
}

impl Default for FakeProcessBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessBackend for FakeProcessBackend {
    fn spawn(&mut self, argv: &[String]) -> Result<Pid, SpawnError> {
        let mut state = self.lock();
        if let Some(kind) = state.spawn_error {
            return Err(SpawnError::classify(io::Error::new(kind, "scripted spawn failure")));
        }
        let pid = state.next_pid;
        state.next_pid += 1;
        state.spawned.push((pid, argv.to_vec()));
        Ok(pid)
    }

    fn poll(&mut self, pid: Pid) -> ProcessStatus {
        let mut state = self.lock();
        state.polls.push(pid);
        state.statuses.remove(&pid).unwrap_or(ProcessStatus::Running)
    }
}
