// src/engine/reconcile.rs

//! Merging a freshly loaded task set into the live one.

use tracing::{debug, info};

use crate::errors::Result;
use crate::task::{Task, TaskRegistry, TaskState};

/// What a reconciliation did, by task name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Tasks present before and after; their state and child carried over.
    pub carried: Vec<String>,
    /// Tasks only in the new config.
    pub added: Vec<String>,
    /// Removed from the config but still running; kept as temporary tasks.
    pub retained: Vec<String>,
    /// Removed from the config and not running; dropped.
    pub dropped: Vec<String>,
}

/// Merge `candidate` (just loaded, all `Pending`) with `live`.
///
/// - A candidate task whose name exists in `live` inherits that task's state,
///   so a running child is neither lost nor started twice.
/// - A live task missing from `candidate` that is still `Started` is copied
///   in as a temporary task; it is removed once its child exits.
/// - Any other live task missing from `candidate` is dropped.
///
/// `live` is only read; the caller swaps the returned registry in and drops
/// the old one.
pub fn reconcile(
    live: &TaskRegistry,
    mut candidate: TaskRegistry,
) -> Result<(TaskRegistry, ReconcileReport)> {
    let mut report = ReconcileReport::default();

    for index in 0..candidate.len() {
        let Some(task) = candidate.get_mut(index) else {
            continue;
        };
        match live.by_name(task.name()) {
            Some(previous) => {
                task.inherit_state(previous);
                debug!(task = %task.name(), state = ?task.state(), "carried over task state");
                report.carried.push(task.name().to_string());
            }
            None => report.added.push(task.name().to_string()),
        }
    }

    for previous in live {
        if candidate.find_by_name(previous.name()).is_some() {
            continue;
        }
        match previous.state() {
            TaskState::Started { pid } => {
                info!(
                    task = %previous.name(),
                    pid,
                    "task removed from config while running; keeping until it completes"
                );
                report.retained.push(previous.name().to_string());
                candidate.append(previous.clone().into_temporary())?;
            }
            TaskState::Pending | TaskState::Completed => {
                debug!(task = %previous.name(), "task removed from config");
                report.dropped.push(previous.name().to_string());
            }
        }
    }

    Ok((candidate, report))
}

/// Build a registry of fresh `Pending` tasks from config definitions.
pub fn registry_from_tasks(tasks: impl IntoIterator<Item = Task>) -> Result<TaskRegistry> {
    let mut registry = TaskRegistry::new();
    for task in tasks {
        registry.append(task)?;
    }
    Ok(registry)
}
