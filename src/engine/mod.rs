// src/engine/mod.rs

//! Scheduling engine for idlemon.
//!
//! - [`scheduler`] owns the live settings, task registry and process backend,
//!   and advances every task once per tick.
//! - [`reconcile`] merges a reloaded task set into the live one.
//! - [`control`] holds the atomic flags that signal listeners set.
//! - [`runtime`] is the async tick loop tying these to an idle source.

pub mod control;
pub mod reconcile;
pub mod runtime;
pub mod scheduler;

pub use control::{ControlFlags, install_signal_handlers};
pub use reconcile::{ReconcileReport, reconcile};
pub use runtime::{Runtime, RuntimeOptions};
pub use scheduler::Scheduler;
