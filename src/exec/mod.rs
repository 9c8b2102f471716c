// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`backend`] provides the `ProcessBackend` trait and the
//!   `TokioProcessBackend` used in production, built on
//!   `tokio::process::Command` and non-blocking `try_wait`.
//! - [`outcome`] classifies spawn failures and exit statuses, including the
//!   reserved "not found" (254) and "failed to start" (255) codes.

pub mod backend;
pub mod outcome;

pub use backend::{Pid, ProcessBackend, TokioProcessBackend};
pub use outcome::{Completion, ProcessStatus, SpawnError};
