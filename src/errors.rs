// src/errors.rs

//! Crate-wide error types.

use std::collections::TryReserveError;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IdlemonError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Idle source unavailable: {0}")]
    IdleSource(String),

    #[error("Failed to fork for task '{task}': {source}")]
    Fork {
        task: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to register signal handlers: {0}")]
    Signal(#[source] std::io::Error),

    #[error("Out of memory growing the task registry: {0}")]
    ResourceExhausted(#[from] TryReserveError),

    #[error("Active instance found (pid {0})")]
    ActiveInstance(u32),

    #[error("No active instance")]
    NoActiveInstance,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Why a config file was rejected. Line numbers are 1-based.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no tasks defined")]
    NoTasks,

    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("line {line}: empty value for key '{key}'")]
    EmptyValue { line: usize, key: String },

    #[error("line {line}: unknown key '{key}'")]
    UnknownKey { line: usize, key: String },

    #[error("line {line}: multiple '{key}' keys in section")]
    DuplicateKey { line: usize, key: String },

    #[error("line {line}: invalid duration: {source}")]
    InvalidDuration {
        line: usize,
        #[source]
        source: DurationError,
    },

    #[error("line {line}: invalid value '{value}' for '{key}'")]
    InvalidValue {
        line: usize,
        key: String,
        value: String,
    },

    #[error("line {line}: task.{field} required")]
    MissingField { line: usize, field: &'static str },

    #[error("line {line}: duplicate task name '{name}'")]
    DuplicateTask { line: usize, name: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DurationError {
    #[error("empty duration")]
    Empty,

    #[error("invalid number")]
    InvalidNumber,

    #[error("invalid unit '{0}'")]
    InvalidUnit(char),

    #[error("duration overflows")]
    Overflow,
}

pub type Result<T> = std::result::Result<T, IdlemonError>;
