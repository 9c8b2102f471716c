// src/config/model.rs

use crate::types::{Delay, LogLevel};

/// Default task delay when neither the task nor the global section sets one.
pub const DEFAULT_DELAY_MS: u64 = 60_000;

/// A parsed config file, as read, before semantic validation.
///
/// Produced by [`crate::config::parser::parse_config`]; turned into a
/// [`Config`] with `Config::try_from`.
#[derive(Debug, Clone, Default)]
pub struct RawConfig {
    /// Global `delay` key, if present.
    pub delay: Option<u64>,
    pub log: LogSettings,
    pub tasks: Vec<RawTask>,
}

/// One `[task]` section. Every field is optional until validation.
#[derive(Debug, Clone, Default)]
pub struct RawTask {
    /// Line of the `[task]` header.
    pub line: usize,
    pub name: Option<String>,
    pub argv: Option<Vec<String>>,
    pub delay: Option<Delay>,
}

/// `[log]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogSettings {
    pub level: LogLevel,
    /// Prefix log lines with a timestamp.
    pub time: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            time: true,
        }
    }
}

/// Process-wide settings, replaced as a whole on every successful reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalSettings {
    /// Delay used by tasks that do not set their own.
    pub delay: u64,
    pub log: LogSettings,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            delay: DEFAULT_DELAY_MS,
            log: LogSettings::default(),
        }
    }
}

/// Validated definition of a single task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskConfig {
    pub name: String,
    /// Program and arguments; never empty.
    pub argv: Vec<String>,
    pub delay: Delay,
}

/// A validated config: global settings plus task definitions with unique
/// names, in file order.
#[derive(Debug, Clone)]
pub struct Config {
    pub settings: GlobalSettings,
    pub tasks: Vec<TaskConfig>,
}

impl Config {
    /// Build a config without running validation. Callers must uphold the
    /// invariants themselves (at least one task, unique names, non-empty argv).
    pub(crate) fn new_unchecked(settings: GlobalSettings, tasks: Vec<TaskConfig>) -> Self {
        Self { settings, tasks }
    }
}
