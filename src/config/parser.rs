// src/config/parser.rs

//! Line-oriented parser for the INI-like config format.
//!
//! ```text
//! delay = 1m
//!
//! [log]
//! level = debug
//! time = no
//!
//! [task]
//! name = lock
//! argv = i3lock -n
//! delay = 10m
//! ```

use tracing::warn;

use crate::config::argv::split_argv;
use crate::config::duration::parse_duration;
use crate::config::model::{RawConfig, RawTask};
use crate::errors::ConfigError;
use crate::types::{Delay, LogLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Global,
    Log,
    Task,
    Unknown,
}

/// Parse config text into a [`RawConfig`].
///
/// Only syntax is checked here (keys, values, durations). Required fields,
/// duplicate task names and the "at least one task" rule are checked when the
/// result is converted into a [`crate::config::Config`].
pub fn parse_config(contents: &str) -> Result<RawConfig, ConfigError> {
    let mut cfg = RawConfig::default();
    let mut section = Section::Global;
    let mut seen_log_keys: Vec<String> = Vec::new();

    for (idx, raw_line) in contents.lines().enumerate() {
        let line = idx + 1;
        let s = raw_line.trim();

        if s.is_empty() || s.starts_with('#') {
            continue;
        }

        if let Some(header) = s.strip_prefix('[') {
            let name = header
                .strip_suffix(']')
                .ok_or_else(|| ConfigError::Malformed {
                    line,
                    reason: "missing ']' in section header".to_string(),
                })?
                .trim()
                .to_lowercase();

            section = match name.as_str() {
                "task" => {
                    cfg.tasks.push(RawTask {
                        line,
                        ..RawTask::default()
                    });
                    Section::Task
                }
                "log" => Section::Log,
                other => {
                    warn!(section = %other, line, "config: unknown section");
                    Section::Unknown
                }
            };
            continue;
        }

        if section == Section::Unknown {
            continue;
        }

        let (key, val) = s.split_once('=').ok_or_else(|| ConfigError::Malformed {
            line,
            reason: "missing '='".to_string(),
        })?;
        let key = key.trim().to_lowercase();
        let val = val.trim();

        if val.is_empty() {
            return Err(ConfigError::EmptyValue { line, key });
        }

        match section {
            Section::Global => apply_global_key(&mut cfg, line, key, val)?,
            Section::Log => {
                if seen_log_keys.contains(&key) {
                    return Err(ConfigError::DuplicateKey { line, key });
                }
                seen_log_keys.push(key.clone());
                apply_log_key(&mut cfg, line, key, val)?;
            }
            Section::Task => {
                // A task section is always open here: it was pushed when its
                // header was read.
                if let Some(task) = cfg.tasks.last_mut() {
                    apply_task_key(task, line, key, val)?;
                }
            }
            Section::Unknown => {}
        }
    }

    Ok(cfg)
}

fn apply_global_key(
    cfg: &mut RawConfig,
    line: usize,
    key: String,
    val: &str,
) -> Result<(), ConfigError> {
    match key.as_str() {
        "delay" => {
            if cfg.delay.is_some() {
                return Err(ConfigError::DuplicateKey { line, key });
            }
            let ms = parse_duration(val)
                .map_err(|source| ConfigError::InvalidDuration { line, source })?;
            cfg.delay = Some(ms);
            Ok(())
        }
        _ => Err(ConfigError::UnknownKey { line, key }),
    }
}

fn apply_log_key(
    cfg: &mut RawConfig,
    line: usize,
    key: String,
    val: &str,
) -> Result<(), ConfigError> {
    match key.as_str() {
        "level" => {
            cfg.log.level = val.parse::<LogLevel>().map_err(|_| ConfigError::InvalidValue {
                line,
                key,
                value: val.to_string(),
            })?;
            Ok(())
        }
        "time" => {
            cfg.log.time = parse_bool(val).ok_or_else(|| ConfigError::InvalidValue {
                line,
                key,
                value: val.to_string(),
            })?;
            Ok(())
        }
        _ => Err(ConfigError::UnknownKey { line, key }),
    }
}

fn apply_task_key(
    task: &mut RawTask,
    line: usize,
    key: String,
    val: &str,
) -> Result<(), ConfigError> {
    match key.as_str() {
        "name" => {
            if task.name.is_some() {
                return Err(ConfigError::DuplicateKey { line, key });
            }
            task.name = Some(val.to_string());
        }
        "argv" => {
            if task.argv.is_some() {
                return Err(ConfigError::DuplicateKey { line, key });
            }
            let argv = split_argv(val).map_err(|reason| ConfigError::Malformed { line, reason })?;
            if argv.is_empty() {
                return Err(ConfigError::EmptyValue { line, key });
            }
            task.argv = Some(argv);
        }
        "delay" => {
            if task.delay.is_some() {
                return Err(ConfigError::DuplicateKey { line, key });
            }
            task.delay = Some(parse_delay(val).map_err(|source| {
                ConfigError::InvalidDuration { line, source }
            })?);
        }
        _ => return Err(ConfigError::UnknownKey { line, key }),
    }
    Ok(())
}

/// A task delay: either a duration or `active` for the screensaver edge.
pub fn parse_delay(val: &str) -> Result<Delay, crate::errors::DurationError> {
    match val.trim().to_lowercase().as_str() {
        "active" | "xss" => Ok(Delay::OnActive),
        _ => parse_duration(val).map(Delay::Elapsed),
    }
}

/// Accepts `1/t/true/y/yes/on` and `0/f/false/n/no/off`, case-insensitively.
pub fn parse_bool(val: &str) -> Option<bool> {
    match val.trim().to_lowercase().as_str() {
        "1" | "t" | "true" | "y" | "yes" | "on" => Some(true),
        "0" | "f" | "false" | "n" | "no" | "off" => Some(false),
        _ => None,
    }
}
