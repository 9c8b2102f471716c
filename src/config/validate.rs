// src/config/validate.rs

use std::collections::HashSet;

use crate::config::model::{
    Config, DEFAULT_DELAY_MS, GlobalSettings, RawConfig, RawTask, TaskConfig,
};
use crate::errors::{ConfigError, IdlemonError};
use crate::types::Delay;

impl TryFrom<RawConfig> for Config {
    type Error = IdlemonError;

    fn try_from(raw: RawConfig) -> std::result::Result<Self, Self::Error> {
        Ok(validate_raw_config(raw)?)
    }
}

fn validate_raw_config(raw: RawConfig) -> Result<Config, ConfigError> {
    ensure_has_tasks(&raw)?;

    let settings = GlobalSettings {
        delay: raw.delay.unwrap_or(DEFAULT_DELAY_MS),
        log: raw.log,
    };

    let mut seen: HashSet<String> = HashSet::new();
    let mut tasks = Vec::with_capacity(raw.tasks.len());

    for raw_task in raw.tasks {
        let task = resolve_task(raw_task, settings.delay)?;
        if !seen.insert(task.config.name.clone()) {
            return Err(ConfigError::DuplicateTask {
                line: task.line,
                name: task.config.name,
            });
        }
        tasks.push(task.config);
    }

    Ok(Config::new_unchecked(settings, tasks))
}

fn ensure_has_tasks(raw: &RawConfig) -> Result<(), ConfigError> {
    if raw.tasks.is_empty() {
        return Err(ConfigError::NoTasks);
    }
    Ok(())
}

struct ResolvedTask {
    line: usize,
    config: TaskConfig,
}

fn resolve_task(raw: RawTask, default_delay: u64) -> Result<ResolvedTask, ConfigError> {
    let name = raw.name.ok_or(ConfigError::MissingField {
        line: raw.line,
        field: "name",
    })?;
    let argv = raw.argv.ok_or(ConfigError::MissingField {
        line: raw.line,
        field: "argv",
    })?;

    Ok(ResolvedTask {
        line: raw.line,
        config: TaskConfig {
            name,
            argv,
            delay: raw.delay.unwrap_or(Delay::Elapsed(default_delay)),
        },
    })
}
