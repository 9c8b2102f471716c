#![allow(dead_code)]

use idlemon::config::{Config, LogSettings, RawConfig, RawTask, TaskConfig};
use idlemon::task::Task;
use idlemon::types::{Delay, LogLevel};

/// Builder for `Config` to simplify test setup.
///
/// Goes through the same `RawConfig -> Config` validation as a loaded file.
pub struct ConfigBuilder {
    config: RawConfig,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfig::default(),
        }
    }

    pub fn with_task(mut self, task: TaskConfig) -> Self {
        let line = self.config.tasks.len() + 1;
        self.config.tasks.push(RawTask {
            line,
            name: Some(task.name),
            argv: Some(task.argv),
            delay: Some(task.delay),
        });
        self
    }

    pub fn with_delay(mut self, ms: u64) -> Self {
        self.config.delay = Some(ms);
        self
    }

    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.config.log = LogSettings {
            level,
            ..self.config.log
        };
        self
    }

    pub fn build(self) -> Config {
        Config::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `TaskConfig`.
pub struct TaskConfigBuilder {
    task: TaskConfig,
}

impl TaskConfigBuilder {
    /// A task named `name` running `argv` (split on whitespace) after 60s.
    pub fn new(name: &str, argv: &str) -> Self {
        Self {
            task: TaskConfig {
                name: name.to_string(),
                argv: argv.split_whitespace().map(str::to_string).collect(),
                delay: Delay::Elapsed(60_000),
            },
        }
    }

    pub fn delay_ms(mut self, ms: u64) -> Self {
        self.task.delay = Delay::Elapsed(ms);
        self
    }

    pub fn on_active(mut self) -> Self {
        self.task.delay = Delay::OnActive;
        self
    }

    pub fn build(self) -> TaskConfig {
        self.task
    }

    /// Build straight into a fresh `Pending` task.
    pub fn build_task(self) -> Task {
        Task::from_config(self.task)
    }
}
