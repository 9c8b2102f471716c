// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::Parser;

use crate::types::{IdleBackend, LogLevel};

/// Command-line arguments for `idlemon`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "idlemon",
    version,
    about = "Execute tasks based on the time the system has been idle.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file.
    ///
    /// Default: `$XDG_CONFIG_HOME/idlemon.conf` or `~/.config/idlemon.conf`.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<String>,

    /// Ping the active instance, resetting its idle timer.
    #[arg(short, long, conflicts_with = "reload")]
    pub ping: bool,

    /// Reload the config of the active instance.
    #[arg(short, long)]
    pub reload: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `IDLEMON_LOG` or the config's `[log] level` is used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Where idle time comes from.
    #[arg(long, value_enum, value_name = "SOURCE", default_value_t = IdleBackend::default())]
    pub idle_source: IdleBackend,

    /// Parse + validate the config and print the tasks, but run nothing.
    #[arg(long)]
    pub dry_run: bool,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
