// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod idle;
pub mod instance;
pub mod logging;
pub mod task;
pub mod types;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{Config, default_config_path, load_and_validate};
use crate::engine::{ControlFlags, Runtime, RuntimeOptions, Scheduler, install_signal_handlers};
use crate::errors::IdlemonError;
use crate::exec::TokioProcessBackend;
use crate::fs::RealFileSystem;
use crate::idle::open_idle_source;
use crate::instance::{InstanceSignal, find_active_instance, signal_instance};
use crate::logging::LogHandle;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - single-instance detection (and `--ping` / `--reload` forwarding)
/// - config loading
/// - idle source
/// - signal listeners
/// - scheduler + tick loop
pub async fn run(args: CliArgs, log: LogHandle) -> Result<()> {
    let active_instance = find_active_instance()?;

    if args.ping || args.reload {
        let pid = active_instance.ok_or(IdlemonError::NoActiveInstance)?;
        let sig = if args.ping {
            InstanceSignal::Ping
        } else {
            InstanceSignal::Reload
        };
        signal_instance(pid, sig)?;
        debug!(pid, ?sig, "signalled active instance");
        return Ok(());
    }

    let config_path = match args.config {
        Some(path) => PathBuf::from(path),
        None => default_config_path()
            .ok_or_else(|| anyhow!("cannot determine the user config directory"))?,
    };

    let fs = RealFileSystem;
    let cfg = load_and_validate(&fs, &config_path)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    // Only allow a single instance.
    if let Some(pid) = active_instance {
        return Err(IdlemonError::ActiveInstance(pid).into());
    }

    log.apply(&cfg.settings.log);
    info!(path = %config_path.display(), "config: loaded");

    let idle_source = open_idle_source(args.idle_source)?;

    let flags = Arc::new(ControlFlags::new());
    install_signal_handlers(Arc::clone(&flags))?;

    let scheduler = Scheduler::from_config(cfg, TokioProcessBackend::new())?;

    let runtime = Runtime::new(
        scheduler,
        idle_source,
        flags,
        Box::new(fs),
        config_path,
        RuntimeOptions::default(),
    )
    .with_log_handle(log);

    runtime.run().await?;
    Ok(())
}

/// Simple dry-run output: print settings and tasks.
fn print_dry_run(cfg: &Config) {
    println!("idlemon dry-run");
    println!("  delay = {}ms", cfg.settings.delay);
    println!("  log.level = {}", cfg.settings.log.level);
    println!("  log.time = {}", cfg.settings.log.time);
    println!();

    println!("tasks ({}):", cfg.tasks.len());
    for task in &cfg.tasks {
        println!("  - {}", task.name);
        println!("      argv: {:?}", task.argv);
        println!("      delay: {}", task.delay);
    }

    debug!("dry-run complete (no execution)");
}
