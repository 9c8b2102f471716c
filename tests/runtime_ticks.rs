// tests/runtime_ticks.rs

mod common;
use crate::common::builders::{ConfigBuilder, TaskConfigBuilder};
use crate::common::{FakeIdleSource, FakeProcessBackend, capture_logs, init_tracing, with_timeout};

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use idlemon::config::Config;
use idlemon::engine::{ControlFlags, Runtime, RuntimeOptions, Scheduler};
use idlemon::errors::IdlemonError;
use idlemon::fs::mock::MockFileSystem;
use idlemon::idle::IdleSample;
use idlemon::task::{Task, TaskState};

type TestResult = Result<(), Box<dyn Error>>;

const PATH: &str = "/config/idlemon.conf";

fn one_task(delay_ms: u64) -> Config {
    ConfigBuilder::new()
        .with_task(TaskConfigBuilder::new("lock", "i3lock").delay_ms(delay_ms).build())
        .build()
}

fn runtime(
    cfg: Config,
    source: FakeIdleSource,
    backend: FakeProcessBackend,
    fs: MockFileSystem,
    flags: Arc<ControlFlags>,
) -> Result<Runtime<FakeProcessBackend, FakeIdleSource>, Box<dyn Error>> {
    let scheduler = Scheduler::from_config(cfg, backend)?;
    Ok(Runtime::new(
        scheduler,
        source,
        flags,
        Box::new(fs),
        PathBuf::from(PATH),
        RuntimeOptions {
            tick: Duration::from_millis(5),
        },
    ))
}

fn state_of(runtime: &Runtime<FakeProcessBackend, FakeIdleSource>, name: &str) -> Option<TaskState> {
    runtime.scheduler().registry().by_name(name).map(Task::state)
}

#[test]
fn tick_starts_task_from_idle_source() -> TestResult {
    init_tracing();
    let backend = FakeProcessBackend::new();
    let flags = Arc::new(ControlFlags::new());
    let mut rt = runtime(
        one_task(2_000),
        FakeIdleSource::idle([1_000, 2_000]),
        backend.clone(),
        MockFileSystem::new(),
        flags,
    )?;

    assert!(rt.tick()?);
    assert_eq!(backend.spawn_count(), 0);
    assert!(rt.tick()?);
    assert_eq!(backend.spawn_count(), 1);
    assert_eq!(rt.previous_state().idle_ms, 2_000);
    Ok(())
}

#[test]
fn shutdown_is_seen_at_the_top_of_the_tick() -> TestResult {
    init_tracing();
    let source = FakeIdleSource::idle([600_000]);
    let flags = Arc::new(ControlFlags::new());
    let backend = FakeProcessBackend::new();
    let mut rt = runtime(
        one_task(1_000),
        source.clone(),
        backend.clone(),
        MockFileSystem::new(),
        Arc::clone(&flags),
    )?;

    flags.request_shutdown();
    assert!(!rt.tick()?);
    assert_eq!(source.queries(), 0);
    assert_eq!(backend.spawn_count(), 0);
    Ok(())
}

#[test]
fn ping_lowers_idle_time() -> TestResult {
    init_tracing();
    let backend = FakeProcessBackend::new();
    let flags = Arc::new(ControlFlags::new());
    let mut rt = runtime(
        one_task(60_000),
        FakeIdleSource::idle([600_000]),
        backend.clone(),
        MockFileSystem::new(),
        Arc::clone(&flags),
    )?;

    flags.ping().ping();
    assert!(rt.tick()?);

    assert!(rt.previous_state().idle_ms < 60_000);
    assert_eq!(backend.spawn_count(), 0);
    Ok(())
}

#[test]
fn unpinged_timer_leaves_source_idle_untouched() -> TestResult {
    init_tracing();
    let flags = Arc::new(ControlFlags::new());
    let mut rt = runtime(
        one_task(0),
        FakeIdleSource::new([IdleSample {
            idle_ms: u64::MAX,
            active: false,
        }]),
        FakeProcessBackend::new(),
        MockFileSystem::new(),
        Arc::clone(&flags),
    )?;

    // Never pinged: the idle source's value stands.
    assert!(rt.tick()?);
    assert_eq!(rt.previous_state().idle_ms, u64::MAX);
    Ok(())
}

#[test]
fn reload_request_is_applied_on_next_tick() -> TestResult {
    init_tracing();
    let fs = MockFileSystem::new();
    let flags = Arc::new(ControlFlags::new());
    let backend = FakeProcessBackend::new();
    let mut rt = runtime(
        one_task(600_000),
        FakeIdleSource::idle([1_000, 2_000, 3_000]),
        backend.clone(),
        fs.clone(),
        Arc::clone(&flags),
    )?;

    assert!(rt.tick()?);

    fs.add_file(
        PATH,
        "[task]\nname = lock\nargv = i3lock\ndelay = 2s\n[task]\nname = dim\nargv = dim\ndelay = 2s\n",
    );
    flags.request_reload();
    assert!(rt.tick()?);

    assert_eq!(rt.scheduler().registry().len(), 2);
    assert_eq!(backend.spawn_count(), 2);
    assert!(!flags.take_reload());
    Ok(())
}

#[test]
fn reload_log_line_counts_every_kind_of_change() -> TestResult {
    let fs = MockFileSystem::new();
    let flags = Arc::new(ControlFlags::new());
    let mut rt = runtime(
        one_task(600_000),
        FakeIdleSource::idle([1_000]),
        FakeProcessBackend::new(),
        fs.clone(),
        Arc::clone(&flags),
    )?;

    fs.add_file(PATH, "[task]\nname = lock\nargv = i3lock\n[task]\nname = dim\nargv = dim\n");
    flags.request_reload();

    let mut ticked = Ok(false);
    let logs = capture_logs(|| ticked = rt.tick());
    assert!(ticked?);

    let line = logs
        .lines()
        .find(|l| l.contains("config: reloaded"))
        .ok_or("no reload log line")?;
    for field in ["carried=1", "added=1", "retained=0", "dropped=0"] {
        assert!(line.contains(field), "{field} missing from {line}");
    }
    Ok(())
}

#[test]
fn failed_reload_keeps_running_with_old_config() -> TestResult {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file(PATH, "[task]\nname = lock\n");
    let flags = Arc::new(ControlFlags::new());
    let mut rt = runtime(
        one_task(1_000),
        FakeIdleSource::idle([0, 1_000]),
        FakeProcessBackend::starting_at(5),
        fs,
        Arc::clone(&flags),
    )?;

    flags.request_reload();
    assert!(rt.tick()?);
    assert!(rt.tick()?);

    assert_eq!(rt.scheduler().registry().len(), 1);
    assert_eq!(state_of(&rt, "lock"), Some(TaskState::Started { pid: 5 }));
    Ok(())
}

#[test]
fn idle_source_failure_is_fatal() -> TestResult {
    init_tracing();
    let flags = Arc::new(ControlFlags::new());
    let mut rt = runtime(
        one_task(1_000),
        FakeIdleSource::failing(),
        FakeProcessBackend::new(),
        MockFileSystem::new(),
        flags,
    )?;

    assert!(matches!(rt.tick(), Err(IdlemonError::IdleSource(_))));
    Ok(())
}

#[tokio::test]
async fn run_stops_after_shutdown_request() -> TestResult {
    init_tracing();
    let flags = Arc::new(ControlFlags::new());
    let backend = FakeProcessBackend::new();
    let source =
        FakeIdleSource::idle([0, 500, 1_000, 1_500]).shutdown_when_done(Arc::clone(&flags));
    let rt = runtime(
        one_task(1_000),
        source.clone(),
        backend.clone(),
        MockFileSystem::new(),
        Arc::clone(&flags),
    )?;

    with_timeout(rt.run()).await?;

    assert!(!flags.is_running());
    assert_eq!(source.queries(), 5);
    assert_eq!(backend.spawn_count(), 1);
    Ok(())
}
