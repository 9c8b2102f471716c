// tests/reconcile.rs

mod common;
use crate::common::builders::{ConfigBuilder, TaskConfigBuilder};
use crate::common::{FakeProcessBackend, idle, init_tracing};

use std::error::Error;
use std::path::Path;

use idlemon::engine::reconcile::registry_from_tasks;
use idlemon::engine::{Scheduler, reconcile};
use idlemon::exec::ProcessStatus;
use idlemon::fs::mock::MockFileSystem;
use idlemon::task::{Task, TaskState};
use idlemon::types::Delay;

type TestResult = Result<(), Box<dyn Error>>;

const PATH: &str = "/tmp/idlemon.conf";

fn task(name: &str) -> Task {
    Task::new(name, vec!["true".to_string()], Delay::Elapsed(1_000))
}

#[test]
fn running_task_keeps_its_child_and_new_tasks_start_pending() -> TestResult {
    init_tracing();
    let live = registry_from_tasks([
        task("A").with_state(TaskState::Started { pid: 7 }),
        task("B").with_state(TaskState::Completed),
    ])?;
    let candidate = registry_from_tasks([task("A"), task("C")])?;

    let (merged, report) = reconcile(&live, candidate)?;

    assert_eq!(merged.len(), 2);
    let a = merged.by_name("A").ok_or("A kept")?;
    assert_eq!(a.state(), TaskState::Started { pid: 7 });
    assert!(!a.is_temporary());
    let c = merged.by_name("C").ok_or("C added")?;
    assert_eq!(c.state(), TaskState::Pending);
    assert!(merged.by_name("B").is_none());

    assert_eq!(report.carried, ["A"]);
    assert_eq!(report.added, ["C"]);
    assert_eq!(report.dropped, ["B"]);
    assert!(report.retained.is_empty());

    // The live registry is only read.
    assert_eq!(live.len(), 2);
    Ok(())
}

#[test]
fn removed_running_task_is_kept_as_temporary() -> TestResult {
    init_tracing();
    let live = registry_from_tasks([task("A").with_state(TaskState::Started { pid: 7 })])?;
    let candidate = registry_from_tasks([task("C")])?;

    let (merged, report) = reconcile(&live, candidate)?;

    let a = merged.by_name("A").ok_or("A retained")?;
    assert!(a.is_temporary());
    assert_eq!(a.pid(), Some(7));
    assert_eq!(report.retained, ["A"]);
    Ok(())
}

#[test]
fn inherited_completed_state_is_not_rerun() -> TestResult {
    init_tracing();
    let live = registry_from_tasks([task("A").with_state(TaskState::Completed)])?;
    let candidate = registry_from_tasks([task("A")])?;

    let (merged, _) = reconcile(&live, candidate)?;
    assert_eq!(
        merged.by_name("A").map(Task::state),
        Some(TaskState::Completed)
    );
    Ok(())
}

#[test]
fn temporary_task_is_removed_on_the_tick_it_finishes() -> TestResult {
    init_tracing();
    let backend = FakeProcessBackend::starting_at(7);
    let cfg = ConfigBuilder::new()
        .with_task(TaskConfigBuilder::new("A", "sleep 60").delay_ms(1_000).build())
        .with_task(TaskConfigBuilder::new("B", "true").delay_ms(600_000).build())
        .build();
    let mut scheduler = Scheduler::from_config(cfg, backend.clone())?;

    scheduler.advance_all_tasks(&idle(1_000), &idle(0))?;
    assert_eq!(backend.last_pid(), Some(7));

    // A disappears from the config while its child is running.
    let reloaded = ConfigBuilder::new()
        .with_task(TaskConfigBuilder::new("B", "true").delay_ms(600_000).build())
        .build();
    scheduler.install(reloaded)?;
    assert_eq!(scheduler.registry().len(), 2);
    assert!(scheduler.registry().by_name("A").is_some_and(Task::is_temporary));

    scheduler.advance_all_tasks(&idle(2_000), &idle(1_000))?;
    assert_eq!(scheduler.registry().len(), 2);

    backend.finish(7, ProcessStatus::Exited(0));
    scheduler.advance_all_tasks(&idle(3_000), &idle(2_000))?;
    assert_eq!(scheduler.registry().len(), 1);
    assert!(scheduler.registry().by_name("A").is_none());
    assert_eq!(backend.spawn_count(), 1);
    Ok(())
}

#[test]
fn task_moved_into_removed_slot_is_still_advanced() -> TestResult {
    init_tracing();
    let backend = FakeProcessBackend::starting_at(10);
    let cfg = ConfigBuilder::new()
        .with_task(TaskConfigBuilder::new("T1", "sleep 60").delay_ms(0).build())
        .with_task(TaskConfigBuilder::new("T2", "sleep 60").delay_ms(0).build())
        .with_task(TaskConfigBuilder::new("X", "true").delay_ms(600_000).build())
        .build();
    let mut scheduler = Scheduler::from_config(cfg, backend.clone())?;
    scheduler.advance_all_tasks(&idle(0), &idle(0))?;
    assert_eq!(backend.spawn_count(), 2);

    let reloaded = ConfigBuilder::new()
        .with_task(TaskConfigBuilder::new("late", "echo late").delay_ms(1_000).build())
        .build();
    scheduler.install(reloaded)?;
    assert_eq!(
        scheduler.registry().names().collect::<Vec<_>>(),
        ["late", "T1", "T2"]
    );

    // Both temporaries finish on the same tick. Removing T1 moves T2 into
    // its slot, which must be advanced (and removed) in the same pass.
    backend.finish(10, ProcessStatus::Exited(0));
    backend.finish(11, ProcessStatus::Exited(0));
    scheduler.advance_all_tasks(&idle(1_000), &idle(0))?;

    assert_eq!(scheduler.registry().names().collect::<Vec<_>>(), ["late"]);
    assert_eq!(backend.spawn_count(), 3);
    Ok(())
}

#[test]
fn failed_reload_keeps_live_state() -> TestResult {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file(PATH, "delay = 5s\n[task]\nname = A\nargv = true\n");

    let mut scheduler = Scheduler::new(FakeProcessBackend::new());
    scheduler.reload(&fs, Path::new(PATH))?;
    scheduler.advance_all_tasks(&idle(5_000), &idle(0))?;
    assert!(matches!(
        scheduler.registry().by_name("A").map(Task::state),
        Some(TaskState::Started { .. })
    ));

    fs.add_file(PATH, "[task]\nname = A\n");
    assert!(scheduler.reload(&fs, Path::new(PATH)).is_err());

    fs.remove_file(PATH);
    assert!(scheduler.reload(&fs, Path::new(PATH)).is_err());

    assert_eq!(scheduler.settings().delay, 5_000);
    assert_eq!(scheduler.registry().len(), 1);
    assert!(matches!(
        scheduler.registry().by_name("A").map(Task::state),
        Some(TaskState::Started { .. })
    ));
    Ok(())
}

#[test]
fn reload_replaces_settings_and_adds_tasks() -> TestResult {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file(PATH, "[task]\nname = A\nargv = true\n");

    let mut scheduler = Scheduler::new(FakeProcessBackend::new());
    scheduler.reload(&fs, Path::new(PATH))?;
    assert_eq!(scheduler.settings().delay, 60_000);

    fs.add_file(
        PATH,
        "delay = 1s\n[log]\ntime = off\n[task]\nname = A\nargv = true\n[task]\nname = B\nargv = false\n",
    );
    let report = scheduler.reload(&fs, Path::new(PATH))?;
    assert_eq!(report.added, ["B"]);
    assert_eq!(scheduler.settings().delay, 1_000);
    assert!(!scheduler.settings().log.time);
    assert_eq!(scheduler.registry().len(), 2);
    Ok(())
}
