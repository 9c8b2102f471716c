// tests/registry.rs

use std::error::Error;

use idlemon::task::{Task, TaskRegistry};
use idlemon::types::Delay;

type TestResult = Result<(), Box<dyn Error>>;

fn task(name: &str) -> Task {
    Task::new(name, vec!["true".to_string()], Delay::Elapsed(1_000))
}

fn registry(names: &[&str]) -> Result<TaskRegistry, Box<dyn Error>> {
    let mut registry = TaskRegistry::with_capacity(names.len());
    for name in names {
        registry.append(task(name))?;
    }
    Ok(registry)
}

#[test]
fn append_keeps_insertion_order() -> TestResult {
    let registry = registry(&["a", "b", "c"])?;
    assert_eq!(registry.len(), 3);
    assert_eq!(registry.names().collect::<Vec<_>>(), ["a", "b", "c"]);
    assert_eq!(registry.find_by_name("b"), Some(1));
    assert!(registry.by_name("d").is_none());
    Ok(())
}

#[test]
fn remove_swaps_last_into_the_hole() -> TestResult {
    let mut registry = registry(&["a", "b", "c", "d"])?;

    let removed = registry.remove_at(1).ok_or("index 1 exists")?;
    assert_eq!(removed.name(), "b");
    assert_eq!(registry.names().collect::<Vec<_>>(), ["a", "d", "c"]);

    // Removing the last slot needs no swap.
    let removed = registry.remove_at(2).ok_or("index 2 exists")?;
    assert_eq!(removed.name(), "c");
    assert_eq!(registry.names().collect::<Vec<_>>(), ["a", "d"]);
    Ok(())
}

#[test]
fn remove_out_of_bounds_is_none() -> TestResult {
    let mut registry = registry(&["a"])?;
    assert!(registry.remove_at(1).is_none());
    assert_eq!(registry.len(), 1);

    let mut empty = TaskRegistry::new();
    assert!(empty.remove_at(0).is_none());
    assert!(empty.is_empty());
    Ok(())
}

#[test]
fn iterates_by_reference_and_by_value() -> TestResult {
    let registry = registry(&["x", "y"])?;

    let borrowed: Vec<&str> = (&registry).into_iter().map(|t| t.name()).collect();
    assert_eq!(borrowed, ["x", "y"]);

    let owned: Vec<Task> = registry.into_iter().collect();
    assert_eq!(owned.len(), 2);
    Ok(())
}
