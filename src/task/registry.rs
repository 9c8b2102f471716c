// src/task/registry.rs

use tracing::debug;

use crate::errors::Result;
use crate::task::Task;

/// Unordered, growable collection of live tasks.
///
/// Removal swaps the last task into the freed slot, so indices are only
/// stable until the next removal.
#[derive(Debug, Clone, Default)]
pub struct TaskRegistry {
    tasks: Vec<Task>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tasks: Vec::with_capacity(capacity),
        }
    }

    /// Append a task. Fails only if memory for the registry cannot be grown.
    pub fn append(&mut self, task: Task) -> Result<()> {
        self.tasks.try_reserve(1)?;
        self.tasks.push(task);
        Ok(())
    }

    /// Remove the task at `index`, moving the last task into its slot.
    ///
    /// Returns `None` if `index` is out of bounds.
    pub fn remove_at(&mut self, index: usize) -> Option<Task> {
        if index >= self.tasks.len() {
            return None;
        }
        let task = self.tasks.swap_remove(index);
        debug!(task = %task.name(), index, "removed task from registry");
        Some(task)
    }

    pub fn find_by_name(&self, name: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.name() == name)
    }

    pub fn get(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Task> {
        self.tasks.get_mut(index)
    }

    /// Look up a task by name.
    pub fn by_name(&self, name: &str) -> Option<&Task> {
        self.find_by_name(name).and_then(|i| self.get(i))
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tasks.iter().map(|t| t.name())
    }
}

impl<'a> IntoIterator for &'a TaskRegistry {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}

impl IntoIterator for TaskRegistry {
    type Item = Task;
    type IntoIter = std::vec::IntoIter<Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.into_iter()
    }
}
