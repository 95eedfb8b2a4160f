// src/dag/task.rs

//! Tasks: named units of work with declared parents.

use std::fmt;
use std::sync::Arc;

use crate::engine::TaskName;

/// The executable body of a task.
///
/// The engine calls [`Action::run`] once per execution and treats any error
/// as a task failure. Closures returning `anyhow::Result<()>` implement this
/// trait directly.
pub trait Action: Send + Sync {
    fn run(&self) -> anyhow::Result<()>;
}

impl<F> Action for F
where
    F: Fn() -> anyhow::Result<()> + Send + Sync,
{
    fn run(&self) -> anyhow::Result<()> {
        self()
    }
}

/// Tasks are shared between the caller, their children and the DAG.
pub type SharedTask = Arc<Task>;

/// A named unit of work.
///
/// Parents are references used only to build the graph; a task never owns
/// its parents.
pub struct Task {
    name: TaskName,
    action: Box<dyn Action>,
    parents: Vec<SharedTask>,
}

impl Task {
    /// Build a task from a closure.
    pub fn new<F>(name: impl Into<TaskName>, action: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self::with_action(name, action)
    }

    /// Build a task from any [`Action`] implementation.
    pub fn with_action(name: impl Into<TaskName>, action: impl Action + 'static) -> Self {
        Self {
            name: name.into(),
            action: Box::new(action),
            parents: Vec::new(),
        }
    }

    /// Declare the tasks that must run before this one.
    pub fn with_parents<'a, I>(mut self, parents: I) -> Self
    where
        I: IntoIterator<Item = &'a SharedTask>,
    {
        self.parents.extend(parents.into_iter().cloned());
        self
    }

    /// Wrap in an `Arc` so it can be listed as a parent of other tasks.
    pub fn shared(self) -> SharedTask {
        Arc::new(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parents(&self) -> &[SharedTask] {
        &self.parents
    }

    /// Invoke the task's action.
    pub fn run(&self) -> anyhow::Result<()> {
        self.action.run()
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field(
                "parents",
                &self.parents.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}
