#![allow(dead_code)]

use std::path::Path;

use dagdog::{Dag, SharedTask, Task};

use crate::actions::ExecutionLog;

/// Builder for task lists whose actions record into an [`ExecutionLog`].
///
/// Parents are referenced by name and must be added before their children.
pub struct TaskListBuilder {
    log: ExecutionLog,
    tasks: Vec<SharedTask>,
}

impl TaskListBuilder {
    pub fn new(log: &ExecutionLog) -> Self {
        Self {
            log: log.clone(),
            tasks: Vec::new(),
        }
    }

    pub fn task(self, name: &str, parents: &[&str]) -> Self {
        let action = self.log.recorder(name);
        self.push(Task::new(name, action), parents)
    }

    pub fn failing_task(self, name: &str, parents: &[&str]) -> Self {
        let action = self.log.failing(name);
        self.push(Task::new(name, action), parents)
    }

    fn push(mut self, task: Task, parents: &[&str]) -> Self {
        let parents: Vec<SharedTask> = parents
            .iter()
            .map(|p| {
                self.tasks
                    .iter()
                    .find(|t| t.name() == *p)
                    .cloned()
                    .unwrap_or_else(|| panic!("parent {p} must be added first"))
            })
            .collect();
        self.tasks.push(task.with_parents(&parents).shared());
        self
    }

    pub fn build(self) -> Vec<SharedTask> {
        self.tasks
    }
}

/// Diamond: `a` -> {`b`, `c`} -> `d`, positions 0..=3.
pub fn diamond_tasks(log: &ExecutionLog) -> Vec<SharedTask> {
    TaskListBuilder::new(log)
        .task("a", &[])
        .task("b", &["a"])
        .task("c", &["a"])
        .task("d", &["b", "c"])
        .build()
}

/// Chain `t0` -> `t1` -> ... of length `len`.
pub fn chain_tasks(log: &ExecutionLog, len: usize) -> Vec<SharedTask> {
    let mut builder = TaskListBuilder::new(log);
    for i in 0..len {
        let name = format!("t{i}");
        let parent = format!("t{}", i.wrapping_sub(1));
        builder = if i == 0 {
            builder.task(&name, &[])
        } else {
            builder.task(&name, &[parent.as_str()])
        };
    }
    builder.build()
}

/// File-backed diamond DAG named `name` under `state_dir`.
pub fn diamond_dag(name: &str, state_dir: &Path, log: &ExecutionLog) -> Dag {
    Dag::new(name, diamond_tasks(log), state_dir).expect("diamond DAG must be valid")
}
