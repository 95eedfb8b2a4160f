// src/dag/index.rs

//! Deterministic linear addressing of DAG tasks.

use std::fmt;

use crate::dag::graph::DagGraph;
use crate::dag::task::{SharedTask, Task};
use crate::errors::{DagdogError, Result};

/// One row of the [`LinearIndex`].
#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub position: usize,
    pub name: String,
    pub task: SharedTask,
    /// Positions of the task's direct parents, ascending.
    pub parent_positions: Vec<usize>,
}

/// Topological linearization of a validated graph.
///
/// Every parent has a lower position than each of its children. Ties between
/// independent branches are broken by declaration order, so positions are
/// reproducible for an unchanged task list.
#[derive(Debug, Clone)]
pub struct LinearIndex {
    entries: Vec<IndexEntry>,
    /// Declaration index -> position.
    positions: Vec<usize>,
}

impl LinearIndex {
    /// Build the index. `graph` must be acyclic and node `i` must be `tasks[i]`.
    pub fn build(graph: &DagGraph, tasks: &[SharedTask]) -> Self {
        let order = graph.topological_order();

        let mut positions = vec![0; tasks.len()];
        for (position, &node) in order.iter().enumerate() {
            positions[node] = position;
        }

        let entries = order
            .iter()
            .enumerate()
            .map(|(position, &node)| {
                let mut parent_positions: Vec<usize> = graph
                    .parents_of(node)
                    .into_iter()
                    .map(|p| positions[p])
                    .collect();
                parent_positions.sort_unstable();

                IndexEntry {
                    position,
                    name: tasks[node].name().to_string(),
                    task: SharedTask::clone(&tasks[node]),
                    parent_positions,
                }
            })
            .collect();

        Self { entries, positions }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `position`, or `UnknownPosition`.
    pub fn entry(&self, position: usize) -> Result<&IndexEntry> {
        self.entries.get(position).ok_or(DagdogError::UnknownPosition {
            position,
            len: self.entries.len(),
        })
    }

    /// Task at `position`.
    pub fn task(&self, position: usize) -> Result<&Task> {
        self.entry(position).map(|e| e.task.as_ref())
    }

    /// Position of the task with the given name.
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.position)
    }

    /// Position of the `i`-th declared task.
    pub(crate) fn position_of_node(&self, node: usize) -> usize {
        self.positions[node]
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }
}

impl fmt::Display for LinearIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .entries
            .iter()
            .map(|e| e.name.len())
            .max()
            .unwrap_or(0)
            .max("name".len());

        writeln!(f, "{:>8}  {:<width$}  parents", "position", "name")?;
        for entry in &self.entries {
            let parents: Vec<String> = entry
                .parent_positions
                .iter()
                .map(|p| p.to_string())
                .collect();
            writeln!(
                f,
                "{:>8}  {:<width$}  [{}]",
                entry.position,
                entry.name,
                parents.join(", ")
            )?;
        }
        Ok(())
    }
}
