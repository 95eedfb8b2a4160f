// src/dag/validate.rs

//! Graph construction and validation.
//!
//! Checks, in order:
//! - task names are pairwise distinct,
//! - every declared parent is one of the DAG's tasks,
//! - the parent -> child graph is acyclic.

use std::collections::HashMap;

use tracing::debug;

use crate::dag::graph::DagGraph;
use crate::dag::task::SharedTask;
use crate::errors::{DagdogError, Result};

/// Build the dependency graph for `tasks` and validate it.
///
/// Node `i` of the returned graph is `tasks[i]`.
pub fn build_graph(tasks: &[SharedTask]) -> Result<DagGraph> {
    let by_name = index_names(tasks)?;
    let edges = collect_edges(tasks, &by_name)?;
    let graph = DagGraph::from_edges(tasks.len(), edges);
    ensure_acyclic(&graph, tasks)?;

    debug!(tasks = tasks.len(), "validated task graph");
    Ok(graph)
}

fn index_names(tasks: &[SharedTask]) -> Result<HashMap<&str, usize>> {
    let mut by_name = HashMap::with_capacity(tasks.len());

    for (i, task) in tasks.iter().enumerate() {
        if by_name.insert(task.name(), i).is_some() {
            return Err(DagdogError::DuplicateName(task.name().to_string()));
        }
    }

    Ok(by_name)
}

fn collect_edges(
    tasks: &[SharedTask],
    by_name: &HashMap<&str, usize>,
) -> Result<Vec<(usize, usize)>> {
    let mut edges = Vec::new();

    for (child, task) in tasks.iter().enumerate() {
        for parent in task.parents() {
            let Some(&parent_idx) = by_name.get(parent.name()) else {
                return Err(DagdogError::UnknownDependency {
                    task: task.name().to_string(),
                    parent: parent.name().to_string(),
                });
            };
            edges.push((parent_idx, child));
        }
    }

    Ok(edges)
}

fn ensure_acyclic(graph: &DagGraph, tasks: &[SharedTask]) -> Result<()> {
    match graph.find_cycle() {
        None => Ok(()),
        Some(cycle) => {
            let path: Vec<&str> = cycle.iter().map(|&i| tasks[i].name()).collect();
            Err(DagdogError::Cycle(format!(
                "cycle detected between tasks: {}",
                path.join(" -> ")
            )))
        }
    }
}
