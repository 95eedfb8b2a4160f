// src/engine/orchestrator.rs

use std::time::Instant;

use tracing::{info, warn};

use crate::cache::ExecutionCache;
use crate::dag::IndexEntry;
use crate::engine::TaskName;
use crate::errors::{DagdogError, Result};

/// Tasks executed by a successful run, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub executed: Vec<TaskName>,
}

impl RunSummary {
    pub fn is_empty(&self) -> bool {
        self.executed.is_empty()
    }
}

/// Execute `entries` sequentially.
///
/// For each entry: record the start, run the action, record the finish. A
/// failing action returns [`DagdogError::TaskExecution`] immediately and no
/// later entry runs.
pub fn run_sequence(entries: &[IndexEntry], cache: &mut ExecutionCache) -> Result<RunSummary> {
    let mut summary = RunSummary::default();

    for entry in entries {
        cache.start(&entry.name)?;
        info!(task = %entry.name, position = entry.position, "task started");

        let started = Instant::now();
        if let Err(source) = entry.task.run() {
            warn!(
                task = %entry.name,
                position = entry.position,
                error = %source,
                "task failed; aborting run"
            );
            return Err(DagdogError::TaskExecution {
                task: entry.name.clone(),
                source,
            });
        }

        cache.finish(&entry.name)?;
        info!(
            task = %entry.name,
            position = entry.position,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "task finished"
        );
        summary.executed.push(entry.name.clone());
    }

    info!(executed = summary.executed.len(), "run complete");
    Ok(summary)
}
