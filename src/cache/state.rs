// src/cache/state.rs

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Last recorded execution window of one task.
///
/// Both fields are nanoseconds since the Unix epoch. `finish_ns` is `None`
/// when the task never completed, or when its latest start has not finished.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeState {
    #[serde(default)]
    pub start_ns: Option<u64>,
    #[serde(default)]
    pub finish_ns: Option<u64>,
}

impl NodeState {
    /// State recorded when a task begins.
    pub fn started_at(start_ns: u64) -> Self {
        Self {
            start_ns: Some(start_ns),
            finish_ns: None,
        }
    }

    /// State recorded when a task completes, keeping the previous start.
    pub fn finished_at(self, finish_ns: u64) -> Self {
        Self {
            start_ns: self.start_ns,
            finish_ns: Some(finish_ns),
        }
    }

    pub fn has_finished(&self) -> bool {
        self.finish_ns.is_some()
    }
}

/// Current wall-clock time in nanoseconds since the Unix epoch.
pub fn now_ns() -> u64 {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX)
}
