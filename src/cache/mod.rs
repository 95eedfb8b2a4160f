// src/cache/mod.rs

//! Per-DAG execution cache.
//!
//! Records, for every task name, when the task last started and finished.
//! The persisted representation is authoritative: every read reloads it and
//! every mutation writes it back before returning, so separate processes
//! working on the same DAG name see each other's history. There is no
//! locking; concurrent writers can overwrite each other.

pub mod state;
pub mod store;

use std::path::Path;

use tracing::{debug, info};

use crate::engine::TaskName;
use crate::errors::Result;

pub use state::{NodeState, now_ns};
pub use store::{CacheMap, JsonFileStore, MemoryStore, StateStore, cache_file_path};

#[derive(Debug)]
pub struct ExecutionCache {
    store: Box<dyn StateStore>,
    nodes: CacheMap,
}

impl ExecutionCache {
    /// Wrap a store, starting from an all-absent view of `names`.
    pub fn new<'a>(store: Box<dyn StateStore>, names: impl IntoIterator<Item = &'a str>) -> Self {
        let nodes = names
            .into_iter()
            .map(|name| (name.to_string(), NodeState::default()))
            .collect();
        Self { store, nodes }
    }

    /// File-backed cache for `dag_name` under `state_dir`.
    pub fn open<'a>(
        state_dir: &Path,
        dag_name: &str,
        names: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self> {
        let store = JsonFileStore::open(state_dir, dag_name)?;
        Ok(Self::new(Box::new(store), names))
    }

    /// Replace the in-memory view with the persisted map.
    ///
    /// Tasks missing from the store, or a store with nothing persisted,
    /// read as never started.
    pub fn reload(&mut self) -> Result<()> {
        let persisted = self.store.load()?.unwrap_or_default();

        for state in self.nodes.values_mut() {
            *state = NodeState::default();
        }
        self.nodes.extend(persisted);
        Ok(())
    }

    /// Fresh state of one task; absent tasks yield the empty state.
    pub fn state(&mut self, task: &str) -> Result<NodeState> {
        self.reload()?;
        Ok(self.nodes.get(task).copied().unwrap_or_default())
    }

    /// Fresh copy of every known state.
    pub fn snapshot(&mut self) -> Result<CacheMap> {
        self.reload()?;
        Ok(self.nodes.clone())
    }

    /// Record that `task` has begun executing.
    pub fn start(&mut self, task: &str) -> Result<()> {
        self.reload()?;
        let state = NodeState::started_at(now_ns());
        self.commit(task, state)?;
        debug!(task = %task, start_ns = ?state.start_ns, "recorded task start");
        Ok(())
    }

    /// Record that `task` has completed, keeping its last start time.
    pub fn finish(&mut self, task: &str) -> Result<()> {
        self.reload()?;
        let previous = self.nodes.get(task).copied().unwrap_or_default();
        let state = previous.finished_at(now_ns());
        self.commit(task, state)?;
        debug!(task = %task, finish_ns = ?state.finish_ns, "recorded task finish");
        Ok(())
    }

    /// Forget all history for this DAG instance.
    pub fn delete(&mut self) -> Result<()> {
        self.store.delete()?;
        for state in self.nodes.values_mut() {
            *state = NodeState::default();
        }
        info!("cleared execution cache");
        Ok(())
    }

    /// Write `state` for `task`; the in-memory view only changes if the
    /// store accepted the write.
    fn commit(&mut self, task: &str, state: NodeState) -> Result<()> {
        let previous: Option<NodeState> = self.nodes.insert(TaskName::from(task), state);

        if let Err(e) = self.store.save(&self.nodes) {
            match previous {
                Some(previous) => self.nodes.insert(task.to_string(), previous),
                None => self.nodes.remove(task),
            };
            return Err(e);
        }

        Ok(())
    }
}
