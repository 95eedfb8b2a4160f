// src/cache/store.rs

//! Persistence backends for the execution cache.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cache::state::NodeState;
use crate::engine::TaskName;
use crate::errors::{DagdogError, Result};

/// Logical content of a cache: task name -> state.
pub type CacheMap = BTreeMap<TaskName, NodeState>;

/// Abstract storage for one DAG instance's cache.
pub trait StateStore: Send + Sync + Debug {
    /// Read the persisted map, or `None` if nothing has been written yet.
    fn load(&self) -> Result<Option<CacheMap>>;
    /// Replace the persisted map.
    fn save(&mut self, nodes: &CacheMap) -> Result<()>;
    /// Remove everything persisted for this DAG instance.
    fn delete(&mut self) -> Result<()>;
}

/// Stores the cache as pretty-printed JSON at `<state_dir>/<dag name>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create the store, creating `state_dir` if it does not exist.
    pub fn open(state_dir: &Path, dag_name: &str) -> Result<Self> {
        fs::create_dir_all(state_dir).map_err(|e| DagdogError::cache_io(state_dir, e))?;
        Ok(Self {
            path: cache_file_path(state_dir, dag_name),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Location of the cache file for `dag_name` inside `state_dir`.
pub fn cache_file_path(state_dir: &Path, dag_name: &str) -> PathBuf {
    state_dir.join(format!("{dag_name}.json"))
}

impl StateStore for JsonFileStore {
    fn load(&self) -> Result<Option<CacheMap>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(DagdogError::cache_io(&self.path, e)),
        };

        let nodes: CacheMap =
            serde_json::from_str(&contents).map_err(|source| DagdogError::CacheCorrupt {
                path: self.path.clone(),
                source,
            })?;

        debug!(path = ?self.path, entries = nodes.len(), "loaded cache file");
        Ok(Some(nodes))
    }

    fn save(&mut self, nodes: &CacheMap) -> Result<()> {
        let json =
            serde_json::to_string_pretty(nodes).map_err(|source| DagdogError::CacheCorrupt {
                path: self.path.clone(),
                source,
            })?;

        fs::write(&self.path, json).map_err(|e| DagdogError::cache_io(&self.path, e))?;
        debug!(path = ?self.path, entries = nodes.len(), "saved cache file");
        Ok(())
    }

    fn delete(&mut self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = ?self.path, "deleted cache file");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DagdogError::cache_io(&self.path, e)),
        }
    }
}

/// Keeps the cache in memory only (lost when dropped).
#[derive(Debug, Default)]
pub struct MemoryStore {
    nodes: Option<CacheMap>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<Option<CacheMap>> {
        Ok(self.nodes.clone())
    }

    fn save(&mut self, nodes: &CacheMap) -> Result<()> {
        self.nodes = Some(nodes.clone());
        Ok(())
    }

    fn delete(&mut self) -> Result<()> {
        self.nodes = None;
        Ok(())
    }
}
