// src/errors.rs

//! Crate-wide error type.
//!
//! Graph validation errors are raised eagerly when a [`Dag`](crate::dag::Dag)
//! is built. Selection errors surface from `select` before anything runs.
//! Task and cache failures abort the operation in progress.

use std::path::PathBuf;

use thiserror::Error;

use crate::engine::TaskName;

#[derive(Error, Debug)]
pub enum DagdogError {
    #[error("Cycle detected in DAG: {0}")]
    Cycle(String),

    #[error("Duplicate task name in DAG: '{0}'")]
    DuplicateName(TaskName),

    #[error("Task '{task}' depends on '{parent}' which is not part of the DAG")]
    UnknownDependency { task: TaskName, parent: TaskName },

    #[error("Invalid selection expression '{expression}': {reason}")]
    Parse { expression: String, reason: String },

    #[error("Unknown position {position} (DAG has {len} tasks)")]
    UnknownPosition { position: usize, len: usize },

    #[error("Task '{task}' failed: {source}")]
    TaskExecution {
        task: TaskName,
        #[source]
        source: anyhow::Error,
    },

    #[error("Cache IO error at {path:?}: {source}")]
    CacheIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt cache file at {path:?}: {source}")]
    CacheCorrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl DagdogError {
    pub(crate) fn cache_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DagdogError::CacheIo {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, DagdogError>;
