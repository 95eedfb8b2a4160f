// src/lib.rs

//! A minimal task-orchestration engine.
//!
//! Tasks are declared with their parents, validated into a DAG, and given a
//! stable position each. Subsets are addressed with a small grammar
//! (`"k"`, `"k+"`, `"(k)+"`, `"+k"`, `"+(k)"`) and executed in order, while a
//! per-DAG cache of start/finish timestamps lets backfills skip tasks that
//! are already up to date.

pub mod cache;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod select;
pub mod types;

pub use cache::{ExecutionCache, NodeState};
pub use config::EngineConfig;
pub use dag::{Action, Dag, IndexEntry, LinearIndex, SharedTask, Task};
pub use engine::{RunSummary, Target};
pub use errors::{DagdogError, Result};
pub use select::{Selection, SelectionMode};
pub use types::LogLevel;
