// src/engine/mod.rs

//! Execution engine.
//!
//! Runs an ordered list of index entries one at a time, bracketing every
//! action with cache `start`/`finish` records. The first failing action
//! stops the run; its task is left started but unfinished in the cache.
//!
//! [`Target`] describes what a caller wants to run; [`crate::dag::Dag::run`]
//! turns it into entries and hands them to [`run_sequence`].

pub mod orchestrator;

/// Canonical task name type used throughout the crate.
pub type TaskName = String;

pub use orchestrator::{RunSummary, run_sequence};

/// What to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Every task, in index order.
    All,
    /// A single task by position.
    Position(usize),
    /// A selection expression such as `"+3"`.
    Expression { expr: String, force: bool },
}

impl Target {
    /// Expression target that bypasses staleness pruning.
    pub fn forced(expr: impl Into<String>) -> Self {
        Target::Expression {
            expr: expr.into(),
            force: true,
        }
    }
}

impl From<usize> for Target {
    fn from(position: usize) -> Self {
        Target::Position(position)
    }
}

impl From<&str> for Target {
    fn from(expr: &str) -> Self {
        Target::Expression {
            expr: expr.to_string(),
            force: false,
        }
    }
}

impl From<String> for Target {
    fn from(expr: String) -> Self {
        Target::Expression { expr, force: false }
    }
}

impl<T: Into<Target>> From<Option<T>> for Target {
    fn from(target: Option<T>) -> Self {
        target.map_or(Target::All, Into::into)
    }
}
