// src/dag/mod.rs

//! DAG representation.
//!
//! - [`task`] defines tasks and their actions.
//! - [`graph`] holds the adjacency-list graph and its traversals.
//! - [`validate`] builds the graph from tasks and enforces its invariants.
//! - [`index`] assigns every task a stable position.
//! - [`instance`] ties everything together with an execution cache.

pub mod graph;
pub mod index;
pub mod instance;
pub mod task;
pub mod validate;

pub use graph::DagGraph;
pub use index::{IndexEntry, LinearIndex};
pub use instance::Dag;
pub use task::{Action, SharedTask, Task};
