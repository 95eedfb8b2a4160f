// src/dag/instance.rs

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::cache::{CacheMap, ExecutionCache, NodeState, StateStore};
use crate::config::EngineConfig;
use crate::dag::graph::DagGraph;
use crate::dag::index::{IndexEntry, LinearIndex};
use crate::dag::task::SharedTask;
use crate::dag::validate::build_graph;
use crate::engine::{RunSummary, Target, run_sequence};
use crate::errors::Result;
use crate::select::{Selection, Selector};

/// A validated DAG instance with its index and execution cache.
///
/// Construction validates the task list and fails on duplicate names,
/// unknown parents, or cycles; a `Dag` value is always valid.
#[derive(Debug)]
pub struct Dag {
    name: String,
    tasks: Vec<SharedTask>,
    /// Edges keyed by index position.
    graph: DagGraph,
    index: LinearIndex,
    cache: ExecutionCache,
    state_dir: Option<PathBuf>,
}

impl Dag {
    /// Build a DAG whose cache lives at `<state_dir>/<name>.json`.
    ///
    /// `state_dir` is created if missing.
    pub fn new(
        name: impl Into<String>,
        tasks: Vec<SharedTask>,
        state_dir: impl AsRef<Path>,
    ) -> Result<Self> {
        let name = name.into();
        let state_dir = state_dir.as_ref();
        let (graph, index) = Self::linearize(&tasks)?;
        let cache = ExecutionCache::open(state_dir, &name, index.iter().map(|e| e.name.as_str()))?;

        info!(dag = %name, tasks = index.len(), state_dir = ?state_dir, "built DAG");
        Ok(Self {
            name,
            tasks,
            graph,
            index,
            cache,
            state_dir: Some(state_dir.to_path_buf()),
        })
    }

    /// Build a DAG using the state directory from `config`.
    pub fn from_config(
        name: impl Into<String>,
        tasks: Vec<SharedTask>,
        config: &EngineConfig,
    ) -> Result<Self> {
        Self::new(name, tasks, &config.state_dir)
    }

    /// Build a DAG on top of a custom cache store.
    pub fn with_store(
        name: impl Into<String>,
        tasks: Vec<SharedTask>,
        store: Box<dyn StateStore>,
    ) -> Result<Self> {
        let name = name.into();
        let (graph, index) = Self::linearize(&tasks)?;
        let cache = ExecutionCache::new(store, index.iter().map(|e| e.name.as_str()));

        info!(dag = %name, tasks = index.len(), "built DAG with custom store");
        Ok(Self {
            name,
            tasks,
            graph,
            index,
            cache,
            state_dir: None,
        })
    }

    fn linearize(tasks: &[SharedTask]) -> Result<(DagGraph, LinearIndex)> {
        let by_declaration = build_graph(tasks)?;
        let index = LinearIndex::build(&by_declaration, tasks);
        let graph = by_declaration.relabel(|node| index.position_of_node(node));
        Ok((graph, index))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tasks in declaration order.
    pub fn tasks(&self) -> &[SharedTask] {
        &self.tasks
    }

    pub fn index(&self) -> &LinearIndex {
        &self.index
    }

    /// Dependency graph keyed by index position.
    pub fn graph(&self) -> &DagGraph {
        &self.graph
    }

    /// Directory holding the cache file, if file-backed.
    pub fn state_dir(&self) -> Option<&Path> {
        self.state_dir.as_deref()
    }

    /// Recorded state of one task, freshly read from the cache.
    pub fn state(&mut self, task: &str) -> Result<NodeState> {
        self.cache.state(task)
    }

    /// Recorded state of every task, freshly read from the cache.
    pub fn snapshot(&mut self) -> Result<CacheMap> {
        self.cache.snapshot()
    }

    /// Forget all recorded executions for this DAG.
    pub fn delete_cache(&mut self) -> Result<()> {
        self.cache.delete()
    }

    /// Human-readable listing of the index.
    pub fn ls(&self) -> String {
        self.index.to_string()
    }

    /// Resolve a selection expression into index entries.
    pub fn select(&mut self, expr: &str, force: bool) -> Result<Vec<IndexEntry>> {
        let selection = Selection::parse(expr)?;
        self.select_parsed(&selection, force)
    }

    /// Resolve an already parsed selection.
    pub fn select_parsed(&mut self, selection: &Selection, force: bool) -> Result<Vec<IndexEntry>> {
        let entries =
            Selector::new(&self.graph, &self.index).resolve(selection, force, &mut self.cache)?;
        debug!(
            dag = %self.name,
            %selection,
            force,
            positions = ?entries.iter().map(|e| e.position).collect::<Vec<_>>(),
            "resolved selection"
        );
        Ok(entries)
    }

    /// Execute `target`.
    ///
    /// ```ignore
    /// dag.run(Target::All)?;
    /// dag.run(0)?;
    /// dag.run("+3")?;
    /// dag.run(Target::forced("+3"))?;
    /// ```
    pub fn run(&mut self, target: impl Into<Target>) -> Result<RunSummary> {
        let entries = match target.into() {
            Target::All => self.index.entries().to_vec(),
            Target::Position(position) => {
                self.select_parsed(&Selection::single(position), false)?
            }
            Target::Expression { expr, force } => self.select(&expr, force)?,
        };

        info!(dag = %self.name, tasks = entries.len(), "starting run");
        run_sequence(&entries, &mut self.cache)
    }
}
