// src/select/mod.rs

//! Selection of task subsets.
//!
//! - [`expression`] parses the selection grammar into a [`Selection`].
//! - [`prune`] decides which backfill candidates are already up to date.
//! - [`Selector`] resolves a selection against a DAG's index and cache.

pub mod expression;
pub mod prune;

use std::collections::BTreeSet;

use tracing::debug;

use crate::cache::ExecutionCache;
use crate::dag::{DagGraph, IndexEntry, LinearIndex};
use crate::errors::Result;

pub use expression::{Selection, SelectionMode};
pub use prune::{Freshness, freshness, prune_stale};

/// Resolves selections against a position-keyed graph and its index.
#[derive(Debug, Clone, Copy)]
pub struct Selector<'a> {
    graph: &'a DagGraph,
    index: &'a LinearIndex,
}

impl<'a> Selector<'a> {
    pub fn new(graph: &'a DagGraph, index: &'a LinearIndex) -> Self {
        Self { graph, index }
    }

    /// Positions covered by `selection` before pruning and exclusion.
    pub fn candidates(&self, selection: &Selection) -> Result<BTreeSet<usize>> {
        let target = self.index.entry(selection.position)?.position;

        let mut set = match selection.mode {
            SelectionMode::Single => BTreeSet::new(),
            SelectionMode::Forward => self.graph.descendants(target),
            SelectionMode::Backfill => self.graph.ancestors(target),
        };
        set.insert(target);
        Ok(set)
    }

    /// Resolve `selection` into index entries, ascending by position.
    ///
    /// Backfill selections consult `cache` and drop up-to-date tasks unless
    /// `force` is set. Other modes never read the cache.
    pub fn resolve(
        &self,
        selection: &Selection,
        force: bool,
        cache: &mut ExecutionCache,
    ) -> Result<Vec<IndexEntry>> {
        let mut positions = self.candidates(selection)?;

        if selection.mode == SelectionMode::Backfill && !force {
            let states = cache.snapshot()?;
            let before = positions.len();
            positions = prune_stale(&positions, self.graph, self.index, &states);
            debug!(
                %selection,
                pruned = before - positions.len(),
                "pruned up-to-date tasks from backfill"
            );
        }

        if selection.exclude_target {
            positions.remove(&selection.position);
        }

        positions
            .into_iter()
            .map(|p| self.index.entry(p).cloned())
            .collect()
    }
}
