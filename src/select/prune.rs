// src/select/prune.rs

//! Staleness pruning for backfill selections.
//!
//! A task can be skipped when it has finished at least once and none of its
//! ancestors finished after the task last started. Every decision is made
//! against the same snapshot of the cache, taken before pruning.

use std::collections::BTreeSet;

use tracing::debug;

use crate::cache::{CacheMap, NodeState};
use crate::dag::{DagGraph, LinearIndex};

/// Why a task was kept or skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Never finished; must run.
    NeverFinished,
    /// Finished and has no ancestors.
    FreshRoot,
    /// Some ancestor never finished.
    AncestorUnfinished,
    /// Some ancestor finished after this task last started.
    Stale,
    /// Finished after all ancestors' latest completions.
    Fresh,
}

impl Freshness {
    pub fn is_prunable(self) -> bool {
        matches!(self, Freshness::FreshRoot | Freshness::Fresh)
    }
}

/// Classify `task` given the states of its ancestors within the candidate set.
pub fn freshness(task: NodeState, ancestors: &[NodeState]) -> Freshness {
    if !task.has_finished() {
        return Freshness::NeverFinished;
    }

    if ancestors.is_empty() {
        return Freshness::FreshRoot;
    }

    let mut latest_ancestor_finish = 0;
    for ancestor in ancestors {
        match ancestor.finish_ns {
            Some(finish) => latest_ancestor_finish = latest_ancestor_finish.max(finish),
            None => return Freshness::AncestorUnfinished,
        }
    }

    // A missing start sorts before every finish.
    match task.start_ns {
        Some(start) if latest_ancestor_finish <= start => Freshness::Fresh,
        _ => Freshness::Stale,
    }
}

/// Return `candidates` minus every task that is safe to skip.
///
/// `graph` is keyed by index position; `candidates` holds positions.
pub fn prune_stale(
    candidates: &BTreeSet<usize>,
    graph: &DagGraph,
    index: &LinearIndex,
    states: &CacheMap,
) -> BTreeSet<usize> {
    let state_of = |position: usize| -> NodeState {
        index
            .entry(position)
            .ok()
            .and_then(|entry| states.get(&entry.name).copied())
            .unwrap_or_default()
    };

    candidates
        .iter()
        .copied()
        .filter(|&position| {
            let ancestors: Vec<NodeState> = graph
                .ancestors(position)
                .into_iter()
                .filter(|a| candidates.contains(a))
                .map(state_of)
                .collect();

            let verdict = freshness(state_of(position), &ancestors);
            debug!(position, ?verdict, "staleness check");
            !verdict.is_prunable()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finished(start: u64, finish: u64) -> NodeState {
        NodeState {
            start_ns: Some(start),
            finish_ns: Some(finish),
        }
    }

    #[test]
    fn never_finished_is_kept() {
        assert_eq!(freshness(NodeState::default(), &[]), Freshness::NeverFinished);
        assert_eq!(
            freshness(NodeState::started_at(5), &[finished(1, 2)]),
            Freshness::NeverFinished
        );
    }

    #[test]
    fn finished_root_is_pruned() {
        let verdict = freshness(finished(1, 2), &[]);
        assert_eq!(verdict, Freshness::FreshRoot);
        assert!(verdict.is_prunable());
    }

    #[test]
    fn unfinished_ancestor_keeps_task() {
        let ancestors = [finished(1, 2), NodeState::started_at(3)];
        assert_eq!(
            freshness(finished(10, 11), &ancestors),
            Freshness::AncestorUnfinished
        );
    }

    #[test]
    fn ancestor_finishing_after_start_is_stale() {
        assert_eq!(freshness(finished(5, 6), &[finished(6, 7)]), Freshness::Stale);
    }

    #[test]
    fn ancestor_finishing_exactly_at_start_is_fresh() {
        assert_eq!(freshness(finished(5, 6), &[finished(4, 5)]), Freshness::Fresh);
    }
}
