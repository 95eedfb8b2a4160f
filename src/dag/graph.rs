// src/dag/graph.rs

use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap};

use petgraph::Direction::{self, Incoming, Outgoing};
use petgraph::algo::{astar, toposort};
use petgraph::graphmap::DiGraphMap;
use petgraph::visit::{Dfs, Reversed};

/// Directed graph over task indices.
///
/// Edge direction: parent -> child. For
///
/// ```text
/// b.parents = [a]
/// ```
///
/// we add edge `a -> b`. Node `i` is the `i`-th task the graph was built
/// from. The graph does not enforce acyclicity; callers check
/// [`DagGraph::find_cycle`] before relying on [`DagGraph::topological_order`].
#[derive(Debug, Clone)]
pub struct DagGraph {
    graph: DiGraphMap<usize, ()>,
}

impl DagGraph {
    /// Build a graph with `len` nodes from `(parent, child)` pairs.
    ///
    /// Repeated edges are kept once.
    pub fn from_edges(len: usize, edges: impl IntoIterator<Item = (usize, usize)>) -> Self {
        let mut graph = DiGraphMap::with_capacity(len, 0);

        for node in 0..len {
            graph.add_node(node);
        }
        for (parent, child) in edges {
            graph.add_edge(parent, child, ());
        }

        Self { graph }
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Immediate parents of a node, ascending.
    pub fn parents_of(&self, node: usize) -> Vec<usize> {
        self.neighbors(node, Incoming)
    }

    /// Immediate children of a node, ascending.
    pub fn children_of(&self, node: usize) -> Vec<usize> {
        self.neighbors(node, Outgoing)
    }

    fn neighbors(&self, node: usize, dir: Direction) -> Vec<usize> {
        if !self.graph.contains_node(node) {
            return Vec::new();
        }
        let mut out: Vec<usize> = self.graph.neighbors_directed(node, dir).collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Renumber every node through `map`, which must be a bijection on
    /// `0..len`.
    pub fn relabel(&self, map: impl Fn(usize) -> usize) -> Self {
        let edges = self
            .graph
            .all_edges()
            .map(|(parent, child, _)| (map(parent), map(child)));
        Self::from_edges(self.len(), edges)
    }

    /// Return one cycle as a path of nodes (first node repeated at the end),
    /// or `None` if the graph is acyclic.
    pub fn find_cycle(&self) -> Option<Vec<usize>> {
        let node = match toposort(&self.graph, None) {
            Ok(_) => return None,
            Err(cycle) => cycle.node_id(),
        };

        if self.graph.contains_edge(node, node) {
            return Some(vec![node, node]);
        }

        // Shortest way back to `node` through one of its children.
        self.children_of(node)
            .into_iter()
            .filter_map(|child| {
                astar(&self.graph, child, |n| n == node, |_| 1usize, |_| 0)
            })
            .min_by_key(|(cost, _)| *cost)
            .map(|(_, path)| {
                let mut cycle = Vec::with_capacity(path.len() + 1);
                cycle.push(node);
                cycle.extend(path);
                cycle
            })
            .or(Some(vec![node]))
    }

    /// Kahn's algorithm; among ready nodes the lowest index goes first.
    ///
    /// Nodes that sit on a cycle never become ready, so the result is shorter
    /// than [`DagGraph::len`] for cyclic graphs.
    pub fn topological_order(&self) -> Vec<usize> {
        let mut in_degrees: Vec<usize> =
            (0..self.len()).map(|n| self.parents_of(n).len()).collect();

        let mut ready: BinaryHeap<Reverse<usize>> = in_degrees
            .iter()
            .enumerate()
            .filter(|&(_, &deg)| deg == 0)
            .map(|(node, _)| Reverse(node))
            .collect();

        let mut order = Vec::with_capacity(self.len());

        while let Some(Reverse(node)) = ready.pop() {
            order.push(node);

            for child in self.children_of(node) {
                in_degrees[child] -= 1;
                if in_degrees[child] == 0 {
                    ready.push(Reverse(child));
                }
            }
        }

        order
    }

    /// All transitive parents of `node`, excluding `node` itself.
    pub fn ancestors(&self, node: usize) -> BTreeSet<usize> {
        if !self.graph.contains_node(node) {
            return BTreeSet::new();
        }
        let reversed = Reversed(&self.graph);
        let mut dfs = Dfs::new(reversed, node);
        let mut found = BTreeSet::new();
        while let Some(n) = dfs.next(reversed) {
            found.insert(n);
        }
        found.remove(&node);
        found
    }

    /// All transitive children of `node`, excluding `node` itself.
    pub fn descendants(&self, node: usize) -> BTreeSet<usize> {
        if !self.graph.contains_node(node) {
            return BTreeSet::new();
        }
        let mut dfs = Dfs::new(&self.graph, node);
        let mut found = BTreeSet::new();
        while let Some(n) = dfs.next(&self.graph) {
            found.insert(n);
        }
        found.remove(&node);
        found
    }
}
