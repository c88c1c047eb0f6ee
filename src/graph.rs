//! Bipartite graph adapter traits.
//!
//! Left and right node ids live in disjoint namespaces; callers guarantee this and
//! nothing here checks it.

use crate::{Error, NodeId, Result};
use rand::prelude::*;
use rustc_hash::FxHashMap;

/// Which side of the bipartite graph a node belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Left,
    Right,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

/// A read-only bipartite graph view that returns **borrowed** neighbor slices.
///
/// Walks sample neighbors on every step, so the adapter hands out slices instead of
/// allocating a `Vec` per query. Unknown nodes have an empty neighbor slice.
///
/// Implementations are expected to be a stable snapshot for the duration of a run.
pub trait BipartiteGraph {
    /// Right-side neighbors of a left node.
    fn left_neighbors_ref(&self, left: NodeId) -> &[NodeId];

    /// Left-side neighbors of a right node.
    fn right_neighbors_ref(&self, right: NodeId) -> &[NodeId];

    fn left_degree(&self, left: NodeId) -> usize {
        self.left_neighbors_ref(left).len()
    }

    fn right_degree(&self, right: NodeId) -> usize {
        self.right_neighbors_ref(right).len()
    }

    /// Uniformly sample one right neighbor of `left`.
    ///
    /// Fails with [`Error::EmptyNeighborhood`] when `left` has degree 0; callers are
    /// expected to filter such nodes out beforehand.
    fn random_right_neighbor<R: Rng + ?Sized>(&self, left: NodeId, rng: &mut R) -> Result<NodeId> {
        self.left_neighbors_ref(left)
            .choose(rng)
            .copied()
            .ok_or(Error::EmptyNeighborhood { side: Side::Left, node: left })
    }

    /// Uniformly sample one left neighbor of `right`.
    fn random_left_neighbor<R: Rng + ?Sized>(&self, right: NodeId, rng: &mut R) -> Result<NodeId> {
        self.right_neighbors_ref(right)
            .choose(rng)
            .copied()
            .ok_or(Error::EmptyNeighborhood { side: Side::Right, node: right })
    }
}

/// In-memory bipartite adjacency lists, indexed from both sides.
///
/// Neighbor lists are kept sorted and free of duplicates, so an edge inserted twice
/// does not double its sampling probability.
#[derive(Debug, Clone, Default)]
pub struct BipartiteAdjacency {
    left: FxHashMap<NodeId, Vec<NodeId>>,
    right: FxHashMap<NodeId, Vec<NodeId>>,
}

impl BipartiteAdjacency {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(left, right)` edges.
    pub fn from_edges(edges: &[(NodeId, NodeId)]) -> Self {
        let mut g = Self::new();
        for &(l, r) in edges {
            g.left.entry(l).or_default().push(r);
            g.right.entry(r).or_default().push(l);
        }
        for nbrs in g.left.values_mut().chain(g.right.values_mut()) {
            nbrs.sort_unstable();
            nbrs.dedup();
        }
        g
    }

    /// Insert a single `(left, right)` edge. Returns `false` if it was already present.
    pub fn add_edge(&mut self, left: NodeId, right: NodeId) -> bool {
        let l_nbrs = self.left.entry(left).or_default();
        match l_nbrs.binary_search(&right) {
            Ok(_) => return false,
            Err(i) => l_nbrs.insert(i, right),
        }
        let r_nbrs = self.right.entry(right).or_default();
        if let Err(i) = r_nbrs.binary_search(&left) {
            r_nbrs.insert(i, left);
        }
        true
    }

    pub fn left_node_count(&self) -> usize {
        self.left.len()
    }

    pub fn right_node_count(&self) -> usize {
        self.right.len()
    }

    pub fn edge_count(&self) -> usize {
        self.left.values().map(Vec::len).sum()
    }
}

impl BipartiteGraph for BipartiteAdjacency {
    fn left_neighbors_ref(&self, left: NodeId) -> &[NodeId] {
        self.left.get(&left).map(Vec::as_slice).unwrap_or(&[])
    }

    fn right_neighbors_ref(&self, right: NodeId) -> &[NodeId] {
        self.right.get(&right).map(Vec::as_slice).unwrap_or(&[])
    }
}
