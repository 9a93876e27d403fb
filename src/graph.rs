//! Undirected simple graph with arbitrary node identifiers.
//!
//! Node identifiers are mapped to dense indices `0..n` in insertion order.
//! That index space is the one every similarity matrix and reduced-coordinate
//! array in this crate is laid out in.

use std::collections::HashMap;
use std::hash::Hash;

use petgraph::graph::{NodeIndex, UnGraph};

/// Undirected graph without self-loops or parallel edges.
#[derive(Debug, Clone)]
pub struct Graph<N> {
    inner: UnGraph<N, ()>,
    index: HashMap<N, NodeIndex>,
}

impl<N> Default for Graph<N>
where
    N: Clone + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<N> Graph<N>
where
    N: Clone + Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            inner: UnGraph::default(),
            index: HashMap::new(),
        }
    }

    /// Build a graph from an edge iterator. Self-loops are dropped and
    /// repeated edges collapse to one.
    pub fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (N, N)>,
    {
        let mut g = Self::new();
        for (a, b) in edges {
            g.add_edge(a, b);
        }
        g
    }

    /// Insert a node if absent and return its index.
    pub fn add_node(&mut self, id: N) -> usize {
        if let Some(ix) = self.index.get(&id) {
            return ix.index();
        }
        let ix = self.inner.add_node(id.clone());
        self.index.insert(id, ix);
        ix.index()
    }

    /// Insert an undirected edge, adding missing endpoints.
    ///
    /// Returns `false` when the edge was a self-loop or already present.
    /// Endpoints of a self-loop are still added as nodes.
    pub fn add_edge(&mut self, a: N, b: N) -> bool {
        let ia = NodeIndex::new(self.add_node(a));
        let ib = NodeIndex::new(self.add_node(b));
        if ia == ib || self.inner.find_edge(ia, ib).is_some() {
            return false;
        }
        self.inner.add_edge(ia, ib, ());
        true
    }

    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.node_count() == 0
    }

    /// Node identifiers in index order.
    pub fn nodes(&self) -> impl Iterator<Item = &N> + '_ {
        self.inner.node_indices().map(move |ix| &self.inner[ix])
    }

    /// Identifier of the node at `index`.
    pub fn node(&self, index: usize) -> Option<&N> {
        self.inner.node_weight(NodeIndex::new(index))
    }

    /// Index of the node `id`.
    pub fn index_of(&self, id: &N) -> Option<usize> {
        self.index.get(id).map(|ix| ix.index())
    }

    pub fn degree(&self, index: usize) -> usize {
        self.inner.edges(NodeIndex::new(index)).count()
    }

    /// Degree of every node, in index order.
    pub fn degrees(&self) -> Vec<usize> {
        (0..self.node_count()).map(|i| self.degree(i)).collect()
    }

    pub fn neighbors(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        self.inner
            .neighbors(NodeIndex::new(index))
            .map(|ix| ix.index())
    }

    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        self.inner
            .find_edge(NodeIndex::new(a), NodeIndex::new(b))
            .is_some()
    }

    /// Edges as index pairs `(a, b)` with `a < b`.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.inner.edge_indices().filter_map(move |e| {
            self.inner.edge_endpoints(e).map(|(a, b)| {
                let (a, b) = (a.index(), b.index());
                (a.min(b), a.max(b))
            })
        })
    }

    /// Sorted adjacency lists, one per node in index order.
    pub fn adjacency(&self) -> Vec<Vec<usize>> {
        (0..self.node_count())
            .map(|i| {
                let mut nbrs: Vec<usize> = self.neighbors(i).collect();
                nbrs.sort_unstable();
                nbrs
            })
            .collect()
    }
}

/// Size of the intersection of two sorted index lists.
pub(crate) fn sorted_intersection_len(a: &[usize], b: &[usize]) -> usize {
    let (mut i, mut j, mut n) = (0, 0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                n += 1;
                i += 1;
                j += 1;
            }
        }
    }
    n
}
