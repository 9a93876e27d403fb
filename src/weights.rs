//! Pairwise topological weights ("pre-weighting") of a graph.
//!
//! Every scheme produces a dense, symmetric, non-negative `n x n` matrix in the
//! graph's index order. Large weights mean "far apart" to the reducer.
//!
//! | Scheme | Weight of pair (i, j) | Support |
//! |--------|-----------------------|---------|
//! | RA1 | `(d_i + d_j + d_i d_j) / (1 + c_ij)` | all pairs |
//! | RA2 | `(e_ij + e_ji + e_ij e_ji) / (1 + c_ij)` | edges |
//! | EBC | edge betweenness centrality | edges |
//!
//! `d` is degree, `c_ij` the number of common neighbours and `e_ij` the
//! external degree of `i` with respect to `j`. Diagonals are zero.
//!
//! Under RA2 an edge whose endpoints have no neighbours outside their shared
//! neighbourhood weighs 0, the same value as a non-edge. In a clique every
//! edge is like that, so the whole matrix is zero and
//! [`SpectralEmbedding`](crate::reducer::SpectralEmbedding), which reads 0 as
//! "no link", rejects it as degenerate. Use RA1 for such graphs.
//!
//! Common neighbours are counted over all unordered pairs, which makes every
//! scheme quadratic in the node count: graphs of thousands of nodes, not
//! millions.

use std::collections::VecDeque;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use ndarray::Array2;
use tracing::debug;

use crate::error::{Error, Result};
use crate::graph::{sorted_intersection_len, Graph};

/// Pairwise weighting scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WeightingScheme {
    /// Repulsion-attraction on node degrees.
    #[default]
    Ra1,
    /// Repulsion-attraction on external degrees, edges only.
    Ra2,
    /// Edge betweenness centrality.
    Ebc,
}

impl WeightingScheme {
    pub const ALL: [WeightingScheme; 3] = [Self::Ra1, Self::Ra2, Self::Ebc];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Ra1 => "RA1",
            Self::Ra2 => "RA2",
            Self::Ebc => "EBC",
        }
    }
}

impl fmt::Display for WeightingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for WeightingScheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|scheme| scheme.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "unknown weighting scheme {:?} (expected RA1, RA2 or EBC)",
                    s
                ))
            })
    }
}

/// Build the similarity matrix of `graph` under `scheme`.
pub fn build_weights<N>(graph: &Graph<N>, scheme: WeightingScheme) -> Result<Array2<f64>>
where
    N: Clone + Eq + Hash,
{
    let n = graph.node_count();
    if n < 2 {
        return Err(Error::InsufficientData(format!(
            "need at least 2 nodes to weight pairs, got {}",
            n
        )));
    }
    debug!(n, %scheme, "building similarity matrix");
    let weights = match scheme {
        WeightingScheme::Ra1 => ra1_weights(graph),
        WeightingScheme::Ra2 => ra2_weights(graph),
        WeightingScheme::Ebc => ebc_weights(graph),
    };
    Ok(weights)
}

/// Number of common neighbours for every pair. The diagonal is zero.
pub fn common_neighbors<N>(graph: &Graph<N>) -> Array2<usize>
where
    N: Clone + Eq + Hash,
{
    let adj = graph.adjacency();
    let n = adj.len();
    let upper = |i: usize| -> Vec<usize> {
        (i + 1..n)
            .map(|j| sorted_intersection_len(&adj[i], &adj[j]))
            .collect()
    };

    #[cfg(feature = "parallel")]
    let rows: Vec<Vec<usize>> = {
        use rayon::prelude::*;
        (0..n).into_par_iter().map(upper).collect()
    };
    #[cfg(not(feature = "parallel"))]
    let rows: Vec<Vec<usize>> = (0..n).map(upper).collect();

    let mut cn = Array2::zeros((n, n));
    for (i, row) in rows.into_iter().enumerate() {
        for (k, c) in row.into_iter().enumerate() {
            let j = i + 1 + k;
            cn[[i, j]] = c;
            cn[[j, i]] = c;
        }
    }
    cn
}

/// External degree of `i` with respect to `j`: `d_i - c_ij - 1` for adjacent
/// pairs, zero otherwise. Not symmetric.
pub fn external_degree<N>(graph: &Graph<N>, cn: &Array2<usize>) -> Array2<f64>
where
    N: Clone + Eq + Hash,
{
    let n = graph.node_count();
    let degree = graph.degrees();
    let mut ext = Array2::zeros((n, n));
    for (a, b) in graph.edges() {
        let c = cn[[a, b]];
        // b is a neighbour of a but never a common neighbour, so this cannot underflow
        ext[[a, b]] = (degree[a] - c - 1) as f64;
        ext[[b, a]] = (degree[b] - c - 1) as f64;
    }
    ext
}

pub fn ra1_weights<N>(graph: &Graph<N>) -> Array2<f64>
where
    N: Clone + Eq + Hash,
{
    let degree = graph.degrees();
    let cn = common_neighbors(graph);
    Array2::from_shape_fn(cn.dim(), |(i, j)| {
        if i == j {
            return 0.0;
        }
        let (di, dj) = (degree[i] as f64, degree[j] as f64);
        (di + dj + di * dj) / (1.0 + cn[[i, j]] as f64)
    })
}

pub fn ra2_weights<N>(graph: &Graph<N>) -> Array2<f64>
where
    N: Clone + Eq + Hash,
{
    let cn = common_neighbors(graph);
    let ext = external_degree(graph, &cn);
    Array2::from_shape_fn(cn.dim(), |(i, j)| {
        let (eij, eji) = (ext[[i, j]], ext[[j, i]]);
        (eij + eji + eij * eji) / (1.0 + cn[[i, j]] as f64)
    })
}

pub fn ebc_weights<N>(graph: &Graph<N>) -> Array2<f64>
where
    N: Clone + Eq + Hash,
{
    edge_betweenness(graph)
}

/// Edge betweenness centrality (Brandes), as a symmetric matrix.
///
/// Entry `(a, b)` is the fraction of unordered node pairs whose shortest paths
/// run through edge `{a, b}`, with each pair's unit of flow split equally
/// across its shortest paths. Non-edges are zero.
pub fn edge_betweenness<N>(graph: &Graph<N>) -> Array2<f64>
where
    N: Clone + Eq + Hash,
{
    let adj = graph.adjacency();
    let n = adj.len();
    let mut eb = Array2::<f64>::zeros((n, n));

    let mut order = Vec::with_capacity(n);
    let mut preds: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut sigma = vec![0.0f64; n];
    let mut dist = vec![usize::MAX; n];
    let mut delta = vec![0.0f64; n];
    let mut queue = VecDeque::new();

    for s in 0..n {
        order.clear();
        for p in preds.iter_mut() {
            p.clear();
        }
        sigma.fill(0.0);
        dist.fill(usize::MAX);
        delta.fill(0.0);

        sigma[s] = 1.0;
        dist[s] = 0;
        queue.push_back(s);
        while let Some(v) = queue.pop_front() {
            order.push(v);
            for &w in &adj[v] {
                if dist[w] == usize::MAX {
                    dist[w] = dist[v] + 1;
                    queue.push_back(w);
                }
                if dist[w] == dist[v] + 1 {
                    sigma[w] += sigma[v];
                    preds[w].push(v);
                }
            }
        }

        while let Some(w) = order.pop() {
            for &v in &preds[w] {
                let c = sigma[v] / sigma[w] * (1.0 + delta[w]);
                eb[[v, w]] += c;
                eb[[w, v]] += c;
                delta[v] += c;
            }
        }
    }

    // Every unordered pair was visited from both ends.
    let scale = 1.0 / (n as f64 * (n as f64 - 1.0));
    if n > 1 {
        eb.mapv_inplace(|x| x * scale);
    }
    eb
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn ring(n: usize) -> Graph<usize> {
        Graph::from_edges((0..n).map(|i| (i, (i + 1) % n)))
    }

    #[test]
    fn test_parse_scheme_names() {
        assert_eq!("ra1".parse::<WeightingScheme>().unwrap(), WeightingScheme::Ra1);
        assert_eq!("RA2".parse::<WeightingScheme>().unwrap(), WeightingScheme::Ra2);
        assert_eq!(" EBC ".parse::<WeightingScheme>().unwrap(), WeightingScheme::Ebc);
        let err = "RA3".parse::<WeightingScheme>().unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)), "got {:?}", err);
    }

    #[test]
    fn test_single_node_rejected() {
        let mut g = Graph::new();
        g.add_node(0u32);
        for scheme in WeightingScheme::ALL {
            let err = build_weights(&g, scheme).unwrap_err();
            assert!(matches!(err, Error::InsufficientData(_)));
        }
    }

    #[test]
    fn test_common_neighbors_counts_non_adjacent_pairs() {
        // 0 and 3 are not adjacent but share 1 and 2
        let g = Graph::from_edges([(0, 1), (0, 2), (3, 1), (3, 2)]);
        let cn = common_neighbors(&g);
        assert_eq!(cn[[0, 3]], 2);
        assert_eq!(cn[[3, 0]], 2);
        assert_eq!(cn[[0, 1]], 0);
        assert_eq!(cn[[1, 2]], 2);
        assert_eq!(cn[[0, 0]], 0);
    }

    #[test]
    fn test_ra1_on_ring() {
        let w = build_weights(&ring(5), WeightingScheme::Ra1).unwrap();
        // adjacent: no common neighbour, (2 + 2 + 4) / 1
        assert!((w[[0, 1]] - 8.0).abs() < EPS);
        // two hops: one common neighbour, 8 / 2
        assert!((w[[0, 2]] - 4.0).abs() < EPS);
        assert_eq!(w[[3, 3]], 0.0);
    }

    #[test]
    fn test_ra2_on_ring_and_triangle() {
        let w = build_weights(&ring(5), WeightingScheme::Ra2).unwrap();
        assert!((w[[0, 1]] - 3.0).abs() < EPS);
        assert_eq!(w[[0, 2]], 0.0);

        // every triangle edge has its third node as common neighbour: no external degree
        let tri = Graph::from_edges([(0, 1), (1, 2), (2, 0)]);
        let w = build_weights(&tri, WeightingScheme::Ra2).unwrap();
        assert!(w.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_ra2_external_degree_asymmetric() {
        // star with hub 0 and an extra edge 1-2
        let g = Graph::from_edges([(0, 1), (0, 2), (0, 3), (1, 2)]);
        let cn = common_neighbors(&g);
        let ext = external_degree(&g, &cn);
        // hub: degree 3, shares node 2 with node 1
        assert_eq!(ext[[0, 1]], 1.0);
        assert_eq!(ext[[1, 0]], 0.0);
        assert_eq!(ext[[0, 3]], 2.0);
        assert_eq!(ext[[1, 3]], 0.0);
        let w = ra2_weights(&g);
        assert!((w[[0, 1]] - 1.0 / 2.0).abs() < EPS);
        assert!((w[[0, 3]] - 2.0).abs() < EPS);
    }

    #[test]
    fn test_edge_betweenness_path() {
        let g = Graph::from_edges([(0, 1), (1, 2)]);
        let eb = edge_betweenness(&g);
        assert!((eb[[0, 1]] - 2.0 / 3.0).abs() < EPS, "got {}", eb[[0, 1]]);
        assert!((eb[[2, 1]] - 2.0 / 3.0).abs() < EPS);
        assert_eq!(eb[[0, 2]], 0.0);
    }

    #[test]
    fn test_edge_betweenness_splits_equal_paths() {
        let g = ring(4);
        let eb = build_weights(&g, WeightingScheme::Ebc).unwrap();
        // own pair plus half of each of the two diagonal pairs, over 6 pairs
        for (a, b) in g.edges() {
            assert!((eb[[a, b]] - 1.0 / 3.0).abs() < EPS, "edge {}-{}: {}", a, b, eb[[a, b]]);
        }
    }

    #[test]
    fn test_all_schemes_symmetric_non_negative() {
        let g = Graph::from_edges([(0, 1), (0, 2), (0, 3), (1, 2), (3, 4), (4, 5), (5, 3)]);
        for scheme in WeightingScheme::ALL {
            let w = build_weights(&g, scheme).unwrap();
            for i in 0..6 {
                for j in 0..6 {
                    assert!(w[[i, j]] >= 0.0, "{} negative at ({}, {})", scheme, i, j);
                    assert!((w[[i, j]] - w[[j, i]]).abs() < EPS, "{} asymmetric", scheme);
                }
            }
        }
    }
}
