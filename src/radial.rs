//! Degree ranking and radial coordinates.
//!
//! Nodes are ranked `i = 1..n` by descending degree and placed at
//!
//! ```text
//! r_i = (2 / zeta) * (beta * ln i + (1 - beta) * ln n)
//! ```
//!
//! with `beta = 1 / (alpha - 1)` from the degree exponent. Rank 1 sits at
//! `(2 / zeta)(1 - beta) ln n`, not at the origin.
//!
//! Radii live in *rank* order while angles live in *graph index* order.
//! [`DegreeRanking`] is the translation table between the two.

use tracing::warn;

use crate::error::{Error, Result};

/// Bijection between graph indices and degree ranks.
///
/// Ranks are 1-based in the public API. Ties in degree keep graph index order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DegreeRanking {
    /// `by_rank[r]` is the graph index holding rank `r + 1`.
    by_rank: Vec<usize>,
    /// `rank_of[i]` is the 0-based rank of graph index `i`.
    rank_of: Vec<usize>,
}

impl DegreeRanking {
    /// Rank nodes by descending degree; equal degrees keep index order.
    pub fn from_degrees(degrees: &[usize]) -> Self {
        let mut by_rank: Vec<usize> = (0..degrees.len()).collect();
        // stable: ties stay in index order
        by_rank.sort_by(|&a, &b| degrees[b].cmp(&degrees[a]));
        let mut rank_of = vec![0; degrees.len()];
        for (r, &i) in by_rank.iter().enumerate() {
            rank_of[i] = r;
        }
        Self { by_rank, rank_of }
    }

    pub fn len(&self) -> usize {
        self.by_rank.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_rank.is_empty()
    }

    /// 1-based rank of graph index `index`.
    pub fn rank(&self, index: usize) -> usize {
        self.rank_of[index] + 1
    }

    /// Graph index holding 1-based rank `rank`; `None` for 0 or past the end.
    pub fn index_at(&self, rank: usize) -> Option<usize> {
        self.by_rank.get(rank.checked_sub(1)?).copied()
    }

    /// Graph indices from highest to lowest degree.
    pub fn by_rank(&self) -> &[usize] {
        &self.by_rank
    }

    /// Read a rank-ordered slice in graph index order.
    pub fn to_index_order<T: Copy>(&self, rank_ordered: &[T]) -> Result<Vec<T>> {
        if rank_ordered.len() != self.len() {
            return Err(Error::DimensionMismatch {
                expected: (self.len(), 1),
                actual: (rank_ordered.len(), 1),
            });
        }
        Ok(self.rank_of.iter().map(|&r| rank_ordered[r]).collect())
    }
}

/// `beta = 1 / (alpha - 1)`; fails unless `alpha > 1` and finite.
pub fn beta_from_exponent(alpha: f64) -> Result<f64> {
    if !(alpha.is_finite() && alpha > 1.0) {
        return Err(Error::InvalidExponent { alpha });
    }
    Ok(1.0 / (alpha - 1.0))
}

/// Radii in rank order: element `k` belongs to rank `k + 1`.
///
/// A single node gets radius 0. Radii that the formula pushes below zero
/// (only possible for `beta > 1`) are clamped to 0.
pub fn radial_coords(ranking: &DegreeRanking, beta: f64, zeta: f64) -> Result<Vec<f64>> {
    if !(zeta.is_finite() && zeta > 0.0) {
        return Err(Error::InvalidArgument(format!(
            "curvature parameter zeta must be positive, got {}",
            zeta
        )));
    }
    if !(beta.is_finite() && beta > 0.0) {
        return Err(Error::InvalidArgument(format!(
            "popularity fading beta must be positive, got {}",
            beta
        )));
    }

    let n = ranking.len();
    if n <= 1 {
        return Ok(vec![0.0; n]);
    }
    let ln_n = (n as f64).ln();
    let scale = 2.0 / zeta;
    let mut clamped = 0usize;
    let radii: Vec<f64> = (1..=n)
        .map(|i| {
            let r = scale * (beta * (i as f64).ln() + (1.0 - beta) * ln_n);
            if r < 0.0 {
                clamped += 1;
                0.0
            } else {
                r
            }
        })
        .collect();
    if clamped > 0 {
        warn!(clamped, beta, "negative radii clamped to the origin");
    }
    Ok(radii)
}

/// Rank `degrees` and compute radii in rank order.
pub fn radial_coords_from_degrees(degrees: &[usize], beta: f64, zeta: f64) -> Result<(DegreeRanking, Vec<f64>)> {
    let ranking = DegreeRanking::from_degrees(degrees);
    let radii = radial_coords(&ranking, beta, zeta)?;
    Ok((ranking, radii))
}
