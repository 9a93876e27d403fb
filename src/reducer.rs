//! Reduction of an `n x n` weight matrix to `n` points in the plane.
//!
//! The embedding pipeline only needs the [`ManifoldReducer`] contract:
//! a square non-negative matrix goes in, an `n x 2` array comes out, rows in
//! the same order. Scale and orientation of the output carry no meaning; only
//! the angular arrangement of the rows is used downstream.
//!
//! Two implementations ship with the crate:
//!
//! | Reducer | Reads the matrix as | Method |
//! |---------|---------------------|--------|
//! | [`SpectralEmbedding`] | dissimilarities (0 = no link) | Laplacian eigenmaps on a heat kernel |
//! | [`ClassicalMds`] | dissimilarities | Torgerson double-centering |

use nalgebra::{DMatrix, SymmetricEigen};
use ndarray::{Array2, ArrayView2};
use tracing::debug;

use crate::error::{Error, Result};

/// Output dimensionality of every reducer.
pub const TARGET_DIM: usize = 2;

/// Capability that maps a weight matrix to planar coordinates.
pub trait ManifoldReducer: Send + Sync {
    /// Reduce an `n x n` matrix to an `n x 2` coordinate array.
    fn reduce(&self, matrix: ArrayView2<'_, f64>) -> Result<Array2<f64>>;

    /// Short name for logs.
    fn name(&self) -> &str {
        "custom"
    }
}

impl<R: ManifoldReducer + ?Sized> ManifoldReducer for Box<R> {
    fn reduce(&self, matrix: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        (**self).reduce(matrix)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Reject non-square or too-small input. Returns `n`.
pub fn check_square(matrix: &ArrayView2<'_, f64>) -> Result<usize> {
    let (rows, cols) = matrix.dim();
    if rows != cols {
        return Err(Error::DimensionMismatch {
            expected: (rows, rows),
            actual: (rows, cols),
        });
    }
    if rows < 2 {
        return Err(Error::InsufficientData(format!(
            "reducer needs at least 2 rows, got {}",
            rows
        )));
    }
    Ok(rows)
}

/// Options for [`SpectralEmbedding`].
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralConfig {
    /// Skip the eigenvector of the smallest eigenvalue (constant on a
    /// connected affinity graph).
    pub drop_first: bool,
    /// Heat-kernel width. `None` uses the mean positive off-diagonal entry.
    pub bandwidth: Option<f64>,
}

impl Default for SpectralConfig {
    fn default() -> Self {
        Self {
            drop_first: true,
            bandwidth: None,
        }
    }
}

/// Laplacian eigenmaps.
///
/// Positive off-diagonal weights `w` become affinities `exp(-w / sigma)`; zero
/// weights mean "no link", including RA2 weights of edges inside a clique
/// (see [`weights`](crate::weights)). The embedding is given by the eigenvectors of the
/// symmetric normalised Laplacian with the smallest eigenvalues, rescaled by
/// `D^{-1/2}` into random-walk eigenvectors. Column signs are fixed so the
/// largest-magnitude entry is positive, which makes the output deterministic.
#[derive(Debug, Clone, Default)]
pub struct SpectralEmbedding {
    pub config: SpectralConfig,
}

impl SpectralEmbedding {
    pub fn new(config: SpectralConfig) -> Self {
        Self { config }
    }

    fn bandwidth(&self, matrix: &ArrayView2<'_, f64>) -> Result<f64> {
        if let Some(sigma) = self.config.bandwidth {
            if !(sigma.is_finite() && sigma > 0.0) {
                return Err(Error::InvalidArgument(format!(
                    "heat-kernel bandwidth must be positive, got {}",
                    sigma
                )));
            }
            return Ok(sigma);
        }
        let (sum, count) = matrix
            .indexed_iter()
            .filter(|((i, j), w)| i != j && **w > 0.0)
            .fold((0.0, 0usize), |(s, c), (_, w)| (s + w, c + 1));
        if count == 0 {
            return Err(Error::DegenerateInput(
                "weight matrix has no positive off-diagonal entry".into(),
            ));
        }
        Ok(sum / count as f64)
    }
}

impl ManifoldReducer for SpectralEmbedding {
    fn reduce(&self, matrix: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        let n = check_square(&matrix)?;
        let sigma = self.bandwidth(&matrix)?;

        let affinity = Array2::from_shape_fn((n, n), |(i, j)| {
            let w = 0.5 * (matrix[[i, j]] + matrix[[j, i]]);
            if i != j && w > 0.0 {
                (-w / sigma).exp()
            } else {
                0.0
            }
        });
        let inv_sqrt_deg: Vec<f64> = affinity
            .rows()
            .into_iter()
            .map(|row| {
                let d = row.sum();
                if d > 0.0 {
                    d.sqrt().recip()
                } else {
                    0.0
                }
            })
            .collect();

        let laplacian = DMatrix::from_fn(n, n, |i, j| {
            let identity = if i == j { 1.0 } else { 0.0 };
            identity - inv_sqrt_deg[i] * affinity[[i, j]] * inv_sqrt_deg[j]
        });
        let eig = SymmetricEigen::new(laplacian);

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| eig.eigenvalues[a].total_cmp(&eig.eigenvalues[b]));
        let skip = usize::from(self.config.drop_first);
        debug!(
            n,
            sigma,
            lambda_1 = eig.eigenvalues[order[skip.min(n - 1)]],
            "spectral embedding solved"
        );

        let mut coords = Array2::zeros((n, TARGET_DIM));
        for (k, &col) in order.iter().skip(skip).take(TARGET_DIM).enumerate() {
            for i in 0..n {
                coords[[i, k]] = eig.eigenvectors[(i, col)] * inv_sqrt_deg[i];
            }
        }
        fix_signs(&mut coords);
        Ok(coords)
    }

    fn name(&self) -> &str {
        "spectral"
    }
}

/// Classical (Torgerson) multidimensional scaling.
///
/// Squared weights are double-centred and the two leading eigenvectors,
/// scaled by the square roots of their eigenvalues, give the coordinates.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassicalMds;

impl ManifoldReducer for ClassicalMds {
    fn reduce(&self, matrix: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        let n = check_square(&matrix)?;
        let nf = n as f64;

        let sq = Array2::from_shape_fn((n, n), |(i, j)| {
            if i == j {
                0.0
            } else {
                let w = 0.5 * (matrix[[i, j]] + matrix[[j, i]]);
                w * w
            }
        });
        let row_mean: Vec<f64> = sq.rows().into_iter().map(|r| r.sum() / nf).collect();
        let grand_mean = row_mean.iter().sum::<f64>() / nf;
        let gram = DMatrix::from_fn(n, n, |i, j| {
            -0.5 * (sq[[i, j]] - row_mean[i] - row_mean[j] + grand_mean)
        });
        let eig = SymmetricEigen::new(gram);

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| eig.eigenvalues[b].total_cmp(&eig.eigenvalues[a]));
        debug!(n, lambda_max = eig.eigenvalues[order[0]], "classical MDS solved");

        let mut coords = Array2::zeros((n, TARGET_DIM));
        for (k, &col) in order.iter().take(TARGET_DIM).enumerate() {
            let scale = eig.eigenvalues[col].max(0.0).sqrt();
            for i in 0..n {
                coords[[i, k]] = eig.eigenvectors[(i, col)] * scale;
            }
        }
        fix_signs(&mut coords);
        Ok(coords)
    }

    fn name(&self) -> &str {
        "mds"
    }
}

/// Flip each column so its largest-magnitude entry is positive.
fn fix_signs(coords: &mut Array2<f64>) {
    for mut col in coords.columns_mut() {
        let pivot = col
            .iter()
            .copied()
            .fold(0.0f64, |best, x| if x.abs() > best.abs() { x } else { best });
        if pivot < 0.0 {
            col.mapv_inplace(|x| -x);
        }
    }
}
