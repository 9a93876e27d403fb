//! Power-law exponent of a degree sequence.
//!
//! The pipeline needs `alpha` from `P(k) ~ k^(-alpha)` to derive the
//! popularity fading `beta = 1 / (alpha - 1)`. Fitting is behind the
//! [`ExponentEstimator`] capability; [`DiscreteMle`] is the default.
//!
//! # Method
//!
//! Clauset, Shalizi & Newman (2009), discrete case:
//!
//! 1. For each candidate lower cutoff `x_min`, keep the tail `x >= x_min` and
//!    maximise `L(alpha) = -n ln zeta(alpha, x_min) - alpha * sum(ln x)` over a
//!    grid of exponents.
//! 2. Score each candidate by the Kolmogorov-Smirnov distance between the tail
//!    and the fitted model, and keep the best.
//!
//! `zeta(s, q)` is the Hurwitz zeta function, evaluated by Euler-Maclaurin
//! summation.

use tracing::debug;

use crate::error::{Error, Result};

/// Capability that fits a power-law exponent to a degree sequence.
pub trait ExponentEstimator: Send + Sync {
    /// Fit `alpha` to `degrees` (non-negative, at least one element).
    fn estimate(&self, degrees: &[usize]) -> Result<f64>;

    fn name(&self) -> &str {
        "custom"
    }
}

impl<E: ExponentEstimator + ?Sized> ExponentEstimator for Box<E> {
    fn estimate(&self, degrees: &[usize]) -> Result<f64> {
        (**self).estimate(degrees)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Always returns the same exponent. Useful to pin `beta` or in tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedExponent(pub f64);

impl ExponentEstimator for FixedExponent {
    fn estimate(&self, _degrees: &[usize]) -> Result<f64> {
        Ok(self.0)
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

/// Grid and tail options for [`DiscreteMle`].
#[derive(Debug, Clone, PartialEq)]
pub struct PowerLawConfig {
    pub alpha_min: f64,
    pub alpha_max: f64,
    /// Grid points between `alpha_min` and `alpha_max`, inclusive.
    pub alpha_steps: usize,
    /// Smallest tail a candidate `x_min` may leave.
    pub min_tail: usize,
}

impl Default for PowerLawConfig {
    fn default() -> Self {
        Self {
            alpha_min: 1.5,
            alpha_max: 3.5,
            alpha_steps: 201,
            min_tail: 2,
        }
    }
}

/// Outcome of a full fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerLawFit {
    pub alpha: f64,
    pub x_min: usize,
    /// Kolmogorov-Smirnov distance of the tail to the model.
    pub ks: f64,
    /// Number of samples in the tail.
    pub n_tail: usize,
}

/// Discrete maximum-likelihood power-law fit with KS-selected cutoff.
#[derive(Debug, Clone, Default)]
pub struct DiscreteMle {
    pub config: PowerLawConfig,
}

impl DiscreteMle {
    pub fn new(config: PowerLawConfig) -> Self {
        Self { config }
    }

    fn grid(&self) -> Result<Vec<f64>> {
        let PowerLawConfig {
            alpha_min,
            alpha_max,
            alpha_steps,
            ..
        } = self.config;
        if !(alpha_min > 1.0 && alpha_max >= alpha_min && alpha_steps >= 1) {
            return Err(Error::InvalidArgument(format!(
                "alpha grid [{}, {}] x {} must satisfy 1 < min <= max and steps >= 1",
                alpha_min, alpha_max, alpha_steps
            )));
        }
        if alpha_steps == 1 {
            return Ok(vec![alpha_min]);
        }
        let step = (alpha_max - alpha_min) / (alpha_steps - 1) as f64;
        Ok((0..alpha_steps)
            .map(|k| alpha_min + step * k as f64)
            .collect())
    }

    /// Fit and report cutoff and goodness of fit alongside `alpha`.
    pub fn fit(&self, degrees: &[usize]) -> Result<PowerLawFit> {
        let grid = self.grid()?;
        let mut sample: Vec<usize> = degrees.iter().copied().filter(|&d| d > 0).collect();
        if sample.is_empty() {
            return Err(Error::InsufficientData(
                "degree sequence has no positive entry".into(),
            ));
        }
        sample.sort_unstable();

        let mut candidates: Vec<usize> = sample.clone();
        candidates.dedup();
        let largest = candidates.len() - 1;
        if candidates.len() > 1 {
            // the maximum alone is never a usable tail
            candidates.truncate(largest);
        }

        let mut best: Option<PowerLawFit> = None;
        for &x_min in &candidates {
            let start = sample.partition_point(|&d| d < x_min);
            let tail = &sample[start..];
            if tail.len() < self.config.min_tail && best.is_some() {
                continue;
            }
            let (alpha, _) = best_alpha(tail, x_min, &grid);
            let ks = ks_distance(tail, x_min, alpha);
            let fit = PowerLawFit {
                alpha,
                x_min,
                ks,
                n_tail: tail.len(),
            };
            if best.map_or(true, |b| ks < b.ks) {
                best = Some(fit);
            }
        }

        let fit = best.ok_or_else(|| {
            Error::InsufficientData("no usable lower cutoff in degree sequence".into())
        })?;
        debug!(
            alpha = fit.alpha,
            x_min = fit.x_min,
            ks = fit.ks,
            n_tail = fit.n_tail,
            "power-law fit"
        );
        Ok(fit)
    }
}

impl ExponentEstimator for DiscreteMle {
    fn estimate(&self, degrees: &[usize]) -> Result<f64> {
        self.fit(degrees).map(|fit| fit.alpha)
    }

    fn name(&self) -> &str {
        "discrete-mle"
    }
}

/// Grid point maximising the discrete log-likelihood of `tail`.
fn best_alpha(tail: &[usize], x_min: usize, grid: &[f64]) -> (f64, f64) {
    let n = tail.len() as f64;
    let sum_ln: f64 = tail.iter().map(|&x| (x as f64).ln()).sum();
    let q = x_min as f64;
    grid.iter()
        .map(|&alpha| (alpha, -n * hurwitz_zeta(alpha, q).ln() - alpha * sum_ln))
        .fold((grid[0], f64::NEG_INFINITY), |best, cur| {
            if cur.1 > best.1 {
                cur
            } else {
                best
            }
        })
}

/// Max distance between the empirical CDF of a sorted tail and the model CDF
/// `P(X <= x) = 1 - zeta(alpha, x + 1) / zeta(alpha, x_min)`.
fn ks_distance(tail: &[usize], x_min: usize, alpha: f64) -> f64 {
    let n = tail.len() as f64;
    let norm = hurwitz_zeta(alpha, x_min as f64);
    let mut ks = 0.0f64;
    let mut i = 0;
    while i < tail.len() {
        let x = tail[i];
        let below = i as f64 / n;
        while i < tail.len() && tail[i] == x {
            i += 1;
        }
        let upto = i as f64 / n;
        let model_below = 1.0 - hurwitz_zeta(alpha, x as f64) / norm;
        let model_upto = 1.0 - hurwitz_zeta(alpha, x as f64 + 1.0) / norm;
        ks = ks
            .max((upto - model_upto).abs())
            .max((below - model_below).abs());
    }
    ks
}

/// Hurwitz zeta `sum_{k>=0} (q + k)^(-s)` for `s > 1`, `q > 0`.
pub fn hurwitz_zeta(s: f64, q: f64) -> f64 {
    const DIRECT_TERMS: usize = 12;
    // B_2j / (2j)!
    const BERNOULLI_OVER_FACTORIAL: [f64; 7] = [
        1.0 / 6.0 / 2.0,
        -1.0 / 30.0 / 24.0,
        1.0 / 42.0 / 720.0,
        -1.0 / 30.0 / 40_320.0,
        5.0 / 66.0 / 3_628_800.0,
        -691.0 / 2730.0 / 479_001_600.0,
        7.0 / 6.0 / 87_178_291_200.0,
    ];

    let mut sum: f64 = (0..DIRECT_TERMS).map(|k| (q + k as f64).powf(-s)).sum();
    let a = q + DIRECT_TERMS as f64;
    sum += a.powf(1.0 - s) / (s - 1.0) + 0.5 * a.powf(-s);

    // s (s+1) ... (s+2j-2) * a^(-s-2j+1)
    let mut rising = s;
    let mut a_pow = a.powf(-s - 1.0);
    for (j, coeff) in BERNOULLI_OVER_FACTORIAL.iter().enumerate() {
        sum += coeff * rising * a_pow;
        let k = 2.0 * (j as f64 + 1.0);
        rising *= (s + k - 1.0) * (s + k);
        a_pow /= a * a;
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::f64::consts::PI;

    #[test]
    fn test_riemann_zeta_values() {
        assert!((hurwitz_zeta(2.0, 1.0) - PI * PI / 6.0).abs() < 1e-12);
        assert!((hurwitz_zeta(4.0, 1.0) - PI.powi(4) / 90.0).abs() < 1e-12);
        // zeta(3) (Apery's constant)
        assert!((hurwitz_zeta(3.0, 1.0) - 1.202_056_903_159_594_2).abs() < 1e-12);
    }

    #[test]
    fn test_hurwitz_shift_identity() {
        // zeta(s, q) = q^-s + zeta(s, q + 1)
        for &(s, q) in &[(1.7, 1.0), (2.5, 3.0), (3.2, 10.0)] {
            let lhs = hurwitz_zeta(s, q);
            let rhs = q.powf(-s) + hurwitz_zeta(s, q + 1.0);
            assert!((lhs - rhs).abs() < 1e-12, "s={} q={}: {} vs {}", s, q, lhs, rhs);
        }
    }

    /// Inverse-CDF sampling from a discrete power law with `x_min = 1`.
    fn sample_power_law(alpha: f64, n: usize, rng: &mut StdRng) -> Vec<usize> {
        let norm = hurwitz_zeta(alpha, 1.0);
        (0..n)
            .map(|_| {
                let u: f64 = rng.random();
                let mut x = 1usize;
                let mut cdf = 1.0 / norm;
                while cdf < u && x < 100_000 {
                    x += 1;
                    cdf += (x as f64).powf(-alpha) / norm;
                }
                x
            })
            .collect()
    }

    #[test]
    fn test_recovers_known_exponent() {
        let mut rng = StdRng::seed_from_u64(7);
        let degrees = sample_power_law(2.5, 5000, &mut rng);
        let fit = DiscreteMle::default().fit(&degrees).unwrap();
        assert!(
            (fit.alpha - 2.5).abs() < 0.2,
            "alpha {} (x_min {}, ks {})",
            fit.alpha,
            fit.x_min,
            fit.ks
        );
    }

    #[test]
    fn test_regular_degrees_hit_grid_edge() {
        // no tail to speak of: likelihood keeps rising with alpha
        let fit = DiscreteMle::default().fit(&[2, 2, 2, 2, 2]).unwrap();
        assert_eq!(fit.x_min, 2);
        assert!((fit.alpha - 3.5).abs() < 1e-9);
    }

    #[test]
    fn test_zero_degrees_ignored() {
        let a = DiscreteMle::default().estimate(&[0, 0, 1, 1, 2, 5]).unwrap();
        let b = DiscreteMle::default().estimate(&[1, 1, 2, 5]).unwrap();
        assert_eq!(a, b);
        assert!(a > 1.0);
    }

    #[test]
    fn test_all_zero_is_insufficient() {
        let err = DiscreteMle::default().estimate(&[0, 0, 0]).unwrap_err();
        assert!(matches!(err, Error::InsufficientData(_)));
    }

    #[test]
    fn test_bad_grid_rejected() {
        let mle = DiscreteMle::new(PowerLawConfig {
            alpha_min: 0.5,
            ..Default::default()
        });
        assert!(matches!(mle.estimate(&[1, 2, 3]), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_fixed_exponent_passthrough() {
        assert_eq!(FixedExponent(2.1).estimate(&[]).unwrap(), 2.1);
    }
}
