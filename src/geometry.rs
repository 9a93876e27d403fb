//! Points of the hyperbolic plane in the native polar representation.
//!
//! In the native model a point is `(theta, r)` where `r` is its true
//! hyperbolic distance from the origin. Distances follow the hyperbolic law of
//! cosines with curvature `-zeta^2`:
//!
//! ```text
//! cosh(zeta d) = cosh(zeta r1) cosh(zeta r2) - sinh(zeta r1) sinh(zeta r2) cos(dtheta)
//! ```
//!
//! For drawing, [`HyperbolicDisk::to_poincare`] maps a native radius into the
//! unit Poincare disk.

use std::f64::consts::TAU;

/// Polar position: angle in radians and native radius.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PolarCoord {
    pub theta: f64,
    pub r: f64,
}

impl PolarCoord {
    pub fn new(theta: f64, r: f64) -> Self {
        Self { theta, r }
    }

    /// Cartesian `(r cos theta, r sin theta)`.
    pub fn to_cartesian(&self) -> (f64, f64) {
        (self.r * self.theta.cos(), self.r * self.theta.sin())
    }

    /// Inverse of [`to_cartesian`](Self::to_cartesian); `theta` in `[0, 2*pi)`.
    pub fn from_cartesian(x: f64, y: f64) -> Self {
        let theta = y.atan2(x);
        Self {
            theta: if theta < 0.0 { theta + TAU } else { theta },
            r: x.hypot(y),
        }
    }
}

/// Hyperbolic disk of curvature `-zeta^2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HyperbolicDisk {
    pub zeta: f64,
}

impl Default for HyperbolicDisk {
    fn default() -> Self {
        Self { zeta: 1.0 }
    }
}

impl HyperbolicDisk {
    pub fn new(zeta: f64) -> Self {
        Self { zeta }
    }

    /// Hyperbolic distance between two native points.
    pub fn distance(&self, a: &PolarCoord, b: &PolarCoord) -> f64 {
        if a == b {
            return 0.0;
        }
        let z = self.zeta;
        let (ra, rb) = (z * a.r, z * b.r);
        let arg = ra.cosh() * rb.cosh() - ra.sinh() * rb.sinh() * (a.theta - b.theta).cos();
        // rounding can leave arg a hair below 1 for nearby points
        if arg <= 1.0 {
            return 0.0;
        }
        arg.acosh() / z
    }

    /// Euclidean radius in the Poincare disk for native radius `r`.
    pub fn to_poincare(&self, r: f64) -> f64 {
        (self.zeta * r / 2.0).tanh()
    }

    /// Native radius for a Poincare-disk radius in `[0, 1)`.
    pub fn from_poincare(&self, rho: f64) -> f64 {
        2.0 * rho.atanh() / self.zeta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    const EPS: f64 = 1e-10;

    #[test]
    fn test_distance_self_is_zero() {
        let disk = HyperbolicDisk::default();
        let p = PolarCoord::new(1.0, 3.0);
        assert_eq!(disk.distance(&p, &p), 0.0);
    }

    #[test]
    fn test_distance_from_origin_is_radius() {
        let disk = HyperbolicDisk::default();
        let o = PolarCoord::new(0.0, 0.0);
        let p = PolarCoord::new(2.0, 4.5);
        assert!((disk.distance(&o, &p) - 4.5).abs() < 1e-9);
    }

    #[test]
    fn test_distance_same_angle_is_radial_difference() {
        let disk = HyperbolicDisk::default();
        let a = PolarCoord::new(0.7, 2.0);
        let b = PolarCoord::new(0.7, 5.0);
        assert!((disk.distance(&a, &b) - 3.0).abs() < 1e-8);
    }

    #[test]
    fn test_opposite_points_pass_through_origin() {
        let disk = HyperbolicDisk::default();
        let a = PolarCoord::new(0.0, 2.0);
        let b = PolarCoord::new(PI, 3.0);
        assert!((disk.distance(&a, &b) - 5.0).abs() < 1e-8);
    }

    #[test]
    fn test_distance_symmetric_and_triangle() {
        let disk = HyperbolicDisk::new(0.5);
        let a = PolarCoord::new(0.1, 1.0);
        let b = PolarCoord::new(2.0, 2.5);
        let c = PolarCoord::new(4.0, 0.7);
        let (ab, ba) = (disk.distance(&a, &b), disk.distance(&b, &a));
        assert!((ab - ba).abs() < EPS);
        assert!(disk.distance(&a, &c) <= ab + disk.distance(&b, &c) + EPS);
    }

    #[test]
    fn test_poincare_round_trip() {
        let disk = HyperbolicDisk::default();
        for r in [0.0, 0.5, 3.0, 8.0] {
            let rho = disk.to_poincare(r);
            assert!((0.0..1.0).contains(&rho));
            assert!((disk.from_poincare(rho) - r).abs() < 1e-6);
        }
    }

    #[test]
    fn test_cartesian_round_trip() {
        let p = PolarCoord::new(5.0, 2.0);
        let (x, y) = p.to_cartesian();
        let q = PolarCoord::from_cartesian(x, y);
        assert!((q.theta - 5.0).abs() < EPS);
        assert!((q.r - 2.0).abs() < EPS);
    }
}
