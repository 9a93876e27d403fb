//! Angular coordinates on the unit circle.
//!
//! Reduced coordinates only carry angular information. Two ways of turning
//! them into unit vectors:
//!
//! - **Circular adjustment (CA)**: scale each row to unit length.
//! - **Equidistant adjustment (EA)**: CA, then rank nodes by their angle to
//!   `(1, 0)` and respace them at `2*pi*rank/n`. The order of the angles is
//!   kept, their spacing is not.
//!
//! Angles against the reference are measured with a clipped `acos` of the dot
//! product, so they live in `[0, pi]`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use num_traits::{Float, FloatConst, FromPrimitive};
use tracing::warn;

use crate::error::{Error, Result};

/// How reduced coordinates become unit vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AngularMode {
    /// Normalise each row.
    Circular,
    /// Normalise, then space equally while keeping angular order.
    #[default]
    Equidistant,
}

impl AngularMode {
    pub const ALL: [AngularMode; 2] = [Self::Circular, Self::Equidistant];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Circular => "CA",
            Self::Equidistant => "EA",
        }
    }
}

impl fmt::Display for AngularMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for AngularMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "unknown angular mode {:?} (expected CA or EA)",
                    s
                ))
            })
    }
}

fn cast<T: FromPrimitive>(x: usize) -> Result<T> {
    T::from_usize(x)
        .ok_or_else(|| Error::InvalidArgument(format!("{} not representable as float", x)))
}

/// Apply `mode` to an `n x 2` array of reduced coordinates.
///
/// `fallback` is the angle given to rows of zero norm; `None` makes such rows
/// an error.
pub fn adjust<T>(mode: AngularMode, coords: ArrayView2<'_, T>, fallback: Option<T>) -> Result<Array2<T>>
where
    T: Float + FloatConst + FromPrimitive + fmt::Display,
{
    match mode {
        AngularMode::Circular => circular_adjustment_with_fallback(coords, fallback),
        AngularMode::Equidistant => equidistant_adjustment(coords, fallback),
    }
}

/// Scale every row to unit Euclidean length. Works in any dimension.
///
/// Rows of zero norm fail with [`Error::DegenerateInput`].
pub fn circular_adjustment<T>(coords: ArrayView2<'_, T>) -> Result<Array2<T>>
where
    T: Float + FloatConst + FromPrimitive + fmt::Display,
{
    circular_adjustment_with_fallback(coords, None)
}

/// [`circular_adjustment`] that places zero-norm rows at a fixed angle.
///
/// The fallback only makes sense in the plane, so it requires two columns.
pub fn circular_adjustment_with_fallback<T>(
    coords: ArrayView2<'_, T>,
    fallback: Option<T>,
) -> Result<Array2<T>>
where
    T: Float + FloatConst + FromPrimitive + fmt::Display,
{
    let mut out = coords.to_owned();
    for (i, mut row) in out.axis_iter_mut(Axis(0)).enumerate() {
        // hypot keeps the norm finite and non-zero across the whole float range
        let norm = row.iter().fold(T::zero(), |acc, &x| acc.hypot(x));
        if norm > T::zero() && norm.is_finite() {
            row.mapv_inplace(|x| x / norm);
            continue;
        }
        match fallback {
            Some(theta) if row.len() == 2 => {
                warn!(row = i, %theta, "zero-norm coordinates, using fallback angle");
                row[0] = theta.cos();
                row[1] = theta.sin();
            }
            _ => {
                return Err(Error::DegenerateInput(format!(
                    "row {} has norm {}, cannot place it on the unit circle",
                    i, norm
                )))
            }
        }
    }
    Ok(out)
}

/// Circular adjustment followed by equidistant respacing.
///
/// The node with the `k`-th smallest angle to `(1, 0)` (0-based, ties by row
/// index) lands at angle `2*pi*k/n`.
pub fn equidistant_adjustment<T>(coords: ArrayView2<'_, T>, fallback: Option<T>) -> Result<Array2<T>>
where
    T: Float + FloatConst + FromPrimitive + fmt::Display,
{
    let (n, dim) = coords.dim();
    if dim != 2 {
        return Err(Error::DimensionMismatch {
            expected: (n, 2),
            actual: (n, dim),
        });
    }
    if n == 0 {
        return Ok(Array2::zeros((0, 2)));
    }

    let unit = circular_adjustment_with_fallback(coords, fallback)?;
    let reference = Array1::from_vec(vec![T::one(), T::zero()]);
    let theta = angle_between(unit.view(), reference.view())?;

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| theta[a].partial_cmp(&theta[b]).unwrap_or(Ordering::Equal));

    let step = T::TAU() / cast::<T>(n)?;
    let mut out = Array2::zeros((n, 2));
    for (rank, &i) in order.iter().enumerate() {
        let phi = step * cast::<T>(rank)?;
        out[[i, 0]] = phi.cos();
        out[[i, 1]] = phi.sin();
    }
    Ok(out)
}

/// Angle between each row of `vecs` and `baseline`, in `[0, pi]`.
///
/// Both sides are normalised first; the dot product is clipped to `[-1, 1]`
/// before `acos` so rounding cannot push it out of the domain.
pub fn angle_between<T>(vecs: ArrayView2<'_, T>, baseline: ArrayView1<'_, T>) -> Result<Array1<T>>
where
    T: Float + FloatConst + FromPrimitive + fmt::Display,
{
    let (n, dim) = vecs.dim();
    if baseline.len() != dim {
        return Err(Error::DimensionMismatch {
            expected: (1, dim),
            actual: (1, baseline.len()),
        });
    }
    let unit = circular_adjustment(vecs)?;
    let base = circular_adjustment(baseline.insert_axis(Axis(0)))?;
    let base = base.row(0);

    let mut angles = Array1::zeros(n);
    for (i, row) in unit.axis_iter(Axis(0)).enumerate() {
        let dot = row
            .iter()
            .zip(base.iter())
            .fold(T::zero(), |acc, (&a, &b)| acc + a * b);
        let cos = dot.max(-T::one()).min(T::one());
        angles[i] = cos.acos();
    }
    Ok(angles)
}

/// Full-turn polar angle of each row of an `n x 2` array, in `[0, 2*pi)`.
pub fn polar_angles<T>(coords: ArrayView2<'_, T>) -> Array1<T>
where
    T: Float + FloatConst,
{
    coords
        .axis_iter(Axis(0))
        .map(|row| {
            let phi = row[1].atan2(row[0]);
            if phi < T::zero() {
                phi + T::TAU()
            } else {
                phi
            }
        })
        .collect()
}
