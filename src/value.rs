//! Canonical prediction payloads.
//!
//! [`PredictionValue`] is the single source of truth carried by a
//! [`PredictionVector`](crate::PredictionVector): either one scalar
//! (regression value, decision value, or class probability) or an ordered
//! sequence of scalars (ensemble output). Heterogeneous numeric inputs are
//! resolved into this variant once, at the boundary, so downstream stages
//! never re-inspect runtime types.
//!
//! Values are sanitized on entry: non-finite entries never survive
//! construction (see [`PredictionValue::sanitized`]).

use approx::{AbsDiffEq, RelativeEq};
use ndarray::{Array1, Array2, ArrayView2};

use crate::error::PredictionError;

/// Sentinel magnitude substituted for a non-finite scalar prediction.
///
/// The sign of the original value is preserved so downstream thresholding
/// still resolves to the same side of the decision boundary.
pub const SENTINEL: f64 = 1e9;

/// Relative tolerance used by [`PredictionValue::allclose`].
pub const RTOL: f64 = 1e-5;

/// Absolute tolerance used by [`PredictionValue::allclose`].
pub const ATOL: f64 = 1e-8;

/// Integer magnitudes above this lose precision when widened to `f64`.
const MAX_EXACT_INT: u64 = 1 << 53;

/// A prediction payload: one value or an ordered sequence.
///
/// # Example
///
/// ```
/// use predvec::PredictionValue;
///
/// let scalar = PredictionValue::from(0.73);
/// assert_eq!(scalar.len(), 1);
///
/// let multi = PredictionValue::from(vec![0.1, -0.4]);
/// assert_eq!(multi.len(), 2);
/// assert!(!multi.is_scalar());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionValue {
    /// A single prediction value.
    Scalar(f64),
    /// Multiple prediction values in pipeline order.
    Vector(Vec<f64>),
}

impl PredictionValue {
    /// Number of values carried.
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Self::Scalar(_) => 1,
            Self::Vector(values) => values.len(),
        }
    }

    /// Returns `true` if no values are carried.
    ///
    /// Only a `Vector` built from an empty sequence can be empty; vector
    /// constructors reject this before storing.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` for the single-value form.
    #[inline]
    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(_))
    }

    /// Value at `index`, if present.
    #[inline]
    pub fn get(&self, index: usize) -> Option<f64> {
        match self {
            Self::Scalar(value) if index == 0 => Some(*value),
            Self::Scalar(_) => None,
            Self::Vector(values) => values.get(index).copied(),
        }
    }

    /// Iterate over the carried values.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        match self {
            Self::Scalar(value) => std::slice::from_ref(value).iter().copied(),
            Self::Vector(values) => values.iter().copied(),
        }
    }

    /// Copy the carried values into a `Vec`.
    pub fn to_vec(&self) -> Vec<f64> {
        match self {
            Self::Scalar(value) => vec![*value],
            Self::Vector(values) => values.clone(),
        }
    }

    /// Replace non-finite content with usable finite values.
    ///
    /// - A sequence with any non-finite entry becomes all-zero of the same
    ///   length.
    /// - A non-finite scalar becomes `SENTINEL` when the original compared
    ///   greater than zero and `-SENTINEL` otherwise. NaN fails the
    ///   comparison and lands on the negative sentinel.
    ///
    /// The sign decision is made on the original value, before any other
    /// rewrite.
    pub fn sanitized(self) -> Self {
        match self {
            Self::Scalar(value) if !value.is_finite() => {
                if value > 0.0 {
                    Self::Scalar(SENTINEL)
                } else {
                    Self::Scalar(-SENTINEL)
                }
            }
            Self::Vector(values) if values.iter().any(|v| !v.is_finite()) => {
                Self::Vector(vec![0.0; values.len()])
            }
            other => other,
        }
    }

    /// Returns `true` if every carried value is finite.
    pub fn is_finite(&self) -> bool {
        self.iter().all(|v| v.is_finite())
    }

    /// The canonical `(1, k)` matrix form.
    pub fn to_row(&self) -> Array2<f64> {
        let data = self.to_vec();
        Array2::from_shape_vec((1, data.len()), data).expect("row data matches (1, k) shape")
    }

    /// Collapse a single-row matrix into a value.
    ///
    /// A one-element row becomes a `Scalar`; a wider row becomes a
    /// `Vector`.
    pub fn from_row(matrix: ArrayView2<'_, f64>) -> Result<Self, PredictionError> {
        if matrix.nrows() != 1 {
            return Err(PredictionError::ShapeMismatch {
                rows: matrix.nrows(),
            });
        }
        if matrix.ncols() == 0 {
            return Err(PredictionError::EmptyPrediction);
        }
        let row = matrix.row(0).to_vec();
        Ok(if row.len() == 1 {
            Self::Scalar(row[0])
        } else {
            Self::Vector(row)
        })
    }

    /// Elementwise closeness under `RTOL`/`ATOL`.
    ///
    /// Mirrors the step function used by array libraries:
    /// `|a - b| <= ATOL + RTOL * |b|`. Values of different form or length
    /// are never close.
    pub fn allclose(&self, other: &Self) -> bool {
        fn close(a: f64, b: f64) -> bool {
            (a - b).abs() <= ATOL + RTOL * b.abs()
        }
        match (self, other) {
            (Self::Scalar(a), Self::Scalar(b)) => close(*a, *b),
            (Self::Vector(a), Self::Vector(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| close(*x, *y))
            }
            _ => false,
        }
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<f64> for PredictionValue {
    fn from(value: f64) -> Self {
        Self::Scalar(value)
    }
}

impl From<f32> for PredictionValue {
    fn from(value: f32) -> Self {
        Self::Scalar(f64::from(value))
    }
}

impl From<i32> for PredictionValue {
    fn from(value: i32) -> Self {
        Self::Scalar(f64::from(value))
    }
}

impl From<u32> for PredictionValue {
    fn from(value: u32) -> Self {
        Self::Scalar(f64::from(value))
    }
}

impl From<i64> for PredictionValue {
    fn from(value: i64) -> Self {
        if value.unsigned_abs() > MAX_EXACT_INT {
            tracing::warn!(value, "prediction exceeds exact f64 range, coercing");
        }
        Self::Scalar(value as f64)
    }
}

impl From<u64> for PredictionValue {
    fn from(value: u64) -> Self {
        if value > MAX_EXACT_INT {
            tracing::warn!(value, "prediction exceeds exact f64 range, coercing");
        }
        Self::Scalar(value as f64)
    }
}

impl From<Vec<f64>> for PredictionValue {
    fn from(values: Vec<f64>) -> Self {
        Self::Vector(values)
    }
}

impl From<&[f64]> for PredictionValue {
    fn from(values: &[f64]) -> Self {
        Self::Vector(values.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for PredictionValue {
    fn from(values: [f64; N]) -> Self {
        Self::Vector(values.to_vec())
    }
}

impl From<Array1<f64>> for PredictionValue {
    fn from(values: Array1<f64>) -> Self {
        Self::Vector(values.to_vec())
    }
}

// =============================================================================
// Approx Trait Implementations
// =============================================================================

impl AbsDiffEq for PredictionValue {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        match (self, other) {
            (Self::Scalar(a), Self::Scalar(b)) => a.abs_diff_eq(b, epsilon),
            (Self::Vector(a), Self::Vector(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.abs_diff_eq(y, epsilon))
            }
            _ => false,
        }
    }
}

impl RelativeEq for PredictionValue {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        match (self, other) {
            (Self::Scalar(a), Self::Scalar(b)) => a.relative_eq(b, epsilon, max_relative),
            (Self::Vector(a), Self::Vector(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b)
                        .all(|(x, y)| x.relative_eq(y, epsilon, max_relative))
            }
            _ => false,
        }
    }
}
