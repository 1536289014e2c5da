//! Shared near-zero tolerance.
//!
//! Row reduction and the 2×2 eigen/SVD kernels compare against the same
//! threshold: a pivot, an off-diagonal entry or a singular value whose
//! magnitude is below `eps` is treated as exactly zero. Floating-point noise
//! left over from elimination would otherwise show up as spurious pivots.

use crate::traits::{lit, FloatScalar};

/// Default near-zero threshold shared by all kernels.
pub const DEFAULT_EPSILON: f64 = 1e-4;

/// Near-zero tolerance settings.
///
/// ```
/// use microsim_kernels::Tolerance;
///
/// let tol = Tolerance::<f64>::default();
/// assert!(tol.is_zero(5e-5));
/// assert!(!tol.is_zero(2e-4));
///
/// let strict = Tolerance::new(1e-10_f64);
/// assert!(!strict.is_zero(5e-5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tolerance<T> {
    /// Magnitudes strictly below this value count as zero.
    pub eps: T,
}

impl<T: FloatScalar> Default for Tolerance<T> {
    fn default() -> Self {
        Self {
            eps: lit(DEFAULT_EPSILON),
        }
    }
}

impl<T: FloatScalar> Tolerance<T> {
    /// Tolerance with an explicit threshold.
    pub fn new(eps: T) -> Self {
        Self { eps }
    }

    /// `|x| < eps`.
    #[inline]
    pub fn is_zero(&self, x: T) -> bool {
        x.abs() < self.eps
    }

    /// `|x| > eps`.
    #[inline]
    pub fn is_nonzero(&self, x: T) -> bool {
        x.abs() > self.eps
    }
}
