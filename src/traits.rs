use core::fmt::Debug;
use num_traits::{Float, FloatConst, Num, One, Zero};

/// Trait for types that can be used as matrix elements.
///
/// Blanket-implemented for all types satisfying the bounds.
/// Covers `f32`, `f64`, and all integer types.
pub trait Scalar: Copy + PartialEq + Debug + Zero + One + Num {}

impl<T: Copy + PartialEq + Debug + Zero + One + Num> Scalar for T {}

/// Trait for floating-point matrix elements.
///
/// Required by every kernel: row reduction, eigen/SVD, Kalman filtering
/// and the DFT all need `sqrt`, `abs`, `atan2` and the `π` constant.
/// Implemented for `f32` and `f64`.
pub trait FloatScalar: Scalar + Float + FloatConst {}

impl<T: Scalar + Float + FloatConst> FloatScalar for T {}

/// Convert an `f64` literal into `T`.
///
/// Lossless for `f64`, rounds for `f32`. Never fails for the float types
/// `FloatScalar` is implemented for; falls back to `NaN` otherwise.
#[inline]
pub(crate) fn lit<T: FloatScalar>(x: f64) -> T {
    T::from(x).unwrap_or_else(T::nan)
}

/// Convert an index or count into `T`.
#[inline]
pub(crate) fn from_usize<T: FloatScalar>(n: usize) -> T {
    T::from(n).unwrap_or_else(T::nan)
}

/// Read-only access to a matrix-like type.
///
/// Lets algorithms operate on anything that exposes row/column indexing.
pub trait MatrixRef<T> {
    fn nrows(&self) -> usize;
    fn ncols(&self) -> usize;
    fn get(&self, row: usize, col: usize) -> &T;
}

/// Mutable access to a matrix-like type.
///
/// Extends `MatrixRef` with mutable element access, enabling
/// in-place algorithms (row reduction) to work generically.
pub trait MatrixMut<T>: MatrixRef<T> {
    fn get_mut(&mut self, row: usize, col: usize) -> &mut T;
}
