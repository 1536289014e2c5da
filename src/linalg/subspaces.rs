use crate::linalg::rref::{reduce_with, SystemKind};
use crate::linalg::LinalgError;
use crate::matrix::{Matrix, Vector};
use crate::tolerance::Tolerance;
use crate::traits::FloatScalar;

/// Bases for the four fundamental subspaces of an `m × n` matrix.
///
/// `row_space` and `null_space` live in `Rⁿ`; `column_space` and
/// `left_null_space` live in `Rᵐ`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Subspaces<T> {
    pub rank: usize,
    /// Non-zero rows of the RREF.
    pub row_space: Vec<Vector<T>>,
    /// Columns of the original matrix at the pivot positions.
    pub column_space: Vec<Vector<T>>,
    /// Unit-norm basis of `{v : A·v = 0}`.
    pub null_space: Vec<Vector<T>>,
    /// Unit-norm basis of `{w : Aᵗ·w = 0}`.
    pub left_null_space: Vec<Vector<T>>,
}

/// Four fundamental subspaces with the default tolerance.
///
/// ```
/// use microsim_kernels::Matrix;
/// use microsim_kernels::linalg::fundamental_subspaces;
///
/// let a = Matrix::new([[1.0_f64, 2.0], [2.0, 4.0], [3.0, 6.0]]);
/// let s = fundamental_subspaces(&a).unwrap();
/// assert_eq!(s.rank, 1);
/// assert_eq!(s.null_space.len(), 1);
/// assert_eq!(s.left_null_space.len(), 2);
/// ```
pub fn fundamental_subspaces<T: FloatScalar>(a: &Matrix<T>) -> Result<Subspaces<T>, LinalgError> {
    fundamental_subspaces_with(a, &Tolerance::default())
}

/// Four fundamental subspaces.
///
/// The left null space comes from reducing `Aᵗ`, so its dimension is
/// `m − rank(Aᵗ)`. Both reductions use the same tolerance and agree on the
/// rank for any matrix that is not within `eps` of a rank change.
pub fn fundamental_subspaces_with<T: FloatScalar>(
    a: &Matrix<T>,
    tol: &Tolerance<T>,
) -> Result<Subspaces<T>, LinalgError> {
    let dec = reduce_with(a, SystemKind::Homogeneous, tol)?;
    let dec_t = reduce_with(&a.transpose(), SystemKind::Homogeneous, tol)?;
    if dec_t.rank != dec.rank {
        log::debug!(
            "fundamental subspaces: rank(A) = {} but rank(Aᵗ) = {}",
            dec.rank,
            dec_t.rank
        );
    }

    let row_space = (0..dec.rank).map(|i| dec.rref.row_vector(i)).collect();
    let column_space = dec.pivot_cols.iter().map(|&j| a.column(j)).collect();

    Ok(Subspaces {
        rank: dec.rank,
        row_space,
        column_space,
        null_space: dec.null_basis,
        left_null_space: dec_t.null_basis,
    })
}
