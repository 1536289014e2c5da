//! Row reduction and closed-form 2×2 decompositions.
//!
//! # Row reduction
//!
//! ```
//! use microsim_kernels::Matrix;
//! use microsim_kernels::linalg::{reduce_augmented, SolutionSet};
//!
//! let ab = Matrix::new([
//!     [2.0_f64, 1.0, -1.0, 8.0],
//!     [-3.0, -1.0, 2.0, -11.0],
//!     [-2.0, 1.0, 2.0, -3.0],
//! ]);
//! let dec = reduce_augmented(&ab).unwrap();
//! match dec.solution_set() {
//!     SolutionSet::Unique(x) => assert!((x[0] - 2.0).abs() < 1e-9),
//!     other => panic!("expected a unique solution, got {:?}", other),
//! }
//! ```
//!
//! # 2×2 eigen / SVD
//!
//! ```
//! use microsim_kernels::Matrix;
//! use microsim_kernels::linalg::{eigen2x2, svd2x2};
//!
//! let a = Matrix::new([[2.0_f64, 1.0], [0.0, 3.0]]);
//! let eig = eigen2x2(&a).unwrap();
//! assert!(!eig.degenerate);
//! assert!((eig.eigenvalues[0] - 3.0).abs() < 1e-12);
//!
//! let svd = svd2x2(&Matrix::new([[3.0_f64, 1.0], [1.0, 3.0]])).unwrap();
//! assert!((svd.singular_values[0] - 4.0).abs() < 1e-12);
//! assert!((svd.singular_values[1] - 2.0).abs() < 1e-12);
//! ```

pub(crate) mod eigen2;
pub(crate) mod rref;
pub(crate) mod subspaces;
pub(crate) mod svd2;

pub use eigen2::{
    confidence_ellipse, eigen2x2, eigen2x2_with, matrix_power2x2, Diagonalization, Eigen2,
    EigenKind, Ellipse, MatrixPower,
};
pub use rref::{
    reduce, reduce_augmented, reduce_with, Decomposition, RowOpCounts, SolutionSet, SystemKind,
};
pub use subspaces::{fundamental_subspaces, fundamental_subspaces_with, Subspaces};
pub use svd2::{svd2x2, svd2x2_with, Svd2};

/// Errors from linear algebra operations.
///
/// Only input validation and the singular-inverse division point are
/// errors. Rank deficiency, defective or complex eigenvalues and zero
/// singular values are reported as flags on the Ok result.
///
/// ```
/// use microsim_kernels::Matrix;
/// use microsim_kernels::linalg::LinalgError;
///
/// let singular = Matrix::new([[1.0_f64, 2.0], [2.0, 4.0]]);
/// assert_eq!(singular.inverse().unwrap_err(), LinalgError::Singular);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LinalgError {
    /// Matrix is singular or nearly singular.
    #[error("matrix is singular")]
    Singular,
    /// Operation requires a square matrix.
    #[error("matrix must be square, got {}x{}", .shape.0, .shape.1)]
    NotSquare { shape: (usize, usize) },
    /// Operation requires a specific shape.
    #[error("expected a {}x{} matrix, got {}x{}", .expected.0, .expected.1, .got.0, .got.1)]
    WrongShape {
        expected: (usize, usize),
        got: (usize, usize),
    },
    /// An augmented system needs at least the right-hand-side column.
    #[error("augmented system has no right-hand-side column")]
    MissingRhs,
    /// Input contains NaN or infinity.
    #[error("matrix contains non-finite entries")]
    NonFinite,
}
