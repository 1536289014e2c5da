//! # microsim-kernels
//!
//! Small dense numerical kernels for interactive linear-algebra teaching
//! simulations: row reduction, closed-form 2×2 eigen/SVD, a linear Kalman
//! filter and a 2-D discrete Fourier transform with frequency masks.
//! Every kernel is a deterministic function of its inputs; only the Kalman
//! state is threaded between calls, and it is owned by the caller.
//!
//! ## Quick start
//!
//! ```
//! use microsim_kernels::Matrix;
//! use microsim_kernels::linalg::{reduce_augmented, SolutionSet};
//!
//! // Solve a linear system Ax = b from its augmented matrix [A | b]
//! let ab = Matrix::new([
//!     [2.0_f64, 1.0, -1.0, 8.0],
//!     [-3.0, -1.0, 2.0, -11.0],
//!     [-2.0, 1.0, 2.0, -3.0],
//! ]);
//! let dec = reduce_augmented(&ab).unwrap();
//! assert_eq!(dec.rank, 3);
//! if let SolutionSet::Unique(x) = dec.solution_set() {
//!     assert!((x[1] - 3.0).abs() < 1e-12); // x = [2, 3, -1]
//! }
//! ```
//!
//! ## Modules
//!
//! - [`matrix`] — Runtime-sized, row-major `Matrix<T>` and `Vector<T>`.
//!   Arithmetic operators panic on a shape mismatch; `checked_*` methods
//!   return [`MatrixError`] instead. Includes trace, 2×2 determinant, closed
//!   form 2×2 inverse and a Gauss–Jordan inverse.
//!
//! - [`linalg`] — Gaussian elimination with partial pivoting to RREF, rank,
//!   null space and solution-set classification; the four fundamental
//!   subspaces; closed-form 2×2 eigendecomposition and SVD; matrix powers
//!   and covariance ellipses.
//!
//! - [`estimate`] — Linear Kalman filter predict/update with a stateful
//!   wrapper and the standard 2-D tracking models.
//!
//! - [`spectral`] — Direct 2-D DFT/IDFT with centred spectra, low/high/band
//!   pass masks and synthetic test images.
//!
//! - [`tolerance`] — The shared near-zero threshold ([`DEFAULT_EPSILON`] =
//!   `1e-4`), passed as [`Tolerance`] to the `*_with` entry points.
//!
//! - [`traits`] — Element traits:
//!   - [`Scalar`] — all matrix elements (`Copy + PartialEq + Debug + Zero + One + Num`)
//!   - [`FloatScalar`] — real floats (`f32`, `f64`), required by every kernel
//!   - [`MatrixRef`] / [`MatrixMut`] — generic read/write access for in-place algorithms
//!
//! ## Logging
//!
//! Kernels emit records through the [`log`](https://docs.rs/log) facade:
//! `trace` for pivot selection, `debug` when a degenerate condition is
//! flagged, `warn` when a self-check fails. No logger is installed.
//!
//! ## Cargo features
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `serde` | no      | `Serialize` on matrices and results, `Deserialize` on settings |

pub mod estimate;
pub mod linalg;
pub mod matrix;
pub mod spectral;
pub mod tolerance;
pub mod traits;

pub use matrix::{Matrix, MatrixError, Vector};
pub use tolerance::{Tolerance, DEFAULT_EPSILON};
pub use traits::{FloatScalar, MatrixMut, MatrixRef, Scalar};
