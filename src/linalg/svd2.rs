use crate::linalg::eigen2::eigen2x2_with;
use crate::linalg::LinalgError;
use crate::matrix::{Matrix, Vector};
use crate::tolerance::Tolerance;
use crate::traits::FloatScalar;

/// Singular value decomposition of a 2×2 matrix: `A = U·diag(σ)·Vᵗ`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Svd2<T> {
    /// Left singular vectors as columns.
    pub u: Matrix<T>,
    /// `σ₁ ≥ σ₂ ≥ 0`.
    pub singular_values: [T; 2],
    /// Right singular vectors as rows.
    pub vt: Matrix<T>,
    /// `σ₂` is within the tolerance of zero.
    pub degenerate: bool,
}

impl<T: FloatScalar> Svd2<T> {
    /// Number of singular values above `tol.eps`.
    pub fn rank(&self, tol: &Tolerance<T>) -> usize {
        self.singular_values.iter().filter(|&&s| s > tol.eps).count()
    }

    /// `U·diag(σ)·Vᵗ`.
    pub fn reconstruct(&self) -> Matrix<T> {
        let s = Matrix::from_diagonal(&self.singular_values);
        &(&self.u * &s) * &self.vt
    }

    /// `σ₁ / σ₂`, or infinity when degenerate.
    pub fn condition_number(&self) -> T {
        if self.degenerate {
            T::infinity()
        } else {
            self.singular_values[0] / self.singular_values[1]
        }
    }
}

/// 2×2 SVD with the default tolerance.
pub fn svd2x2<T: FloatScalar>(a: &Matrix<T>) -> Result<Svd2<T>, LinalgError> {
    svd2x2_with(a, &Tolerance::default())
}

/// 2×2 SVD through the eigendecomposition of `AᵗA`.
///
/// `V` comes from the dominant eigenvector of `AᵗA` and its perpendicular,
/// so it is orthonormal even when the eigenvalues coincide. Each
/// `uᵢ = A·vᵢ/σᵢ` for `σᵢ > eps`; a zero singular value takes the
/// perpendicular of `u₁` instead, and `U = I` for the zero matrix.
///
/// ```
/// use microsim_kernels::Matrix;
/// use microsim_kernels::linalg::svd2x2;
///
/// let a = Matrix::new([[1.0_f64, 2.0], [2.0, 4.0]]);
/// let svd = svd2x2(&a).unwrap();
/// assert!(svd.degenerate);
/// assert!(svd.reconstruct().max_abs_diff(&a).unwrap() < 1e-12);
/// ```
pub fn svd2x2_with<T: FloatScalar>(
    a: &Matrix<T>,
    tol: &Tolerance<T>,
) -> Result<Svd2<T>, LinalgError> {
    if a.shape() != (2, 2) {
        return Err(LinalgError::WrongShape {
            expected: (2, 2),
            got: a.shape(),
        });
    }
    if !a.is_finite() {
        return Err(LinalgError::NonFinite);
    }

    let ata = &a.transpose() * a;
    let eig = eigen2x2_with(&ata, tol)?;
    let v1 = match &eig.eigenvectors {
        Some([v, _]) => v.clone(),
        None => Vector::unit(2, 0),
    };
    let v2 = v1.perp2();

    let [l1, l2] = eig.eigenvalues;
    let s1 = l1.max(T::zero()).sqrt();
    let s2 = l2.max(T::zero()).sqrt();

    let left = |v: &Vector<T>, s: T| -> Option<Vector<T>> {
        if s > tol.eps {
            Some(&(a * v) * (T::one() / s))
        } else {
            None
        }
    };
    let (u1, u2) = match (left(&v1, s1), left(&v2, s2)) {
        (Some(u1), Some(u2)) => (u1, u2),
        (Some(u1), None) => {
            log::debug!("svd2x2: zero singular value, completing U with perpendicular");
            let u2 = u1.perp2();
            (u1, u2)
        }
        _ => {
            log::debug!("svd2x2: zero matrix, U = I");
            (Vector::unit(2, 0), Vector::unit(2, 1))
        }
    };

    Ok(Svd2 {
        u: Matrix::new([[u1[0], u2[0]], [u1[1], u2[1]]]),
        singular_values: [s1, s2],
        vt: Matrix::new([[v1[0], v1[1]], [v2[0], v2[1]]]),
        degenerate: s2 <= tol.eps,
    })
}
