use crate::linalg::LinalgError;
use crate::matrix::{Matrix, Vector};
use crate::tolerance::Tolerance;
use crate::traits::{lit, FloatScalar};

/// Nature of the eigenvalues of a 2×2 matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum EigenKind<T> {
    /// Two real eigenvalues that differ by more than the tolerance.
    Distinct,
    /// A repeated real eigenvalue with two independent eigenvectors
    /// (a scalar matrix `λI`).
    Repeated,
    /// Real eigenvalues whose eigenvectors are linearly dependent; the
    /// matrix cannot be diagonalized.
    Defective,
    /// Complex-conjugate pair `re ± i·im`.
    Complex { re: T, im: T },
}

/// Closed-form eigendecomposition of a 2×2 matrix.
///
/// `degenerate` is set when the discriminant `(tr A)² − 4·det A` is `≤ 0`
/// or the eigenvectors are linearly dependent. A repeated eigenvalue of a
/// scalar matrix is flagged degenerate but still carries two independent
/// eigenvectors; [`Eigen2::diagonalization`] decides on the vectors alone.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Eigen2<T> {
    /// `λ₁ ≥ λ₂`. Both `NaN` for a complex pair.
    pub eigenvalues: [T; 2],
    /// Unit eigenvectors matching `eigenvalues`, `None` for a complex pair.
    pub eigenvectors: Option<[Vector<T>; 2]>,
    pub degenerate: bool,
    pub kind: EigenKind<T>,
}

/// `A = P·D·P⁻¹`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Diagonalization<T> {
    /// Eigenvectors as columns.
    pub p: Matrix<T>,
    /// Eigenvalues on the diagonal.
    pub d: Matrix<T>,
    pub p_inv: Matrix<T>,
}

impl<T: FloatScalar> Eigen2<T> {
    /// Whether the eigenvalues are real.
    pub fn is_real(&self) -> bool {
        !matches!(self.kind, EigenKind::Complex { .. })
    }

    /// `P`, `D` and `P⁻¹`, or `None` when the eigenvalues are complex or the
    /// eigenvectors do not span the plane.
    ///
    /// ```
    /// use microsim_kernels::Matrix;
    /// use microsim_kernels::linalg::eigen2x2;
    ///
    /// let a = Matrix::new([[2.0_f64, 1.0], [0.0, 3.0]]);
    /// let dg = eigen2x2(&a).unwrap().diagonalization().unwrap();
    /// let back = &(&dg.p * &dg.d) * &dg.p_inv;
    /// assert!(back.max_abs_diff(&a).unwrap() < 1e-12);
    ///
    /// let defective = Matrix::new([[2.0_f64, 1.0], [0.0, 2.0]]);
    /// assert!(eigen2x2(&defective).unwrap().diagonalization().is_none());
    /// ```
    pub fn diagonalization(&self) -> Option<Diagonalization<T>> {
        if self.kind == EigenKind::Defective {
            return None;
        }
        let [v1, v2] = self.eigenvectors.as_ref()?;
        let p = Matrix::new([[v1[0], v2[0]], [v1[1], v2[1]]]);
        let p_inv = p.inverse2x2().ok()?;
        Some(Diagonalization {
            p,
            d: Matrix::from_diagonal(&self.eigenvalues),
            p_inv,
        })
    }
}

/// Eigendecomposition with the default tolerance.
pub fn eigen2x2<T: FloatScalar>(a: &Matrix<T>) -> Result<Eigen2<T>, LinalgError> {
    eigen2x2_with(a, &Tolerance::default())
}

/// Closed-form eigenvalues and eigenvectors of a 2×2 matrix.
///
/// The discriminant is evaluated as `(a11 − a22)² + 4·a12·a21`, which is
/// algebraically `t² − 4d` and never negative for a symmetric input.
///
/// # Errors
///
/// [`LinalgError::WrongShape`] unless `a` is 2×2, [`LinalgError::NonFinite`]
/// for NaN/∞ entries. Complex and defective cases are reported in the
/// result.
///
/// ```
/// use microsim_kernels::Matrix;
/// use microsim_kernels::linalg::{eigen2x2, EigenKind};
///
/// let rotation = Matrix::new([[0.0_f64, -1.0], [1.0, 0.0]]);
/// let eig = eigen2x2(&rotation).unwrap();
/// assert!(eig.degenerate);
/// assert!(eig.eigenvectors.is_none());
/// assert_eq!(eig.kind, EigenKind::Complex { re: 0.0, im: 1.0 });
/// ```
pub fn eigen2x2_with<T: FloatScalar>(
    a: &Matrix<T>,
    tol: &Tolerance<T>,
) -> Result<Eigen2<T>, LinalgError> {
    if a.shape() != (2, 2) {
        return Err(LinalgError::WrongShape {
            expected: (2, 2),
            got: a.shape(),
        });
    }
    if !a.is_finite() {
        return Err(LinalgError::NonFinite);
    }
    let (a11, a12) = (a[(0, 0)], a[(0, 1)]);
    let (a21, a22) = (a[(1, 0)], a[(1, 1)]);
    let two = lit::<T>(2.0);
    let four = lit::<T>(4.0);

    let half_trace = (a11 + a22) / two;
    let diff = a11 - a22;
    let disc = diff * diff + four * a12 * a21;

    if disc < T::zero() {
        let im = (-disc).sqrt() / two;
        log::debug!("eigen2x2: complex pair {:?} ± {:?}i", half_trace, im);
        return Ok(Eigen2 {
            eigenvalues: [T::nan(), T::nan()],
            eigenvectors: None,
            degenerate: true,
            kind: EigenKind::Complex { re: half_trace, im },
        });
    }

    let half_root = disc.sqrt() / two;
    let l1 = half_trace + half_root;
    let l2 = half_trace - half_root;

    let scalar = tol.is_zero(a12) && tol.is_zero(a21) && tol.is_zero(diff);
    let (v1, v2) = if scalar {
        (Vector::unit(2, 0), Vector::unit(2, 1))
    } else {
        (
            eigenvector(a11, a12, a21, a22, l1, tol),
            eigenvector(a11, a12, a21, a22, l2, tol),
        )
    };

    let kind = if tol.is_zero(v1.cross2(&v2)) {
        log::debug!("eigen2x2: defective matrix, eigenvalue {:?}", l1);
        EigenKind::Defective
    } else if tol.is_zero(l1 - l2) {
        EigenKind::Repeated
    } else {
        EigenKind::Distinct
    };

    Ok(Eigen2 {
        eigenvalues: [l1, l2],
        eigenvectors: Some([v1, v2]),
        degenerate: disc <= T::zero() || kind == EigenKind::Defective,
        kind,
    })
}

/// Unit vector solving `(A − λI)·v = 0`.
fn eigenvector<T: FloatScalar>(
    a11: T,
    a12: T,
    a21: T,
    a22: T,
    lambda: T,
    tol: &Tolerance<T>,
) -> Vector<T> {
    let v = if tol.is_nonzero(a12) {
        Vector::from_vec(vec![a12, lambda - a11])
    } else if tol.is_nonzero(a11 - lambda) {
        // Lower triangular with λ = a22
        Vector::unit(2, 1)
    } else if tol.is_nonzero(a21) {
        Vector::from_vec(vec![lambda - a22, a21])
    } else {
        Vector::unit(2, 0)
    };
    v.normalize().unwrap_or_else(|| Vector::unit(2, 0))
}

/// `Aᵏ` computed two ways.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MatrixPower<T> {
    /// Repeated multiplication.
    pub direct: Matrix<T>,
    /// `P·Dᵏ·P⁻¹`, when the matrix is diagonalizable.
    pub via_diagonalization: Option<Matrix<T>>,
}

/// `Aᵏ` for a 2×2 matrix by direct multiplication and, when possible, by
/// diagonalization.
///
/// ```
/// use microsim_kernels::Matrix;
/// use microsim_kernels::linalg::matrix_power2x2;
///
/// let a = Matrix::new([[2.0_f64, 1.0], [1.0, 2.0]]);
/// let pw = matrix_power2x2(&a, 5).unwrap();
/// let diag = pw.via_diagonalization.unwrap();
/// assert!(pw.direct.max_abs_diff(&diag).unwrap() < 1e-9);
/// ```
pub fn matrix_power2x2<T: FloatScalar>(
    a: &Matrix<T>,
    k: u32,
) -> Result<MatrixPower<T>, LinalgError> {
    let eig = eigen2x2(a)?;
    let direct = a.pow(k)?;
    // powi takes an i32; larger exponents use direct multiplication only
    let exp = i32::try_from(k).ok();
    let via_diagonalization = eig.diagonalization().zip(exp).map(|(dg, exp)| {
        let dk = Matrix::from_diagonal(&[dg.d[(0, 0)].powi(exp), dg.d[(1, 1)].powi(exp)]);
        &(&dg.p * &dk) * &dg.p_inv
    });
    if via_diagonalization.is_none() {
        log::debug!("matrix power: no diagonalized form for k = {}", k);
    }
    Ok(MatrixPower {
        direct,
        via_diagonalization,
    })
}

/// Axes of a covariance ellipse.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Ellipse<T> {
    pub semi_major: T,
    pub semi_minor: T,
    /// Angle of the major axis from the x axis, radians in `[-π/2, π/2]`.
    pub angle: T,
}

/// `n_sigma` confidence ellipse of a 2×2 covariance.
///
/// The input is symmetrized as `(C + Cᵗ)/2` first. Negative eigenvalues
/// from rounding are clamped to zero before the square root.
///
/// ```
/// use microsim_kernels::Matrix;
/// use microsim_kernels::linalg::confidence_ellipse;
///
/// let cov = Matrix::new([[4.0_f64, 0.0], [0.0, 1.0]]);
/// let e = confidence_ellipse(&cov, 2.0).unwrap();
/// assert!((e.semi_major - 4.0).abs() < 1e-12);
/// assert!((e.semi_minor - 2.0).abs() < 1e-12);
/// assert!(e.angle.abs() < 1e-12);
/// ```
pub fn confidence_ellipse<T: FloatScalar>(
    cov: &Matrix<T>,
    n_sigma: T,
) -> Result<Ellipse<T>, LinalgError> {
    if cov.shape() != (2, 2) {
        return Err(LinalgError::WrongShape {
            expected: (2, 2),
            got: cov.shape(),
        });
    }
    let two = lit::<T>(2.0);
    let off = (cov[(0, 1)] + cov[(1, 0)]) / two;
    let sym = Matrix::new([[cov[(0, 0)], off], [off, cov[(1, 1)]]]);
    let eig = eigen2x2(&sym)?;
    let [l1, l2] = eig.eigenvalues;
    let angle = (two * off).atan2(sym[(0, 0)] - sym[(1, 1)]) / two;
    Ok(Ellipse {
        semi_major: n_sigma * l1.max(T::zero()).sqrt(),
        semi_minor: n_sigma * l2.max(T::zero()).sqrt(),
        angle,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn residual(a: &Matrix<f64>, lambda: f64, v: &Vector<f64>) -> f64 {
        let av = a * v;
        (&av - &(v * lambda)).norm()
    }

    #[test]
    fn upper_triangular_distinct() {
        let a = Matrix::new([[2.0, 1.0], [0.0, 3.0]]);
        let eig = eigen2x2(&a).unwrap();
        assert_eq!(eig.kind, EigenKind::Distinct);
        assert!(!eig.degenerate);
        assert_relative_eq!(eig.eigenvalues[0], 3.0, epsilon = 1e-12);
        assert_relative_eq!(eig.eigenvalues[1], 2.0, epsilon = 1e-12);

        let [v1, v2] = eig.eigenvectors.clone().unwrap();
        let s = 0.5_f64.sqrt();
        assert_relative_eq!(v1[0], s, epsilon = 1e-12);
        assert_relative_eq!(v1[1], s, epsilon = 1e-12);
        assert_eq!(v2.as_slice(), &[1.0, 0.0]);
        assert!(residual(&a, 3.0, &v1) < 1e-12);
        assert!(residual(&a, 2.0, &v2) < 1e-12);
    }

    #[test]
    fn jordan_block_is_defective() {
        let a = Matrix::new([[2.0, 1.0], [0.0, 2.0]]);
        let eig = eigen2x2(&a).unwrap();
        assert!(eig.degenerate);
        assert_eq!(eig.kind, EigenKind::Defective);
        assert_eq!(eig.eigenvalues, [2.0, 2.0]);
        assert!(eig.diagonalization().is_none());
    }

    #[test]
    fn scalar_matrix_keeps_standard_basis() {
        let a = Matrix::new([[5.0, 0.0], [0.0, 5.0]]);
        let eig = eigen2x2(&a).unwrap();
        assert_eq!(eig.kind, EigenKind::Repeated);
        assert!(eig.degenerate);
        let [v1, v2] = eig.eigenvectors.clone().unwrap();
        assert_eq!(v1.as_slice(), &[1.0, 0.0]);
        assert_eq!(v2.as_slice(), &[0.0, 1.0]);
        assert!(eig.diagonalization().is_some());
    }

    #[test]
    fn symmetric_matrix() {
        let a = Matrix::new([[4.0_f64, 1.0], [1.0, 3.0]]);
        let eig = eigen2x2(&a).unwrap();
        let [v1, v2] = eig.eigenvectors.clone().unwrap();
        assert!(eig.eigenvalues[0] > eig.eigenvalues[1]);
        assert_relative_eq!(v1.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(v2.norm(), 1.0, epsilon = 1e-12);
        assert!(v1.dot(&v2).abs() < 1e-12);
        assert!(residual(&a, eig.eigenvalues[0], &v1) < 1e-12);
        assert!(residual(&a, eig.eigenvalues[1], &v2) < 1e-12);
    }

    #[test]
    fn lower_triangular_uses_transposed_construction() {
        let a = Matrix::new([[1.0, 0.0], [2.0, 3.0]]);
        let eig = eigen2x2(&a).unwrap();
        let [v1, v2] = eig.eigenvectors.clone().unwrap();
        assert_relative_eq!(eig.eigenvalues[0], 3.0);
        assert_eq!(v1.as_slice(), &[0.0, 1.0]);
        assert!(residual(&a, 1.0, &v2) < 1e-12);
    }

    #[test]
    fn diagonal_with_larger_second_entry() {
        let a = Matrix::new([[1.0, 0.0], [0.0, 4.0]]);
        let eig = eigen2x2(&a).unwrap();
        let [v1, v2] = eig.eigenvectors.clone().unwrap();
        assert_eq!(eig.eigenvalues, [4.0, 1.0]);
        assert_eq!(v1.as_slice(), &[0.0, 1.0]);
        assert_eq!(v2.as_slice(), &[1.0, 0.0]);
    }

    #[test]
    fn complex_pair() {
        let a = Matrix::new([[1.0_f64, -2.0], [2.0, 1.0]]);
        let eig = eigen2x2(&a).unwrap();
        assert!(!eig.is_real());
        assert!(eig.eigenvalues[0].is_nan());
        match eig.kind {
            EigenKind::Complex { re, im } => {
                assert_relative_eq!(re, 1.0);
                assert_relative_eq!(im, 2.0);
            }
            other => panic!("expected complex eigenvalues, got {:?}", other),
        }
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(
            eigen2x2(&Matrix::<f64>::zeros(3, 3)).unwrap_err(),
            LinalgError::WrongShape {
                expected: (2, 2),
                got: (3, 3)
            }
        );
        let a = Matrix::new([[f64::INFINITY, 0.0], [0.0, 1.0]]);
        assert_eq!(eigen2x2(&a).unwrap_err(), LinalgError::NonFinite);
    }

    #[test]
    fn power_of_defective_is_direct_only() {
        let a = Matrix::new([[1.0, 1.0], [0.0, 1.0]]);
        let pw = matrix_power2x2(&a, 4).unwrap();
        assert_eq!(pw.direct, Matrix::new([[1.0, 4.0], [0.0, 1.0]]));
        assert!(pw.via_diagonalization.is_none());
    }

    #[test]
    fn power_zero_is_identity() {
        let a = Matrix::new([[3.0, 1.0], [0.0, 2.0]]);
        let pw = matrix_power2x2(&a, 0).unwrap();
        assert_eq!(pw.direct, Matrix::eye(2));
        let diag = pw.via_diagonalization.unwrap();
        assert!(diag.max_abs_diff(&Matrix::eye(2)).unwrap() < 1e-12);
    }

    #[test]
    fn huge_exponent_skips_diagonalized_form() {
        let flip = Matrix::new([[1.0, 0.0], [0.0, -1.0]]);

        let odd = matrix_power2x2(&flip, i32::MAX as u32).unwrap();
        assert_eq!(odd.direct, flip);
        assert_eq!(odd.via_diagonalization.unwrap(), flip);

        // 2^31 does not fit the diagonal exponent
        let even = matrix_power2x2(&flip, 1 << 31).unwrap();
        assert_eq!(even.direct, Matrix::eye(2));
        assert!(even.via_diagonalization.is_none());
    }

    #[test]
    fn rotated_ellipse() {
        // Covariance with principal axes along ±45°
        let cov = Matrix::new([[2.0, 1.0], [1.0, 2.0]]);
        let e = confidence_ellipse(&cov, 1.0).unwrap();
        assert_relative_eq!(e.semi_major, 3.0_f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(e.semi_minor, 1.0, epsilon = 1e-12);
        assert_relative_eq!(e.angle, core::f64::consts::FRAC_PI_4, epsilon = 1e-12);
    }
}
