use crate::linalg::LinalgError;
use crate::traits::{from_usize, lit, FloatScalar};

use super::Matrix;

/// Relative threshold (in units of machine epsilon) below which a
/// determinant or pivot counts as zero when inverting.
const SINGULAR_ULPS: f64 = 4.0;

impl<T: FloatScalar> Matrix<T> {
    /// Sum of the diagonal.
    ///
    /// ```
    /// use microsim_kernels::Matrix;
    /// let a = Matrix::new([[1.0, 2.0], [3.0, 4.0]]);
    /// assert_eq!(a.trace(), 5.0);
    /// ```
    pub fn trace(&self) -> T {
        let n = self.nrows.min(self.ncols);
        (0..n).fold(T::zero(), |acc, i| acc + self[(i, i)])
    }

    fn require_square(&self) -> Result<usize, LinalgError> {
        if self.is_square() {
            Ok(self.nrows)
        } else {
            Err(LinalgError::NotSquare {
                shape: self.shape(),
            })
        }
    }

    fn require_shape(&self, expected: (usize, usize)) -> Result<(), LinalgError> {
        if self.shape() == expected {
            Ok(())
        } else {
            Err(LinalgError::WrongShape {
                expected,
                got: self.shape(),
            })
        }
    }

    /// Determinant of a 2×2 matrix, `ad − bc`.
    pub fn det2x2(&self) -> Result<T, LinalgError> {
        self.require_shape((2, 2))?;
        Ok(self[(0, 0)] * self[(1, 1)] - self[(0, 1)] * self[(1, 0)])
    }

    /// Closed-form 2×2 inverse `1/det · [[d, −b], [−c, a]]`.
    ///
    /// A determinant that is not finite, or that is zero relative to the
    /// size of its two products, is reported as [`LinalgError::Singular`]
    /// instead of dividing.
    ///
    /// ```
    /// use microsim_kernels::Matrix;
    /// use microsim_kernels::linalg::LinalgError;
    ///
    /// let a = Matrix::new([[4.0_f64, 7.0], [2.0, 6.0]]);
    /// let inv = a.inverse2x2().unwrap();
    /// assert!((inv[(0, 0)] - 0.6).abs() < 1e-12);
    ///
    /// let singular = Matrix::new([[1.0_f64, 2.0], [2.0, 4.0]]);
    /// assert_eq!(singular.inverse2x2().unwrap_err(), LinalgError::Singular);
    /// ```
    pub fn inverse2x2(&self) -> Result<Self, LinalgError> {
        self.require_shape((2, 2))?;
        let (a, b) = (self[(0, 0)], self[(0, 1)]);
        let (c, d) = (self[(1, 0)], self[(1, 1)]);
        let ad = a * d;
        let bc = b * c;
        let det = ad - bc;
        let scale = ad.abs() + bc.abs();
        if !det.is_finite() || det.abs() <= lit::<T>(SINGULAR_ULPS) * T::epsilon() * scale {
            log::debug!("2x2 inverse: singular (det = {:?})", det);
            return Err(LinalgError::Singular);
        }
        let inv_det = T::one() / det;
        Ok(Matrix::new([
            [d * inv_det, -b * inv_det],
            [-c * inv_det, a * inv_det],
        ]))
    }

    /// Matrix inverse.
    ///
    /// 1×1 and 2×2 use the closed form; larger matrices use Gauss–Jordan
    /// elimination with partial pivoting on `[A | I]`. A pivot that is zero
    /// relative to the largest entry of `A` is reported as
    /// [`LinalgError::Singular`].
    ///
    /// ```
    /// use microsim_kernels::Matrix;
    /// let a = Matrix::new([
    ///     [2.0_f64, 1.0, -1.0],
    ///     [-3.0, -1.0, 2.0],
    ///     [-2.0, 1.0, 2.0],
    /// ]);
    /// let inv = a.inverse().unwrap();
    /// let id = &a * &inv;
    /// assert!(id.max_abs_diff(&Matrix::eye(3)).unwrap() < 1e-12);
    /// ```
    pub fn inverse(&self) -> Result<Self, LinalgError> {
        let n = self.require_square()?;
        if !self.is_finite() {
            return Err(LinalgError::NonFinite);
        }
        match n {
            0 => Ok(Matrix::zeros(0, 0)),
            1 => {
                let a = self[(0, 0)];
                if a == T::zero() {
                    Err(LinalgError::Singular)
                } else {
                    Ok(Matrix::new([[T::one() / a]]))
                }
            }
            2 => self.inverse2x2(),
            _ => self.inverse_gauss_jordan(n),
        }
    }

    fn inverse_gauss_jordan(&self, n: usize) -> Result<Self, LinalgError> {
        let threshold = lit::<T>(SINGULAR_ULPS) * T::epsilon() * from_usize::<T>(n) * self.max_abs();
        let mut a = self.clone();
        let mut inv = Matrix::eye(n);

        for col in 0..n {
            // Partial pivoting: find row with largest magnitude in this column
            let mut max_row = col;
            let mut max_val = a[(col, col)].abs();
            for row in (col + 1)..n {
                let val = a[(row, col)].abs();
                if val > max_val {
                    max_val = val;
                    max_row = row;
                }
            }

            if max_val <= threshold {
                log::debug!("inverse: singular at column {} (pivot {:?})", col, max_val);
                return Err(LinalgError::Singular);
            }

            a.swap_rows(col, max_row);
            inv.swap_rows(col, max_row);

            let inv_pivot = T::one() / a[(col, col)];
            for j in 0..n {
                a[(col, j)] = a[(col, j)] * inv_pivot;
                inv[(col, j)] = inv[(col, j)] * inv_pivot;
            }

            for row in 0..n {
                if row == col {
                    continue;
                }
                let factor = a[(row, col)];
                if factor == T::zero() {
                    continue;
                }
                for j in 0..n {
                    a[(row, j)] = a[(row, j)] - factor * a[(col, j)];
                    inv[(row, j)] = inv[(row, j)] - factor * inv[(col, j)];
                }
            }
        }

        Ok(inv)
    }

    /// `A^k` by repeated squaring, starting from the identity.
    ///
    /// ```
    /// use microsim_kernels::Matrix;
    /// let a = Matrix::new([[1.0, 1.0], [0.0, 1.0]]);
    /// assert_eq!(a.pow(3).unwrap(), Matrix::new([[1.0, 3.0], [0.0, 1.0]]));
    /// assert_eq!(a.pow(0).unwrap(), Matrix::eye(2));
    /// ```
    pub fn pow(&self, k: u32) -> Result<Self, LinalgError> {
        let n = self.require_square()?;
        let mut result = Matrix::eye(n);
        let mut base = self.clone();
        let mut k = k;
        while k > 0 {
            if k & 1 == 1 {
                result = &result * &base;
            }
            base = &base * &base;
            k >>= 1;
        }
        Ok(result)
    }
}
