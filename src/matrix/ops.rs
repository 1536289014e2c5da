use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::traits::Scalar;

use super::{Matrix, MatrixError, Vector};

// ── Checked arithmetic ──────────────────────────────────────────────
//
// The operator impls below panic on a shape mismatch; these return the
// mismatch instead so callers can surface it.

impl<T: Scalar> Matrix<T> {
    fn zip_with(&self, rhs: &Self, f: impl Fn(T, T) -> T) -> Self {
        let data = self
            .data
            .iter()
            .zip(rhs.data.iter())
            .map(|(&a, &b)| f(a, b))
            .collect();
        Matrix {
            data,
            nrows: self.nrows,
            ncols: self.ncols,
        }
    }

    fn same_shape(&self, rhs: &Self, op: &'static str) -> Result<(), MatrixError> {
        if self.shape() == rhs.shape() {
            Ok(())
        } else {
            Err(MatrixError::DimensionMismatch {
                op,
                lhs: self.shape(),
                rhs: rhs.shape(),
            })
        }
    }

    /// Element-wise sum, or `DimensionMismatch`.
    pub fn checked_add(&self, rhs: &Self) -> Result<Self, MatrixError> {
        self.same_shape(rhs, "+")?;
        Ok(self.zip_with(rhs, |a, b| a + b))
    }

    /// Element-wise difference, or `DimensionMismatch`.
    pub fn checked_sub(&self, rhs: &Self) -> Result<Self, MatrixError> {
        self.same_shape(rhs, "-")?;
        Ok(self.zip_with(rhs, |a, b| a - b))
    }

    /// Matrix product `(M×N)·(N×P)`, or `DimensionMismatch`.
    ///
    /// ```
    /// use microsim_kernels::Matrix;
    /// let a = Matrix::new([[1.0, 2.0], [3.0, 4.0]]);
    /// let b = Matrix::new([[5.0, 6.0], [7.0, 8.0]]);
    /// let c = a.checked_mul(&b).unwrap();
    /// assert_eq!(c, Matrix::new([[19.0, 22.0], [43.0, 50.0]]));
    /// assert!(a.checked_mul(&Matrix::zeros(3, 1)).is_err());
    /// ```
    pub fn checked_mul(&self, rhs: &Self) -> Result<Self, MatrixError> {
        if self.ncols != rhs.nrows {
            return Err(MatrixError::DimensionMismatch {
                op: "*",
                lhs: self.shape(),
                rhs: rhs.shape(),
            });
        }
        let m = self.nrows;
        let n = self.ncols;
        let p = rhs.ncols;
        let mut data = vec![T::zero(); m * p];
        for i in 0..m {
            for k in 0..n {
                let a_ik = self.data[i * n + k];
                for j in 0..p {
                    data[i * p + j] = data[i * p + j] + a_ik * rhs.data[k * p + j];
                }
            }
        }
        Ok(Matrix {
            data,
            nrows: m,
            ncols: p,
        })
    }

    /// Matrix-vector product treating `v` as a column, or `DimensionMismatch`.
    ///
    /// ```
    /// use microsim_kernels::{Matrix, Vector};
    /// let a = Matrix::new([[1.0, 2.0], [3.0, 4.0]]);
    /// let v = Vector::from_slice(&[1.0, 1.0]);
    /// assert_eq!(a.mul_vector(&v).unwrap().as_slice(), &[3.0, 7.0]);
    /// ```
    pub fn mul_vector(&self, v: &Vector<T>) -> Result<Vector<T>, MatrixError> {
        if self.ncols != v.len() {
            return Err(MatrixError::DimensionMismatch {
                op: "*",
                lhs: self.shape(),
                rhs: (v.len(), 1),
            });
        }
        let out = (0..self.nrows)
            .map(|i| {
                self.row(i)
                    .iter()
                    .zip(v.iter())
                    .fold(T::zero(), |acc, (&a, &b)| acc + a * b)
            })
            .collect();
        Ok(Vector::from_vec(out))
    }
}

fn expect_ok<T>(r: Result<T, MatrixError>) -> T {
    match r {
        Ok(v) => v,
        Err(e) => panic!("{}", e),
    }
}

// ── Element-wise addition ───────────────────────────────────────────

impl<T: Scalar> Add<&Matrix<T>> for &Matrix<T> {
    type Output = Matrix<T>;

    fn add(self, rhs: &Matrix<T>) -> Matrix<T> {
        expect_ok(self.checked_add(rhs))
    }
}

impl<T: Scalar> Add for Matrix<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        &self + &rhs
    }
}

impl<T: Scalar> Add<&Matrix<T>> for Matrix<T> {
    type Output = Matrix<T>;

    fn add(self, rhs: &Matrix<T>) -> Matrix<T> {
        &self + rhs
    }
}

impl<T: Scalar> AddAssign<&Matrix<T>> for Matrix<T> {
    fn add_assign(&mut self, rhs: &Matrix<T>) {
        expect_ok(self.same_shape(rhs, "+="));
        for (a, &b) in self.data.iter_mut().zip(rhs.data.iter()) {
            *a = *a + b;
        }
    }
}

// ── Element-wise subtraction ────────────────────────────────────────

impl<T: Scalar> Sub<&Matrix<T>> for &Matrix<T> {
    type Output = Matrix<T>;

    fn sub(self, rhs: &Matrix<T>) -> Matrix<T> {
        expect_ok(self.checked_sub(rhs))
    }
}

impl<T: Scalar> Sub for Matrix<T> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        &self - &rhs
    }
}

impl<T: Scalar> Sub<&Matrix<T>> for Matrix<T> {
    type Output = Matrix<T>;

    fn sub(self, rhs: &Matrix<T>) -> Matrix<T> {
        &self - rhs
    }
}

impl<T: Scalar> SubAssign<&Matrix<T>> for Matrix<T> {
    fn sub_assign(&mut self, rhs: &Matrix<T>) {
        expect_ok(self.same_shape(rhs, "-="));
        for (a, &b) in self.data.iter_mut().zip(rhs.data.iter()) {
            *a = *a - b;
        }
    }
}

// ── Negation ────────────────────────────────────────────────────────

impl<T: Scalar> Neg for &Matrix<T> {
    type Output = Matrix<T>;

    fn neg(self) -> Matrix<T> {
        self.map(|&x| T::zero() - x)
    }
}

impl<T: Scalar> Neg for Matrix<T> {
    type Output = Self;

    fn neg(self) -> Self {
        -&self
    }
}

// ── Matrix multiplication: (M×N) * (N×P) → (M×P) ──────────────────

impl<T: Scalar> Mul<&Matrix<T>> for &Matrix<T> {
    type Output = Matrix<T>;

    fn mul(self, rhs: &Matrix<T>) -> Matrix<T> {
        expect_ok(self.checked_mul(rhs))
    }
}

impl<T: Scalar> Mul for Matrix<T> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        &self * &rhs
    }
}

impl<T: Scalar> Mul<&Matrix<T>> for Matrix<T> {
    type Output = Matrix<T>;

    fn mul(self, rhs: &Matrix<T>) -> Matrix<T> {
        &self * rhs
    }
}

impl<T: Scalar> Mul<Matrix<T>> for &Matrix<T> {
    type Output = Matrix<T>;

    fn mul(self, rhs: Matrix<T>) -> Matrix<T> {
        self * &rhs
    }
}

impl<T: Scalar> Mul<&Vector<T>> for &Matrix<T> {
    type Output = Vector<T>;

    fn mul(self, rhs: &Vector<T>) -> Vector<T> {
        expect_ok(self.mul_vector(rhs))
    }
}

// ── Scalar multiplication: matrix * scalar ──────────────────────────

impl<T: Scalar> Mul<T> for &Matrix<T> {
    type Output = Matrix<T>;

    fn mul(self, rhs: T) -> Matrix<T> {
        self.map(|&x| x * rhs)
    }
}

impl<T: Scalar> Mul<T> for Matrix<T> {
    type Output = Self;

    fn mul(self, rhs: T) -> Self {
        &self * rhs
    }
}

impl<T: Scalar> MulAssign<T> for Matrix<T> {
    fn mul_assign(&mut self, rhs: T) {
        for x in self.data.iter_mut() {
            *x = *x * rhs;
        }
    }
}
