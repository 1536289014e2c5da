use core::ops::{Add, Index, IndexMut, Mul, Neg, Sub};

use crate::traits::{FloatScalar, Scalar};

use super::Matrix;

/// Dynamically-sized vector of scalars.
///
/// Whether it acts as a row or column vector is decided by the operation
/// it takes part in: `Matrix::mul_vector` treats it as a column.
///
/// # Examples
///
/// ```
/// use microsim_kernels::Vector;
///
/// let v = Vector::from_slice(&[1.0_f64, 2.0, 3.0]);
/// assert_eq!(v[0], 1.0);
/// assert_eq!(v.len(), 3);
/// assert!((v.dot(&v) - 14.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Vector<T> {
    data: Vec<T>,
}

impl<T: Scalar> Vector<T> {
    /// Create a vector from a flat slice.
    pub fn from_slice(data: &[T]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }

    /// Create a vector from an owned `Vec`.
    ///
    /// ```
    /// use microsim_kernels::Vector;
    /// let v = Vector::from_vec(vec![1.0, 2.0, 3.0]);
    /// assert_eq!(v[2], 3.0);
    /// ```
    pub fn from_vec(data: Vec<T>) -> Self {
        Self { data }
    }

    /// Create a zero vector of length `n`.
    pub fn zeros(n: usize) -> Self {
        Self {
            data: vec![T::zero(); n],
        }
    }

    /// Standard basis vector `e_i` of length `n`.
    pub fn unit(n: usize, i: usize) -> Self {
        let mut v = Self::zeros(n);
        v[i] = T::one();
        v
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the vector has no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// View as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Iterator over the elements.
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Dot product. Panics on length mismatch.
    pub fn dot(&self, rhs: &Self) -> T {
        assert_eq!(
            self.len(),
            rhs.len(),
            "dimension mismatch: dot of length {} and {}",
            self.len(),
            rhs.len(),
        );
        self.data
            .iter()
            .zip(rhs.data.iter())
            .fold(T::zero(), |acc, (&a, &b)| acc + a * b)
    }

    /// `n x 1` column matrix.
    pub fn to_column(&self) -> Matrix<T> {
        Matrix::from_rows(self.len(), 1, &self.data)
    }
}

impl<T: FloatScalar> Vector<T> {
    /// Euclidean norm.
    pub fn norm(&self) -> T {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction, or `None` when the norm is zero
    /// or not finite.
    ///
    /// ```
    /// use microsim_kernels::Vector;
    /// let v = Vector::from_slice(&[3.0_f64, 4.0]).normalize().unwrap();
    /// assert!((v[0] - 0.6).abs() < 1e-12);
    /// assert!(Vector::<f64>::zeros(2).normalize().is_none());
    /// ```
    pub fn normalize(&self) -> Option<Self> {
        let n = self.norm();
        if n > T::zero() && n.is_finite() {
            Some(self * (T::one() / n))
        } else {
            None
        }
    }

    /// Whether every element is finite.
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|x| x.is_finite())
    }

    /// Largest absolute element (`0` when empty).
    pub fn max_abs(&self) -> T {
        self.data
            .iter()
            .fold(T::zero(), |acc, &x| if x.abs() > acc { x.abs() } else { acc })
    }

    /// 2-D cross product `a.x * b.y - a.y * b.x`.
    ///
    /// Panics unless both vectors have length 2.
    pub fn cross2(&self, rhs: &Self) -> T {
        assert!(self.len() == 2 && rhs.len() == 2, "cross2 requires 2-vectors");
        self[0] * rhs[1] - self[1] * rhs[0]
    }

    /// Counter-clockwise perpendicular `[-y, x]` of a 2-vector.
    pub fn perp2(&self) -> Self {
        assert_eq!(self.len(), 2, "perp2 requires a 2-vector");
        Self::from_vec(vec![-self[1], self[0]])
    }
}

impl<T> Index<usize> for Vector<T> {
    type Output = T;

    #[inline]
    fn index(&self, i: usize) -> &T {
        &self.data[i]
    }
}

impl<T> IndexMut<usize> for Vector<T> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.data[i]
    }
}

impl<T: Scalar> Add<&Vector<T>> for &Vector<T> {
    type Output = Vector<T>;

    fn add(self, rhs: &Vector<T>) -> Vector<T> {
        assert_eq!(
            self.len(),
            rhs.len(),
            "dimension mismatch: {} + {}",
            self.len(),
            rhs.len(),
        );
        Vector::from_vec(
            self.data
                .iter()
                .zip(rhs.data.iter())
                .map(|(&a, &b)| a + b)
                .collect(),
        )
    }
}

impl<T: Scalar> Sub<&Vector<T>> for &Vector<T> {
    type Output = Vector<T>;

    fn sub(self, rhs: &Vector<T>) -> Vector<T> {
        assert_eq!(
            self.len(),
            rhs.len(),
            "dimension mismatch: {} - {}",
            self.len(),
            rhs.len(),
        );
        Vector::from_vec(
            self.data
                .iter()
                .zip(rhs.data.iter())
                .map(|(&a, &b)| a - b)
                .collect(),
        )
    }
}

impl<T: Scalar> Mul<T> for &Vector<T> {
    type Output = Vector<T>;

    fn mul(self, rhs: T) -> Vector<T> {
        Vector::from_vec(self.data.iter().map(|&x| x * rhs).collect())
    }
}

impl<T: Scalar> Neg for &Vector<T> {
    type Output = Vector<T>;

    fn neg(self) -> Vector<T> {
        Vector::from_vec(self.data.iter().map(|&x| T::zero() - x).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic() {
        let a = Vector::from_slice(&[1.0, 2.0]);
        let b = Vector::from_slice(&[3.0, 5.0]);
        assert_eq!((&a + &b).as_slice(), &[4.0, 7.0]);
        assert_eq!((&b - &a).as_slice(), &[2.0, 3.0]);
        assert_eq!((&a * 2.0).as_slice(), &[2.0, 4.0]);
        assert_eq!((-&a).as_slice(), &[-1.0, -2.0]);
    }

    #[test]
    #[should_panic(expected = "dimension mismatch")]
    fn add_length_mismatch() {
        let a = Vector::from_slice(&[1.0, 2.0]);
        let b = Vector::from_slice(&[1.0, 2.0, 3.0]);
        let _ = &a + &b;
    }

    #[test]
    fn cross_and_perp() {
        let x = Vector::from_slice(&[1.0, 0.0]);
        let y = x.perp2();
        assert_eq!(y.as_slice(), &[0.0, 1.0]);
        assert_eq!(x.cross2(&y), 1.0);
        assert_eq!(x.dot(&y), 0.0);
    }

    #[test]
    fn column_roundtrip() {
        let v = Vector::from_slice(&[1.0, 2.0, 3.0]);
        let c = v.to_column();
        assert_eq!(c.shape(), (3, 1));
        assert_eq!(c.column(0), v);
    }

    #[test]
    fn unit_vectors() {
        let e = Vector::<f64>::unit(3, 1);
        assert_eq!(e.as_slice(), &[0.0, 1.0, 0.0]);
        assert_eq!(e.norm(), 1.0);
    }

    #[test]
    fn normalize_rejects_nan() {
        let v = Vector::from_slice(&[f64::NAN, 1.0]);
        assert!(v.normalize().is_none());
        assert!(!v.is_finite());
    }
}
