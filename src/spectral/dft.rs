use crate::matrix::Matrix;
use crate::traits::{from_usize, FloatScalar};

use super::SpectralError;

/// Frequency-shifted spectrum of an `N × N` image.
///
/// Entry `(v, u)` holds the coefficient of frequency
/// `((v + N − N/2) mod N, (u + N − N/2) mod N)`, so DC is at `(N/2, N/2)`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DftResult<T> {
    pub real: Matrix<T>,
    pub imag: Matrix<T>,
    /// `√(real² + imag²)`.
    pub magnitude: Matrix<T>,
    /// `atan2(imag, real)`.
    pub phase: Matrix<T>,
}

impl<T: FloatScalar> DftResult<T> {
    /// Grid size `N`.
    pub fn size(&self) -> usize {
        self.real.nrows()
    }

    /// `ln(1 + |F|) / ln(1 + max |F|)`, in `[0, 1]`.
    ///
    /// An all-zero spectrum maps to all zeros.
    pub fn log_magnitude(&self) -> Matrix<T> {
        let denom = self.magnitude.max_abs().ln_1p();
        if denom <= T::zero() {
            return Matrix::zeros(self.magnitude.nrows(), self.magnitude.ncols());
        }
        self.magnitude.map(|&m| m.ln_1p() / denom)
    }
}

/// Shifted position of raw frequency index `k`.
#[inline]
pub(crate) fn shift(k: usize, n: usize) -> usize {
    (k + n / 2) % n
}

/// Raw frequency index of shifted position `k`.
#[inline]
pub(crate) fn unshift(k: usize, n: usize) -> usize {
    (k + n - n / 2) % n
}

/// `cos(2πk/N)` and `sin(2πk/N)` for `k` in `0..N`.
fn twiddles<T: FloatScalar>(n: usize) -> (Vec<T>, Vec<T>) {
    let step = (T::PI() + T::PI()) / from_usize::<T>(n);
    (0..n)
        .map(|k| (step * from_usize::<T>(k)).sin_cos())
        .map(|(s, c)| (c, s))
        .unzip()
}

fn check_grid<T: FloatScalar>(m: &Matrix<T>) -> Result<usize, SpectralError> {
    if !m.is_square() {
        return Err(SpectralError::NotSquare { shape: m.shape() });
    }
    if m.is_empty() {
        return Err(SpectralError::Empty);
    }
    if !m.is_finite() {
        return Err(SpectralError::NonFinite);
    }
    Ok(m.nrows())
}

/// Validate a real/imaginary pair as one square spectrum; returns `N`.
pub(crate) fn check_spectrum<T: FloatScalar>(
    real: &Matrix<T>,
    imag: &Matrix<T>,
) -> Result<usize, SpectralError> {
    if real.shape() != imag.shape() {
        return Err(SpectralError::ShapeMismatch {
            real: real.shape(),
            imag: imag.shape(),
        });
    }
    let n = check_grid(real)?;
    check_grid(imag)?;
    Ok(n)
}

/// Forward 2-D DFT, `F(u, v) = Σ_{x,y} image[y][x]·e^{−2πi(ux + vy)/N}`,
/// stored frequency-shifted.
///
/// # Errors
///
/// [`SpectralError::NotSquare`], [`SpectralError::Empty`] or
/// [`SpectralError::NonFinite`].
///
/// ```
/// use microsim_kernels::Matrix;
/// use microsim_kernels::spectral::dft2d;
///
/// let flat = Matrix::fill(4, 4, 2.0_f64);
/// let f = dft2d(&flat).unwrap();
/// // All energy in the DC term at the centre
/// assert!((f.real[(2, 2)] - 32.0).abs() < 1e-12);
/// assert!(f.magnitude[(0, 0)].abs() < 1e-12);
/// ```
pub fn dft2d<T: FloatScalar>(image: &Matrix<T>) -> Result<DftResult<T>, SpectralError> {
    let n = check_grid(image)?;
    let (cos, sin) = twiddles::<T>(n);

    let mut real = Matrix::zeros(n, n);
    let mut imag = Matrix::zeros(n, n);
    for v in 0..n {
        for u in 0..n {
            let mut re = T::zero();
            let mut im = T::zero();
            for y in 0..n {
                for x in 0..n {
                    // e^{-iθ} with θ = 2π(ux + vy)/N, reduced mod N
                    let k = (u * x + v * y) % n;
                    let p = image[(y, x)];
                    re = re + p * cos[k];
                    im = im - p * sin[k];
                }
            }
            let (sv, su) = (shift(v, n), shift(u, n));
            real[(sv, su)] = re;
            imag[(sv, su)] = im;
        }
    }

    let magnitude = Matrix::from_fn(n, n, |i, j| real[(i, j)].hypot(imag[(i, j)]));
    let phase = Matrix::from_fn(n, n, |i, j| imag[(i, j)].atan2(real[(i, j)]));
    log::trace!("dft2d: {}x{} transform", n, n);
    Ok(DftResult {
        real,
        imag,
        magnitude,
        phase,
    })
}

/// Inverse 2-D DFT of a frequency-shifted spectrum, keeping the real part:
/// `image[y][x] = Σ_{u,v} (real·cos θ − imag·sin θ) / N²` with
/// `θ = 2π(ux + vy)/N` at the un-shifted frequency.
///
/// # Errors
///
/// [`SpectralError::ShapeMismatch`] when the parts differ in shape, plus the
/// same grid checks as [`dft2d`].
pub fn idft2d<T: FloatScalar>(real: &Matrix<T>, imag: &Matrix<T>) -> Result<Matrix<T>, SpectralError> {
    let n = check_spectrum(real, imag)?;
    let (cos, sin) = twiddles::<T>(n);
    let scale = T::one() / from_usize::<T>(n * n);

    let mut image = Matrix::zeros(n, n);
    for y in 0..n {
        for x in 0..n {
            let mut acc = T::zero();
            for v in 0..n {
                let fv = unshift(v, n);
                for u in 0..n {
                    let fu = unshift(u, n);
                    let k = (fu * x + fv * y) % n;
                    acc = acc + real[(v, u)] * cos[k] - imag[(v, u)] * sin[k];
                }
            }
            image[(y, x)] = acc * scale;
        }
    }
    Ok(image)
}
