use crate::matrix::Matrix;
use crate::traits::{from_usize, lit, FloatScalar};

use super::dft::{check_spectrum, dft2d, idft2d, DftResult};
use super::SpectralError;

/// Radial width of the [`FrequencyMask::BandPass`] annulus.
pub const BAND_WIDTH: f64 = 3.0;

/// Disk-shaped frequency selection around the DC term.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FrequencyMask {
    /// Keep every coefficient.
    #[default]
    None,
    /// Keep `dist ≤ cutoff`.
    LowPass,
    /// Keep `dist ≥ cutoff`.
    HighPass,
    /// Keep `max(1, cutoff − BAND_WIDTH) ≤ dist ≤ cutoff`. The inner
    /// radius never drops below 1, so the DC term is always removed.
    BandPass,
}

impl FrequencyMask {
    /// Whether a coefficient at distance `dist` from the centre survives.
    pub fn passes<T: FloatScalar>(&self, dist: T, cutoff: T) -> bool {
        match self {
            FrequencyMask::None => true,
            FrequencyMask::LowPass => dist <= cutoff,
            FrequencyMask::HighPass => dist >= cutoff,
            FrequencyMask::BandPass => {
                let inner = (cutoff - lit::<T>(BAND_WIDTH)).max(T::one());
                dist >= inner && dist <= cutoff
            }
        }
    }
}

/// Zero the coefficients of a shifted spectrum that `mask` rejects.
///
/// Distance is measured from the grid centre `(N/2, N/2)`. Returns the masked
/// real and imaginary parts.
///
/// # Errors
///
/// [`SpectralError::NonFinite`] for a NaN/∞ cutoff or spectrum,
/// [`SpectralError::ShapeMismatch`], [`SpectralError::NotSquare`] or
/// [`SpectralError::Empty`] when the real and imaginary parts are not one
/// square grid.
pub fn mask_frequencies<T: FloatScalar>(
    spectrum: &DftResult<T>,
    mask: FrequencyMask,
    cutoff: T,
) -> Result<(Matrix<T>, Matrix<T>), SpectralError> {
    if !cutoff.is_finite() {
        return Err(SpectralError::NonFinite);
    }
    let n = check_spectrum(&spectrum.real, &spectrum.imag)?;
    let c = from_usize::<T>(n / 2);
    let keep = Matrix::from_fn(n, n, |v, u| {
        let du = from_usize::<T>(u) - c;
        let dv = from_usize::<T>(v) - c;
        mask.passes(du.hypot(dv), cutoff)
    });
    let apply = |m: &Matrix<T>| {
        Matrix::from_fn(n, n, |v, u| if keep[(v, u)] { m[(v, u)] } else { T::zero() })
    };
    Ok((apply(&spectrum.real), apply(&spectrum.imag)))
}

/// Output of [`filter_image`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FilteredImage<T> {
    /// Unmasked spectrum of the input.
    pub spectrum: DftResult<T>,
    pub real_masked: Matrix<T>,
    pub imag_masked: Matrix<T>,
    /// Spatial image rebuilt from the masked spectrum.
    pub image: Matrix<T>,
}

/// DFT, mask, inverse DFT.
///
/// ```
/// use microsim_kernels::spectral::{filter_image, FrequencyMask, TestPattern};
///
/// let img = TestPattern::SingleEdge.generate::<f64>(8);
/// let out = filter_image(&img, FrequencyMask::None, 0.0).unwrap();
/// assert!(out.image.max_abs_diff(&img).unwrap() < 1e-9);
/// ```
pub fn filter_image<T: FloatScalar>(
    image: &Matrix<T>,
    mask: FrequencyMask,
    cutoff: T,
) -> Result<FilteredImage<T>, SpectralError> {
    let spectrum = dft2d(image)?;
    let (real_masked, imag_masked) = mask_frequencies(&spectrum, mask, cutoff)?;
    let image = idft2d(&real_masked, &imag_masked)?;
    log::debug!("filter_image: {:?} mask, cutoff {:?}", mask, cutoff);
    Ok(FilteredImage {
        spectrum,
        real_masked,
        imag_masked,
        image,
    })
}
