//! 2-D discrete Fourier transform with frequency-domain masking.
//!
//! Transforms are direct `O(N⁴)` summations over square `N × N` images and
//! are intended for small grids (`N ≤ 32` or so). Spectra are stored
//! frequency-shifted: the DC coefficient sits at `(N/2, N/2)`.
//!
//! ```
//! use microsim_kernels::spectral::{dft2d, filter_image, idft2d, FrequencyMask, TestPattern};
//!
//! let image = TestPattern::Checkerboard { block: 2 }.generate::<f64>(8);
//! let spectrum = dft2d(&image).unwrap();
//! let back = idft2d(&spectrum.real, &spectrum.imag).unwrap();
//! assert!(back.max_abs_diff(&image).unwrap() < 1e-9);
//!
//! // Keep only the DC term: every pixel becomes the mean
//! let blurred = filter_image(&image, FrequencyMask::LowPass, 0.5).unwrap();
//! let mean = image.as_slice().iter().sum::<f64>() / 64.0;
//! assert!((blurred.image[(3, 5)] - mean).abs() < 1e-9);
//! ```

mod dft;
mod mask;
mod patterns;

pub use dft::{dft2d, idft2d, DftResult};
pub use mask::{filter_image, mask_frequencies, FilteredImage, FrequencyMask, BAND_WIDTH};
pub use patterns::{TestPattern, STRIPE_CYCLES};

/// Errors from the spectral kernels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SpectralError {
    /// Transforms operate on square grids only.
    #[error("image must be square, got {}x{}", .shape.0, .shape.1)]
    NotSquare { shape: (usize, usize) },
    /// Zero-sized grid.
    #[error("image is empty")]
    Empty,
    /// Input contains NaN or infinity.
    #[error("input contains non-finite values")]
    NonFinite,
    /// Real and imaginary parts differ in shape.
    #[error("real part is {}x{} but imaginary part is {}x{}", .real.0, .real.1, .imag.0, .imag.1)]
    ShapeMismatch {
        real: (usize, usize),
        imag: (usize, usize),
    },
}
