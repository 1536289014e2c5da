use crate::matrix::Matrix;
use crate::traits::{from_usize, lit, FloatScalar};

/// Full periods across the grid for the stripe patterns.
pub const STRIPE_CYCLES: usize = 4;

const LOW: f64 = 50.0;
const HIGH: f64 = 200.0;

/// Synthetic grayscale images with values in `[0, 255]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TestPattern {
    /// `128 + 100·sin(2π·cycles·x/N)`: energy on the horizontal frequency axis.
    VerticalStripes,
    /// Same along `y`.
    HorizontalStripes,
    /// Same along `x + y`.
    DiagonalStripes,
    /// Alternating `block × block` squares.
    Checkerboard { block: usize },
    /// Dark left half, bright right half.
    SingleEdge,
    /// Bright disk of radius `N/4` at the centre.
    Circle,
}

impl TestPattern {
    /// Render an `n × n` image.
    ///
    /// ```
    /// use microsim_kernels::spectral::TestPattern;
    ///
    /// let img = TestPattern::Checkerboard { block: 4 }.generate::<f64>(8);
    /// assert_eq!(img[(0, 0)], 200.0);
    /// assert_eq!(img[(0, 4)], 50.0);
    /// assert_eq!(img[(4, 4)], 200.0);
    /// ```
    pub fn generate<T: FloatScalar>(&self, n: usize) -> Matrix<T> {
        let nf = from_usize::<T>(n);
        let omega = lit::<T>(2.0) * T::PI() * from_usize::<T>(STRIPE_CYCLES) / nf;
        let wave = |k: usize| lit::<T>(128.0) + lit::<T>(100.0) * (omega * from_usize::<T>(k)).sin();
        let level = |bright: bool| if bright { lit::<T>(HIGH) } else { lit::<T>(LOW) };
        let half = from_usize::<T>(n / 2);
        let radius = nf / lit(4.0);

        let img = Matrix::from_fn(n, n, |row, col| match *self {
            TestPattern::VerticalStripes => wave(col),
            TestPattern::HorizontalStripes => wave(row),
            TestPattern::DiagonalStripes => wave(row + col),
            TestPattern::Checkerboard { block } => {
                let block = block.max(1);
                level((row / block + col / block) % 2 == 0)
            }
            TestPattern::SingleEdge => level(col >= n / 2),
            TestPattern::Circle => {
                let dx = from_usize::<T>(col) - half;
                let dy = from_usize::<T>(row) - half;
                level(dx.hypot(dy) < radius)
            }
        });
        img.map(|&v| v.max(T::zero()).min(lit(255.0)))
    }
}
