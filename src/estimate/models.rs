//! Standard models for a 2-D tracker with state `[x, y, vx, vy]` observing
//! position only.

use crate::matrix::Matrix;
use crate::traits::{lit, FloatScalar};

/// Per-step velocity retention of [`MotionModel::damped`].
pub const DEFAULT_VELOCITY_DECAY: f64 = 0.98;

/// Motion model of a 4-state planar tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MotionModel<T> {
    /// Position integrates a constant velocity.
    ConstantVelocity,
    /// Position integrates a velocity that shrinks by `decay` each step.
    DampedVelocity { decay: T },
    /// Position holds; velocity is forgotten.
    RandomWalk,
}

impl<T: FloatScalar> MotionModel<T> {
    /// Damped velocity with [`DEFAULT_VELOCITY_DECAY`].
    pub fn damped() -> Self {
        MotionModel::DampedVelocity {
            decay: lit(DEFAULT_VELOCITY_DECAY),
        }
    }

    /// 4×4 state transition `F` for time step `dt`.
    ///
    /// ```
    /// use microsim_kernels::Matrix;
    /// use microsim_kernels::estimate::MotionModel;
    ///
    /// let f = MotionModel::ConstantVelocity.transition(0.5_f64);
    /// assert_eq!(f, Matrix::new([
    ///     [1.0, 0.0, 0.5, 0.0],
    ///     [0.0, 1.0, 0.0, 0.5],
    ///     [0.0, 0.0, 1.0, 0.0],
    ///     [0.0, 0.0, 0.0, 1.0],
    /// ]));
    /// ```
    pub fn transition(&self, dt: T) -> Matrix<T> {
        let (o, z) = (T::one(), T::zero());
        let (step, keep) = match *self {
            MotionModel::ConstantVelocity => (dt, o),
            MotionModel::DampedVelocity { decay } => (dt, decay),
            MotionModel::RandomWalk => (z, z),
        };
        Matrix::new([
            [o, z, step, z],
            [z, o, z, step],
            [z, z, keep, z],
            [z, z, z, keep],
        ])
    }
}

/// Process noise of a white-noise acceleration with spectral density `q`.
///
/// Per axis the position/velocity block is
/// `q·[[dt³/3, dt²/2], [dt²/2, dt]]`.
pub fn white_noise_acceleration<T: FloatScalar>(q: T, dt: T) -> Matrix<T> {
    let dt2 = dt * dt;
    let pp = q * dt2 * dt / lit(3.0);
    let pv = q * dt2 / lit(2.0);
    let vv = q * dt;
    let z = T::zero();
    Matrix::new([
        [pp, z, pv, z],
        [z, pp, z, pv],
        [pv, z, vv, z],
        [z, pv, z, vv],
    ])
}

/// Measurement noise `r²·I₂` for a position sensor with standard deviation `r`.
pub fn measurement_noise<T: FloatScalar>(r: T) -> Matrix<T> {
    Matrix::from_diagonal(&[r * r, r * r])
}

/// `H = [[1, 0, 0, 0], [0, 1, 0, 0]]`.
pub fn position_observation<T: FloatScalar>() -> Matrix<T> {
    let (o, z) = (T::one(), T::zero());
    Matrix::new([[o, z, z, z], [z, o, z, z]])
}
