//! Linear Kalman filtering.
//!
//! The core is a pair of pure functions, [`predict`] and [`update`], that
//! take a [`KalmanState`] and a [`FilterModel`] and return a new state. The
//! model may change between steps (e.g. a different motion model or noise
//! level). [`KalmanFilter`] threads the state through successive steps for
//! callers that want a single owner.
//!
//! # Tracking a 2-D target
//!
//! ```
//! use microsim_kernels::Vector;
//! use microsim_kernels::estimate::{
//!     measurement_noise, position_observation, white_noise_acceleration, FilterModel,
//!     KalmanFilter, KalmanState, MotionModel,
//! };
//!
//! // State [x, y, vx, vy], observe [x, y]
//! let dt = 1.0_f64;
//! let model = FilterModel::new(
//!     MotionModel::ConstantVelocity.transition(dt),
//!     position_observation(),
//!     white_noise_acceleration(0.5, dt),
//!     measurement_noise(20.0),
//! )
//! .unwrap();
//!
//! let x0 = Vector::from_slice(&[400.0, 250.0, 0.0, 0.0]);
//! let state = KalmanState::with_diagonal_covariance(x0, &[100.0, 100.0, 10.0, 10.0]).unwrap();
//! let mut kf = KalmanFilter::new(state);
//!
//! let report = kf.step(&Vector::from_slice(&[405.0, 248.0]), &model).unwrap();
//! assert_eq!(kf.steps(), 1);
//! assert_eq!(report.innovation.len(), 2);
//! assert!(kf.state().p[(0, 0)] < 100.0);
//! ```
//!
//! # Covariance form
//!
//! The default covariance update is the plain `P = (I − K·H)·P`. The Joseph
//! form `P = (I − K·H)·P·(I − K·H)ᵗ + K·R·Kᵗ` keeps `P` symmetric positive
//! semi-definite under rounding and is selected with [`KalmanSettings`].

mod kalman;
mod models;


pub use kalman::{
    predict, predict_with, update, update_with, CovarianceForm, FilterModel, KalmanFilter,
    KalmanSettings, KalmanState, UpdateReport,
};
pub use models::{
    measurement_noise, position_observation, white_noise_acceleration, MotionModel,
    DEFAULT_VELOCITY_DECAY,
};

/// Errors from state estimation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EstimateError {
    /// A model matrix, state or measurement has the wrong shape.
    #[error("{} has shape {}x{}, expected {}x{}", .what, .got.0, .got.1, .expected.0, .expected.1)]
    DimensionMismatch {
        what: &'static str,
        expected: (usize, usize),
        got: (usize, usize),
    },
    /// State, model or measurement contains NaN or infinity.
    #[error("non-finite value in {}", .what)]
    NonFinite { what: &'static str },
    /// Innovation covariance is singular (cannot compute Kalman gain).
    #[error("innovation covariance is singular")]
    SingularInnovation,
}
