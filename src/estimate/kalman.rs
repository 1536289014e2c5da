use crate::linalg::LinalgError;
use crate::matrix::{Matrix, Vector};
use crate::traits::FloatScalar;

use super::EstimateError;

/// Covariance update applied after the Kalman gain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CovarianceForm {
    /// `P = (I − K·H)·P`.
    #[default]
    Simple,
    /// `P = (I − K·H)·P·(I − K·H)ᵗ + K·R·Kᵗ`.
    Joseph,
}

/// Settings for [`predict_with`] and [`update_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KalmanSettings {
    pub covariance_form: CovarianceForm,
    /// Replace `P` by `(P + Pᵗ)/2` after every step.
    pub symmetrize: bool,
}

/// Mean and covariance of the state estimate.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct KalmanState<T> {
    /// State estimate.
    pub x: Vector<T>,
    /// State covariance.
    pub p: Matrix<T>,
}

impl<T: FloatScalar> KalmanState<T> {
    /// State from a mean and an `n×n` covariance.
    pub fn new(x: Vector<T>, p: Matrix<T>) -> Result<Self, EstimateError> {
        let n = x.len();
        if p.shape() != (n, n) {
            return Err(EstimateError::DimensionMismatch {
                what: "P",
                expected: (n, n),
                got: p.shape(),
            });
        }
        let state = Self { x, p };
        state.check_finite()?;
        Ok(state)
    }

    /// State with a diagonal covariance.
    pub fn with_diagonal_covariance(x: Vector<T>, variances: &[T]) -> Result<Self, EstimateError> {
        if variances.len() != x.len() {
            return Err(EstimateError::DimensionMismatch {
                what: "P diagonal",
                expected: (x.len(), 1),
                got: (variances.len(), 1),
            });
        }
        Self::new(x, Matrix::from_diagonal(variances))
    }

    /// State dimension.
    #[inline]
    pub fn dim(&self) -> usize {
        self.x.len()
    }

    fn check_finite(&self) -> Result<(), EstimateError> {
        if !self.x.is_finite() {
            return Err(EstimateError::NonFinite { what: "x" });
        }
        if !self.p.is_finite() {
            return Err(EstimateError::NonFinite { what: "P" });
        }
        Ok(())
    }
}

/// Linear system and noise model: `x' = F·x + w`, `z = H·x + v` with
/// `w ~ N(0, Q)` and `v ~ N(0, R)`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FilterModel<T> {
    f: Matrix<T>,
    h: Matrix<T>,
    q: Matrix<T>,
    r: Matrix<T>,
}

impl<T: FloatScalar> FilterModel<T> {
    /// Build a model, checking `F, Q: n×n`, `H: m×n` and `R: m×m`.
    ///
    /// ```
    /// use microsim_kernels::Matrix;
    /// use microsim_kernels::estimate::{EstimateError, FilterModel};
    ///
    /// let f = Matrix::<f64>::eye(2);
    /// let h = Matrix::new([[1.0, 0.0]]);
    /// let err = FilterModel::new(f, h, Matrix::eye(2), Matrix::eye(2)).unwrap_err();
    /// assert!(matches!(err, EstimateError::DimensionMismatch { what: "R", .. }));
    /// ```
    pub fn new(
        f: Matrix<T>,
        h: Matrix<T>,
        q: Matrix<T>,
        r: Matrix<T>,
    ) -> Result<Self, EstimateError> {
        let n = f.nrows();
        let m = h.nrows();
        let checks: [(&'static str, &Matrix<T>, (usize, usize)); 4] = [
            ("F", &f, (n, n)),
            ("H", &h, (m, n)),
            ("Q", &q, (n, n)),
            ("R", &r, (m, m)),
        ];
        for (what, mat, expected) in checks {
            if mat.shape() != expected {
                return Err(EstimateError::DimensionMismatch {
                    what,
                    expected,
                    got: mat.shape(),
                });
            }
            if !mat.is_finite() {
                return Err(EstimateError::NonFinite { what });
            }
        }
        Ok(Self { f, h, q, r })
    }

    /// State transition `F`.
    pub fn f(&self) -> &Matrix<T> {
        &self.f
    }

    /// Observation matrix `H`.
    pub fn h(&self) -> &Matrix<T> {
        &self.h
    }

    /// Process noise covariance `Q`.
    pub fn q(&self) -> &Matrix<T> {
        &self.q
    }

    /// Measurement noise covariance `R`.
    pub fn r(&self) -> &Matrix<T> {
        &self.r
    }

    /// State dimension `n`.
    pub fn state_dim(&self) -> usize {
        self.f.nrows()
    }

    /// Observation dimension `m`.
    pub fn obs_dim(&self) -> usize {
        self.h.nrows()
    }

    fn check_state(&self, state: &KalmanState<T>) -> Result<(), EstimateError> {
        let n = self.state_dim();
        if state.x.len() != n {
            return Err(EstimateError::DimensionMismatch {
                what: "x",
                expected: (n, 1),
                got: (state.x.len(), 1),
            });
        }
        if state.p.shape() != (n, n) {
            return Err(EstimateError::DimensionMismatch {
                what: "P",
                expected: (n, n),
                got: state.p.shape(),
            });
        }
        state.check_finite()
    }
}

/// Intermediate quantities of an update, for display.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct UpdateReport<T> {
    /// `y = z − H·x`.
    pub innovation: Vector<T>,
    /// `S = H·P·Hᵗ + R`.
    pub innovation_covariance: Matrix<T>,
    /// `K = P·Hᵗ·S⁻¹`.
    pub gain: Matrix<T>,
}

fn finish<T: FloatScalar>(p: Matrix<T>, settings: &KalmanSettings) -> Matrix<T> {
    if settings.symmetrize {
        let half = T::one() / (T::one() + T::one());
        &(&p + &p.transpose()) * half
    } else {
        p
    }
}

/// Predict step with default settings.
pub fn predict<T: FloatScalar>(
    state: &KalmanState<T>,
    model: &FilterModel<T>,
) -> Result<KalmanState<T>, EstimateError> {
    predict_with(state, model, &KalmanSettings::default())
}

/// Predict step: `x = F·x`, `P = F·P·Fᵗ + Q`.
pub fn predict_with<T: FloatScalar>(
    state: &KalmanState<T>,
    model: &FilterModel<T>,
    settings: &KalmanSettings,
) -> Result<KalmanState<T>, EstimateError> {
    model.check_state(state)?;
    let f = &model.f;
    let x = f * &state.x;
    let p = &(&(f * &state.p) * &f.transpose()) + &model.q;
    Ok(KalmanState {
        x,
        p: finish(p, settings),
    })
}

/// Update step with default settings.
pub fn update<T: FloatScalar>(
    state: &KalmanState<T>,
    z: &Vector<T>,
    model: &FilterModel<T>,
) -> Result<(KalmanState<T>, UpdateReport<T>), EstimateError> {
    update_with(state, z, model, &KalmanSettings::default())
}

/// Update step with measurement `z`.
///
/// - innovation `y = z − H·x`
/// - innovation covariance `S = H·P·Hᵗ + R`
/// - gain `K = P·Hᵗ·S⁻¹`
/// - `x = x + K·y`, covariance per [`KalmanSettings::covariance_form`]
///
/// `S⁻¹` uses the closed form for one or two observations and Gauss–Jordan
/// beyond that. A singular `S` yields
/// [`EstimateError::SingularInnovation`]; the input state is untouched.
pub fn update_with<T: FloatScalar>(
    state: &KalmanState<T>,
    z: &Vector<T>,
    model: &FilterModel<T>,
    settings: &KalmanSettings,
) -> Result<(KalmanState<T>, UpdateReport<T>), EstimateError> {
    model.check_state(state)?;
    let m = model.obs_dim();
    if z.len() != m {
        return Err(EstimateError::DimensionMismatch {
            what: "z",
            expected: (m, 1),
            got: (z.len(), 1),
        });
    }
    if !z.is_finite() {
        return Err(EstimateError::NonFinite { what: "z" });
    }

    let h = &model.h;
    let r = &model.r;
    let ht = h.transpose();

    let y = z - &(h * &state.x); // innovation
    let pht = &state.p * &ht;
    let s = &(h * &pht) + r; // innovation covariance

    let s_inv = s.inverse().map_err(|e| match e {
        LinalgError::NonFinite => EstimateError::NonFinite { what: "S" },
        _ => {
            log::debug!("kalman update: singular innovation covariance {:?}", s);
            EstimateError::SingularInnovation
        }
    })?;
    let k = &pht * &s_inv; // n×m

    let x = &state.x + &(&k * &y);

    let i_kh = &Matrix::eye(model.state_dim()) - &(&k * h);
    let p = match settings.covariance_form {
        CovarianceForm::Simple => &i_kh * &state.p,
        CovarianceForm::Joseph => {
            &(&(&i_kh * &state.p) * &i_kh.transpose()) + &(&(&k * r) * &k.transpose())
        }
    };

    Ok((
        KalmanState {
            x,
            p: finish(p, settings),
        },
        UpdateReport {
            innovation: y,
            innovation_covariance: s,
            gain: k,
        },
    ))
}

/// Kalman filter owning its state across steps.
///
/// A failed call leaves the state as it was.
#[derive(Debug, Clone, PartialEq)]
pub struct KalmanFilter<T> {
    state: KalmanState<T>,
    settings: KalmanSettings,
    steps: usize,
}

impl<T: FloatScalar> KalmanFilter<T> {
    /// Create a filter with default settings.
    pub fn new(state: KalmanState<T>) -> Self {
        Self::with_settings(state, KalmanSettings::default())
    }

    pub fn with_settings(state: KalmanState<T>, settings: KalmanSettings) -> Self {
        Self {
            state,
            settings,
            steps: 0,
        }
    }

    /// Reference to the current state.
    #[inline]
    pub fn state(&self) -> &KalmanState<T> {
        &self.state
    }

    #[inline]
    pub fn settings(&self) -> &KalmanSettings {
        &self.settings
    }

    /// Number of completed [`step`](Self::step) calls.
    #[inline]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Replace the state and clear the step counter.
    pub fn reset(&mut self, state: KalmanState<T>) {
        self.state = state;
        self.steps = 0;
    }

    pub fn predict(&mut self, model: &FilterModel<T>) -> Result<(), EstimateError> {
        self.state = predict_with(&self.state, model, &self.settings)?;
        Ok(())
    }

    pub fn update(
        &mut self,
        z: &Vector<T>,
        model: &FilterModel<T>,
    ) -> Result<UpdateReport<T>, EstimateError> {
        let (state, report) = update_with(&self.state, z, model, &self.settings)?;
        self.state = state;
        Ok(report)
    }

    /// Predict then update. Nothing is committed unless both succeed.
    pub fn step(
        &mut self,
        z: &Vector<T>,
        model: &FilterModel<T>,
    ) -> Result<UpdateReport<T>, EstimateError> {
        let predicted = predict_with(&self.state, model, &self.settings)?;
        let (state, report) = update_with(&predicted, z, model, &self.settings)?;
        self.state = state;
        self.steps += 1;
        Ok(report)
    }
}
