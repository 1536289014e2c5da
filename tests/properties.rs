use microsim_kernels::estimate::{
    measurement_noise, position_observation, predict, update, white_noise_acceleration,
    FilterModel, KalmanState, MotionModel,
};
use microsim_kernels::linalg::{eigen2x2, reduce, svd2x2};
use microsim_kernels::spectral::{dft2d, idft2d};
use microsim_kernels::{Matrix, Vector};
use proptest::prelude::*;

/// Small integer matrices: every non-zero pivot stays far above the
/// default tolerance, so the rank is exact.
fn int_matrix() -> impl Strategy<Value = Matrix<f64>> {
    (1usize..=4, 1usize..=5).prop_flat_map(|(m, n)| {
        prop::collection::vec(-5i32..=5, m * n).prop_map(move |data| {
            Matrix::from_vec(m, n, data.into_iter().map(f64::from).collect())
        })
    })
}

fn square_image() -> impl Strategy<Value = Matrix<f64>> {
    (1usize..=8).prop_flat_map(|n| {
        prop::collection::vec(0.0f64..=255.0, n * n).prop_map(move |data| Matrix::from_vec(n, n, data))
    })
}

fn matrix2() -> impl Strategy<Value = Matrix<f64>> {
    prop::array::uniform4(-10.0f64..10.0).prop_map(|[a, b, c, d]| Matrix::new([[a, b], [c, d]]))
}

/// Cholesky factorization succeeds on `P + δI`, i.e. every eigenvalue of
/// `P` is at least `−δ`.
fn is_psd(p: &Matrix<f64>, delta: f64) -> bool {
    let n = p.nrows();
    let mut l = Matrix::<f64>::zeros(n, n);
    for j in 0..n {
        let mut d = p[(j, j)] + delta;
        for k in 0..j {
            d -= l[(j, k)] * l[(j, k)];
        }
        if d <= 0.0 {
            return false;
        }
        l[(j, j)] = d.sqrt();
        for i in (j + 1)..n {
            let mut s = p[(i, j)];
            for k in 0..j {
                s -= l[(i, k)] * l[(j, k)];
            }
            l[(i, j)] = s / l[(j, j)];
        }
    }
    true
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn rref_is_idempotent(a in int_matrix()) {
        let once = reduce(&a).unwrap();
        let twice = reduce(&once.rref).unwrap();
        let diff = once.rref.max_abs_diff(&twice.rref).unwrap();
        prop_assert!(diff < 1e-9, "diff = {}", diff);
        prop_assert_eq!(once.pivot_cols, twice.pivot_cols);
    }

    #[test]
    fn rank_plus_nullity_is_column_count(a in int_matrix()) {
        let dec = reduce(&a).unwrap();
        prop_assert_eq!(dec.rank, dec.pivot_cols.len());
        prop_assert_eq!(dec.rank + dec.free_cols.len(), a.ncols());
        prop_assert!(dec.rank <= a.nrows().min(a.ncols()));
    }

    #[test]
    fn null_basis_is_annihilated(a in int_matrix()) {
        let dec = reduce(&a).unwrap();
        prop_assert_eq!(dec.null_basis.len(), dec.free_cols.len());
        for v in &dec.null_basis {
            prop_assert!((v.norm() - 1.0).abs() < 1e-12);
            let r = (&a * v).norm();
            prop_assert!(r < 1e-9, "‖A·v‖ = {}", r);
        }
    }

    #[test]
    fn svd_reconstructs(a in matrix2()) {
        let svd = svd2x2(&a).unwrap();
        prop_assert!(svd.singular_values[0] >= svd.singular_values[1]);
        prop_assert!(svd.singular_values[1] >= 0.0);
        prop_assume!(!svd.degenerate);
        let diff = svd.reconstruct().max_abs_diff(&a).unwrap();
        prop_assert!(diff < 1e-9 * (1.0 + a.max_abs()), "diff = {}", diff);
    }

    #[test]
    fn symmetric_eigenpairs(a in -10.0f64..10.0, b in -10.0f64..10.0, d in -10.0f64..10.0) {
        let m = Matrix::new([[a, b], [b, d]]);
        let eig = eigen2x2(&m).unwrap();
        prop_assert!(eig.is_real());
        let [l1, l2] = eig.eigenvalues;
        prop_assert!(l1 >= l2);
        let [v1, v2] = eig.eigenvectors.clone().unwrap();
        for (l, v) in [(l1, &v1), (l2, &v2)] {
            let r = (&(&m * v) - &(v * l)).norm();
            prop_assert!(r < 1e-3 * (1.0 + m.max_abs()), "residual {}", r);
        }
    }

    #[test]
    fn dft_round_trip(img in square_image()) {
        let f = dft2d(&img).unwrap();
        let back = idft2d(&f.real, &f.imag).unwrap();
        let diff = back.max_abs_diff(&img).unwrap();
        prop_assert!(diff < 1e-8, "diff = {}", diff);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn kalman_covariance_stays_valid(
        q in 0.01f64..2.0,
        r in 1.0f64..50.0,
        seed in 0..1000u32,
        damped in any::<bool>(),
    ) {
        let motion = if damped { MotionModel::damped() } else { MotionModel::ConstantVelocity };
        let model = FilterModel::new(
            motion.transition(1.0),
            position_observation(),
            white_noise_acceleration(q, 1.0),
            measurement_noise(r),
        )
        .unwrap();
        let mut state = KalmanState::with_diagonal_covariance(
            Vector::from_slice(&[400.0, 250.0, 0.0, 0.0]),
            &[100.0, 100.0, 10.0, 10.0],
        )
        .unwrap();

        for k in 0..40 {
            let t = (k as f64 + seed as f64) * 0.37;
            let z = Vector::from_slice(&[400.0 + 30.0 * t.sin(), 250.0 + 30.0 * (1.3 * t).cos()]);
            state = predict(&state, &model).unwrap();
            state = update(&state, &z, &model).unwrap().0;

            let p = &state.p;
            let scale = p.max_abs();
            prop_assert!(p.is_symmetric(1e-9 * scale), "asymmetric P at step {}", k);
            prop_assert!(is_psd(p, 1e-9 * scale), "P not PSD at step {}", k);
        }
    }
}
