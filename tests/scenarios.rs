use approx::assert_relative_eq;
use microsim_kernels::estimate::{
    measurement_noise, position_observation, white_noise_acceleration, FilterModel, KalmanFilter,
    KalmanState, MotionModel,
};
use microsim_kernels::linalg::{
    confidence_ellipse, eigen2x2, fundamental_subspaces, reduce, reduce_augmented, svd2x2,
    EigenKind, SolutionSet,
};
use microsim_kernels::spectral::{dft2d, filter_image, idft2d, FrequencyMask, TestPattern};
use microsim_kernels::{Matrix, Vector};

const TOL: f64 = 1e-10;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn assert_matrix_near(a: &Matrix<f64>, b: &Matrix<f64>, tol: f64) {
    let diff = a.max_abs_diff(b).expect("shape mismatch");
    assert!(diff < tol, "max diff {} >= {}\n{:?}\nvs\n{:?}", diff, tol, a, b);
}

// ── Solution-set classification ──────────────────────────────────────

#[test]
fn infinite_solutions_one_free_column() {
    init_logging();
    let ab = Matrix::new([
        [1.0, 2.0, 1.0, 4.0],
        [2.0, 4.0, 3.0, 9.0],
        [1.0, 2.0, 2.0, 5.0],
    ]);
    let dec = reduce_augmented(&ab).unwrap();
    assert_eq!(dec.free_cols, vec![1]);
    assert_eq!(dec.rank + dec.free_cols.len(), 3);
    assert_matrix_near(
        &dec.rref,
        &Matrix::new([
            [1.0, 2.0, 0.0, 3.0],
            [0.0, 0.0, 1.0, 1.0],
            [0.0, 0.0, 0.0, 0.0],
        ]),
        TOL,
    );

    let SolutionSet::Infinite {
        particular,
        directions,
    } = dec.solution_set()
    else {
        panic!("expected infinitely many solutions");
    };
    // Every particular + s·direction solves the system
    let a = Matrix::from_fn(3, 3, |i, j| ab[(i, j)]);
    let b = ab.column(3);
    for s in [-2.0, 0.0, 1.5] {
        let x = &particular + &(&directions[0] * s);
        let r = &(&a * &x) - &b;
        assert!(r.norm() < TOL, "s = {}: residual {}", s, r.norm());
    }
}

#[test]
fn no_solution_detects_inconsistent_row() {
    init_logging();
    let ab = Matrix::new([[1.0, 2.0, 3.0], [1.0, 2.0, 5.0], [2.0, 4.0, 8.0]]);
    let dec = reduce_augmented(&ab).unwrap();
    assert!(dec.inconsistent_row.is_some());
    assert!(matches!(
        dec.solution_set(),
        SolutionSet::NoSolution { .. }
    ));
}

#[test]
fn unique_solution() {
    init_logging();
    let ab = Matrix::new([
        [2.0, 1.0, -1.0, 8.0],
        [-3.0, -1.0, 2.0, -11.0],
        [-2.0, 1.0, 2.0, -3.0],
    ]);
    let dec = reduce_augmented(&ab).unwrap();
    let SolutionSet::Unique(x) = dec.solution_set() else {
        panic!("expected a unique solution");
    };
    assert_relative_eq!(x[0], 2.0, epsilon = TOL);
    assert_relative_eq!(x[1], 3.0, epsilon = TOL);
    assert_relative_eq!(x[2], -1.0, epsilon = TOL);
}

#[test]
fn rref_pivots_are_exact() {
    let a = Matrix::new([
        [0.3, 1.7, -2.2, 0.9],
        [1.1, -0.4, 0.6, 2.5],
        [1.4, 1.3, -1.6, 3.4],
    ]);
    let dec = reduce(&a).unwrap();
    for (row, &col) in dec.pivot_cols.iter().enumerate() {
        assert_eq!(dec.rref[(row, col)], 1.0);
        for other in 0..a.nrows() {
            if other != row {
                assert_eq!(dec.rref[(other, col)], 0.0);
            }
        }
    }
}

#[test]
fn wide_homogeneous_system() {
    let a = Matrix::new([[1.0, -1.0, 2.0, 0.5], [3.0, 0.0, 1.0, -1.0]]);
    let dec = reduce(&a).unwrap();
    assert!(dec.free_cols.len() >= 4 - 2);
    for v in &dec.null_basis {
        assert!((&a * v).norm() < 1e-9);
    }
}

#[test]
fn four_subspaces_of_rank_one() {
    let a = Matrix::new([[1.0, 3.0], [2.0, 6.0]]);
    let s = fundamental_subspaces(&a).unwrap();
    assert_eq!(s.rank, 1);
    assert_eq!(s.row_space.len(), 1);
    assert_eq!(s.null_space.len(), 1);
    assert_eq!(s.left_null_space.len(), 1);
    assert!((&a * &s.null_space[0]).norm() < TOL);
    assert!((&a.transpose() * &s.left_null_space[0]).norm() < TOL);
}

// ── Eigen / SVD ──────────────────────────────────────────────────────

#[test]
fn eigen_diagonalizable_and_defective() {
    let eig = eigen2x2(&Matrix::new([[2.0, 1.0], [0.0, 3.0]])).unwrap();
    assert!(!eig.degenerate);
    assert_relative_eq!(eig.eigenvalues[0], 3.0, epsilon = TOL);
    assert_relative_eq!(eig.eigenvalues[1], 2.0, epsilon = TOL);
    assert!(eig.diagonalization().is_some());

    let jordan = eigen2x2(&Matrix::new([[2.0, 1.0], [0.0, 2.0]])).unwrap();
    assert!(jordan.degenerate);
    assert_eq!(jordan.kind, EigenKind::Defective);
}

#[test]
fn svd_reconstruction() {
    let a = Matrix::new([[3.0, 1.0], [1.0, 3.0]]);
    let svd = svd2x2(&a).unwrap();
    assert_relative_eq!(svd.singular_values[0], 4.0, epsilon = TOL);
    assert_relative_eq!(svd.singular_values[1], 2.0, epsilon = TOL);
    assert_matrix_near(&svd.reconstruct(), &a, TOL);

    let shear = Matrix::new([[1.0, 1.5], [0.0, 1.0]]);
    let svd = svd2x2(&shear).unwrap();
    assert_matrix_near(&svd.reconstruct(), &shear, TOL);
    // σ₁σ₂ = |det A|
    assert_relative_eq!(
        svd.singular_values[0] * svd.singular_values[1],
        1.0,
        epsilon = TOL
    );
}

// ── Kalman ───────────────────────────────────────────────────────────

#[test]
fn tracker_follows_straight_line() {
    init_logging();
    let dt = 1.0;
    let model = FilterModel::new(
        MotionModel::ConstantVelocity.transition(dt),
        position_observation(),
        white_noise_acceleration(0.5, dt),
        measurement_noise(5.0),
    )
    .unwrap();
    let state = KalmanState::with_diagonal_covariance(
        Vector::from_slice(&[0.0, 0.0, 0.0, 0.0]),
        &[100.0, 100.0, 10.0, 10.0],
    )
    .unwrap();
    let mut kf = KalmanFilter::new(state);

    // Noise-free measurements of a target moving at (2, -1) per step
    for k in 1..=60 {
        let t = k as f64;
        kf.step(&Vector::from_slice(&[2.0 * t, -t]), &model).unwrap();
    }
    let x = &kf.state().x;
    assert!((x[0] - 120.0).abs() < 1.0);
    assert!((x[1] + 60.0).abs() < 1.0);
    assert!((x[2] - 2.0).abs() < 0.1);
    assert!((x[3] + 1.0).abs() < 0.1);

    let ellipse = confidence_ellipse(&Matrix::from_fn(2, 2, |i, j| kf.state().p[(i, j)]), 2.0)
        .unwrap();
    assert!(ellipse.semi_major >= ellipse.semi_minor);
    assert!(ellipse.semi_minor > 0.0);
}

// ── DFT ──────────────────────────────────────────────────────────────

#[test]
fn checkerboard_round_trip() {
    init_logging();
    let n = 8;
    let img = Matrix::from_fn(n, n, |y, x| if (x + y) % 2 == 0 { 255.0 } else { 0.0 });
    let f = dft2d(&img).unwrap();
    let back = idft2d(&f.real, &f.imag).unwrap();
    assert_matrix_near(&back, &img, 1e-9);

    // A 1-pixel checkerboard is the Nyquist frequency (N/2, N/2), which
    // shifts to the corner; the DC term holds the mean.
    assert_relative_eq!(f.real[(n / 2, n / 2)], 255.0 * 32.0, epsilon = 1e-9);
    assert_relative_eq!(f.real[(0, 0)], 255.0 * 32.0, epsilon = 1e-9);
}

#[test]
fn low_pass_smooths_edge() {
    let img = TestPattern::SingleEdge.generate::<f64>(16);
    let out = filter_image(&img, FrequencyMask::LowPass, 3.0).unwrap();
    // Far from the edge the level is roughly preserved; the jump is softened
    let jump_before = img[(8, 8)] - img[(8, 7)];
    let jump_after = out.image[(8, 8)] - out.image[(8, 7)];
    assert!(jump_after.abs() < jump_before.abs());
    assert_eq!(out.spectrum.size(), 16);
}
