use criterion::{criterion_group, criterion_main, Criterion};
use microsim_kernels::estimate::{
    measurement_noise, position_observation, white_noise_acceleration, FilterModel, KalmanFilter,
    KalmanState, MotionModel,
};
use microsim_kernels::linalg::{eigen2x2, reduce, svd2x2};
use microsim_kernels::spectral::{dft2d, filter_image, FrequencyMask, TestPattern};
use microsim_kernels::{Matrix, Vector};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn rank_deficient_4x5() -> Matrix<f64> {
    // Row 3 = row 0 + row 1
    Matrix::new([
        [2.0, -1.0, 0.5, 3.0, 1.0],
        [1.0, 4.0, -2.0, 0.0, 2.5],
        [0.0, 1.5, 3.0, -1.0, 0.5],
        [3.0, 3.0, -1.5, 3.0, 3.5],
    ])
}

fn tracker() -> (KalmanFilter<f64>, FilterModel<f64>) {
    let model = FilterModel::new(
        MotionModel::ConstantVelocity.transition(1.0),
        position_observation(),
        white_noise_acceleration(0.5, 1.0),
        measurement_noise(5.0),
    )
    .unwrap();
    let state = KalmanState::with_diagonal_covariance(
        Vector::from_slice(&[0.0, 0.0, 0.0, 0.0]),
        &[100.0, 100.0, 10.0, 10.0],
    )
    .unwrap();
    (KalmanFilter::new(state), model)
}

// ---------------------------------------------------------------------------
// 2×2 closed forms
// ---------------------------------------------------------------------------

fn eigen_2x2(c: &mut Criterion) {
    let mut g = c.benchmark_group("eigen_2x2_symmetric");

    g.bench_function("microsim", |b| {
        let a = Matrix::new([[4.0, 1.5], [1.5, 2.0]]);
        b.iter(|| eigen2x2(std::hint::black_box(&a)).unwrap())
    });

    g.bench_function("nalgebra", |b| {
        let a = nalgebra::Matrix2::new(4.0, 1.5, 1.5, 2.0);
        b.iter(|| nalgebra::SymmetricEigen::new(std::hint::black_box(a)))
    });

    g.finish();
}

fn svd_2x2(c: &mut Criterion) {
    let mut g = c.benchmark_group("svd_2x2");

    g.bench_function("microsim", |b| {
        let a = Matrix::new([[1.0, 1.5], [0.0, 1.0]]);
        b.iter(|| svd2x2(std::hint::black_box(&a)).unwrap())
    });

    g.bench_function("nalgebra", |b| {
        let a = nalgebra::Matrix2::new(1.0, 1.5, 0.0, 1.0);
        b.iter(|| std::hint::black_box(a).svd(true, true))
    });

    g.finish();
}

// ---------------------------------------------------------------------------
// Row reduction
// ---------------------------------------------------------------------------

fn rref_4x5(c: &mut Criterion) {
    let mut g = c.benchmark_group("rank_4x5");

    g.bench_function("microsim", |b| {
        let a = rank_deficient_4x5();
        b.iter(|| reduce(std::hint::black_box(&a)).unwrap().rank)
    });

    g.bench_function("nalgebra", |b| {
        let a = rank_deficient_4x5();
        let m = nalgebra::DMatrix::from_row_slice(4, 5, a.as_slice());
        b.iter(|| std::hint::black_box(&m).rank(1e-4))
    });

    g.finish();
}

// ---------------------------------------------------------------------------
// Kalman
// ---------------------------------------------------------------------------

fn kalman_step(c: &mut Criterion) {
    c.bench_function("kalman_step_4state", |b| {
        let (mut kf, model) = tracker();
        let z = Vector::from_slice(&[3.0, -2.0]);
        b.iter(|| kf.step(std::hint::black_box(&z), &model).unwrap())
    });
}

// ---------------------------------------------------------------------------
// DFT
// ---------------------------------------------------------------------------

fn dft(c: &mut Criterion) {
    let mut g = c.benchmark_group("dft2d");

    for n in [16usize, 32] {
        let img = TestPattern::Circle.generate::<f64>(n);
        g.bench_function(format!("forward_{n}"), |b| {
            b.iter(|| dft2d(std::hint::black_box(&img)).unwrap())
        });
        g.bench_function(format!("low_pass_{n}"), |b| {
            b.iter(|| filter_image(std::hint::black_box(&img), FrequencyMask::LowPass, 4.0).unwrap())
        });
    }

    g.finish();
}

criterion_group!(benches, eigen_2x2, svd_2x2, rref_4x5, kalman_step, dft);
criterion_main!(benches);
