//! Benchmarks for linear regression.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ylearn::prelude::*;

/// y = 1 + 2*x1 - 0.5*x2 + 3*x3 with a deterministic perturbation.
fn make_data(n: usize) -> (Matrix<f64>, Vector<f64>) {
    let mut x_data = Vec::with_capacity(n * 3);
    let mut y_data = Vec::with_capacity(n);
    let mut state: u64 = 42;
    for i in 0..n {
        let t = i as f64;
        let row = [t, (t * 0.37).sin() * 10.0, (t * 0.11).cos() * 5.0];
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
        let noise = (state >> 33) as f64 / (1u64 << 31) as f64 - 0.5;
        y_data.push(1.0 + 2.0 * row[0] - 0.5 * row[1] + 3.0 * row[2] + noise);
        x_data.extend_from_slice(&row);
    }
    (
        Matrix::from_vec(n, 3, x_data).unwrap(),
        Vector::from_vec(y_data),
    )
}

fn bench_ols_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("ols_fit");

    for size in [10, 50, 100, 500].iter() {
        let (x, y) = make_data(*size);

        for kind in SolverKind::ALL {
            group.bench_with_input(BenchmarkId::new(kind.name(), size), size, |b, _| {
                b.iter(|| {
                    let mut model = Ols::new().with_solver_kind(kind);
                    model.fit(black_box(&x), black_box(&y)).unwrap();
                    model
                });
            });
        }
    }

    group.finish();
}

fn bench_ridge_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("ridge_fit");

    for size in [10, 100, 500].iter() {
        let (x, y) = make_data(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let mut model = Ridge::new(1.0).unwrap();
                model.fit(black_box(&x), black_box(&y)).unwrap();
                model
            });
        });
    }

    group.finish();
}

fn bench_ols_predict(c: &mut Criterion) {
    let mut group = c.benchmark_group("ols_predict");

    for size in [10, 50, 100, 500].iter() {
        let (x, y) = make_data(*size);

        let mut model = Ols::new();
        model.fit(&x, &y).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| model.predict(black_box(&x)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_ols_fit, bench_ridge_fit, bench_ols_predict);
criterion_main!(benches);
