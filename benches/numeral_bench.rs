//! Benchmarks for numeral arithmetic and the string-addressed API.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use numera::numbers::{backend_name, ActiveBackend};
use numera::prelude::*;

fn num(text: &str, p: Precision) -> Numeral {
    Numeral::parse(text, Radix::DECIMAL, p).unwrap()
}

/// An integer with `digits` decimal digits.
fn big_integer(digits: usize) -> String {
    (0..digits).map(|i| char::from(b'1' + (i % 9) as u8)).collect()
}

fn bench_integer_multiply(c: &mut Criterion) {
    let mut group = c.benchmark_group("integer_mul");
    let p = Precision::new(10);

    // Native integers stop at i128
    let sizes: &[usize] = if backend_name() == "dashu" { &[10, 100, 1000] } else { &[10, 18] };

    for &digits in sizes {
        let x = num(&big_integer(digits), p);
        let y = num(&big_integer(digits), p);

        group.bench_with_input(BenchmarkId::new("multiply", digits), &digits, |b, _| {
            b.iter(|| black_box(x.multiply(&y, p).unwrap()))
        });
    }

    group.finish();
}

fn bench_transcendental(c: &mut Criterion) {
    let mut group = c.benchmark_group("transcendental");
    let x = num("0.7", Precision::new(10));

    // Native floats stop at 15 digits
    let precisions: &[u32] = if backend_name() == "dashu" { &[10, 50, 200] } else { &[10, 15] };

    for &digits in precisions {
        let p = Precision::new(digits);
        group.bench_with_input(BenchmarkId::new("exp", digits), &p, |b, &p| b.iter(|| black_box(x.exp(p).unwrap())));
        group.bench_with_input(BenchmarkId::new("ln", digits), &p, |b, &p| b.iter(|| black_box(x.ln(p).unwrap())));
        group.bench_with_input(BenchmarkId::new("sin", digits), &p, |b, &p| b.iter(|| black_box(x.sin(p).unwrap())));
        group.bench_with_input(BenchmarkId::new("pi", digits), &p, |b, &p| b.iter(|| black_box(Numeral::<ActiveBackend>::pi(p).unwrap())));
    }

    group.finish();
}

fn bench_accumulate(c: &mut Criterion) {
    let p = Precision::new(10);
    let x = num("12345", p);
    let y = num("678.9", p);

    c.bench_function("accumulate_product_x100", |b| {
        b.iter(|| {
            let mut acc = Numeral::from_i64(0);
            for _ in 0..100 {
                acc.accumulate_product(&x, &y, p).unwrap();
            }
            black_box(acc)
        })
    });
}

fn bench_string_api(c: &mut Criterion) {
    let mut group = c.benchmark_group("string_api");
    let atoms = AtomTable::new();
    let p = Precision::new(10);

    group.bench_function("add", |b| b.iter(|| black_box(api::add("123", "0.5", &atoms, p).unwrap())));
    group.bench_function("divide", |b| b.iter(|| black_box(api::divide("2", "3", &atoms, p).unwrap())));
    group.bench_function("factorial_20", |b| b.iter(|| black_box(api::factorial("20", &atoms, p).unwrap())));
    group.bench_function("to_base_16", |b| b.iter(|| black_box(api::to_base("65535", "16", &atoms, p).unwrap())));

    group.finish();
}

fn bench_builtin_dispatch(c: &mut Criterion) {
    let env = Environment::with_core_builtins(
        std::sync::Arc::new(AtomTable::new()),
        EnvironmentConfig {
            precision: Precision::new(10),
        },
    );
    let args = [env.atoms().lookup("21"), env.atoms().lookup("2")];

    c.bench_function("builtin_multiply", |b| b.iter(|| black_box(env.call("Multiply", &args).unwrap())));
}

criterion_group!(
    benches,
    bench_integer_multiply,
    bench_transcendental,
    bench_accumulate,
    bench_string_api,
    bench_builtin_dispatch
);

criterion_main!(benches);
