use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pmdiff_core::{
    run_scheme, DiffusionRhs, Diffusivity, DiffusivityParams, Field,
    FieldRunSpec, Scheme,
};

fn ramp_with_ripple(n: usize) -> Field {
    Field::from_fn(n, n, |i, j| i as f64 / n as f64 + 0.05 * ((i * 7 + j * 13) % 5) as f64)
}

fn bench_rhs_eval(c: &mut Criterion) {
    let rhs = DiffusionRhs::new(Diffusivity::PeronaMalik, DiffusivityParams::default()).unwrap();
    let mut group = c.benchmark_group("diffusion_rhs");
    for &n in &[64usize, 128, 256] {
        let field = ramp_with_ripple(n);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &field, |b, field| {
            b.iter(|| black_box(rhs.eval(black_box(field))))
        });
    }
    group.finish();
}

fn bench_field_schemes(c: &mut Criterion) {
    let rhs = DiffusionRhs::new(Diffusivity::Weickert, DiffusivityParams::default()).unwrap();
    let field = ramp_with_ripple(96);
    let spec = FieldRunSpec::new(0.1, 10).unwrap();
    let mut group = c.benchmark_group("field_run_10_steps");
    for scheme in Scheme::ALL {
        group.bench_function(scheme.name(), |b| {
            b.iter(|| black_box(run_scheme(scheme, &rhs, &field, &spec).unwrap()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_rhs_eval, bench_field_schemes);
criterion_main!(benches);
