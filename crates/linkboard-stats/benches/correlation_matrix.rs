use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use linkboard_model::Row;
use linkboard_stats::compute_correlation_matrix;

fn build_rows(rows: usize, attributes: usize) -> (Vec<Row>, Vec<String>) {
    let names: Vec<String> = (0..attributes).map(|i| format!("attr_{i}")).collect();
    let data = (0..rows)
        .map(|r| {
            names
                .iter()
                .enumerate()
                .map(|(c, name)| {
                    // Deterministic pseudo-noise so pairs are neither constant nor perfectly linear.
                    let v = ((r * 31 + c * 17) % 97) as f64 + (r as f64) * 0.01 * (c as f64);
                    (name.as_str(), v)
                })
                .collect()
        })
        .collect();
    (data, names)
}

fn bench_correlation_matrix(c: &mut Criterion) {
    let mut group = c.benchmark_group("correlation_matrix");
    for &attributes in &[8usize, 24, 64] {
        let (rows, names) = build_rows(5_000, attributes);
        group.throughput(Throughput::Elements((attributes * attributes) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(attributes), &attributes, |b, _| {
            b.iter(|| compute_correlation_matrix(black_box(&rows), black_box(&names)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_correlation_matrix);
criterion_main!(benches);
