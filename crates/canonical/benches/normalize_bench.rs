use canonical::{normalize, InternerBuilder, NormalizeConfig};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

fn bench_normalize(c: &mut Criterion) {
    let config = NormalizeConfig::default();
    let mut group = c.benchmark_group("normalize");

    for size in [64, 512, 4096, 32768].iter() {
        let text = "Sony DSC-W310 (Black) Inc. ".repeat(*size / 27 + 1);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_function(format!("bytes_{size}"), |b| {
            b.iter(|| {
                let mut builder = InternerBuilder::new();
                normalize(black_box(&text), &mut builder, black_box(&config))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_normalize);
criterion_main!(benches);
