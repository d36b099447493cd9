use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hashsum::{Digest, Md5, Sha1};

fn bench_digests(c: &mut Criterion) {
    let mut group = c.benchmark_group("digest");

    for len in [64usize, 1 << 10, 1 << 16] {
        let data = vec![0xa5u8; len];
        group.throughput(Throughput::Bytes(len as u64));
        group.bench_with_input(BenchmarkId::new("md5", len), &data, |bench, data| {
            bench.iter(|| Md5::digest(black_box(data)))
        });
        group.bench_with_input(BenchmarkId::new("sha1", len), &data, |bench, data| {
            bench.iter(|| Sha1::digest(black_box(data)))
        });
    }

    group.finish()
}

criterion_group!(benches, bench_digests);
criterion_main!(benches);
