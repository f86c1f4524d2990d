use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use huffstat::{build_frequency_table, build_huffman_tree, encode, generate_code_table, HuffmanCoder};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn sample(len: usize) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..len)
        .map(|_| rng.gen_range(0..=255u8).min(rng.gen_range(0..=255u8)))
        .collect()
}

fn bench_stages(c: &mut Criterion) {
    let data = sample(1 << 20);
    let freq = build_frequency_table(&data);
    let root = build_huffman_tree(&freq).unwrap();
    let codes = generate_code_table(Some(&root)).unwrap();

    let mut group = c.benchmark_group("stages");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("frequency", |b| b.iter(|| build_frequency_table(black_box(&data))));
    group.bench_function("tree", |b| b.iter(|| build_huffman_tree(black_box(&freq)).unwrap()));
    group.bench_function("codes", |b| {
        b.iter(|| generate_code_table(Some(black_box(&root))).unwrap())
    });
    group.bench_function("encode", |b| b.iter(|| encode(black_box(&data), &codes).unwrap()));
    group.finish();
}

fn bench_analyze(c: &mut Criterion) {
    let coder = HuffmanCoder::default();
    let mut group = c.benchmark_group("analyze");
    for size in [1 << 10, 1 << 16, 1 << 20] {
        let data = sample(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| coder.analyze(black_box(data)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_stages, bench_analyze);
criterion_main!(benches);
