use criterion::{black_box, criterion_group, criterion_main, Criterion};
use zsr::{Codec, LzmaCodec};

fn bench_codec(c: &mut Criterion) {
    let data = b"the quick brown fox jumps over the lazy dog ".repeat(4096);
    let codec = LzmaCodec;
    let compressed = codec.compress(&data).unwrap();

    c.bench_function("lzma_compress_1_4mib", |b| {
        b.iter(|| codec.compress(black_box(&data)).unwrap())
    });

    c.bench_function("lzma_decompress_1_4mib", |b| {
        b.iter(|| codec.decompress(black_box(&compressed)).unwrap())
    });
}

criterion_group!(benches, bench_codec);
criterion_main!(benches);
