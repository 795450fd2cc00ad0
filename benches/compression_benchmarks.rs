use std::io::Cursor;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use huff_compress::Compressor;

fn sample_text(len: usize) -> Vec<u8> {
    b"the quick brown fox jumps over the lazy dog. "
        .iter()
        .copied()
        .cycle()
        .take(len)
        .collect()
}

fn bench_compress(c: &mut Criterion) {
    let compressor = Compressor::default();
    let data = sample_text(1 << 20);

    let mut group = c.benchmark_group("huffman");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("compress_1mib", |b| {
        b.iter(|| {
            let mut out = Vec::with_capacity(data.len());
            compressor
                .compress(Cursor::new(black_box(&data[..])), &mut out, true)
                .unwrap();
            out
        })
    });

    let mut packed = Vec::new();
    compressor
        .compress(Cursor::new(&data[..]), &mut packed, true)
        .unwrap();
    group.bench_function("decompress_1mib", |b| {
        b.iter(|| {
            let mut out = Vec::with_capacity(data.len());
            compressor.decompress(black_box(&packed[..]), &mut out).unwrap();
            out
        })
    });
    group.finish();
}

criterion_group!(benches, bench_compress);
criterion_main!(benches);
