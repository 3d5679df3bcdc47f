//! Merge and codec throughput.
//!
//! ```bash
//! cargo bench -p logarchive-core --bench merge
//! cargo bench -p logarchive-core --bench merge -- merge_lines
//! ```

use bytes::Bytes;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use logarchive_core::compression::registry;
use logarchive_core::stream::{read_all, BoxStream, MemoryStream, MergeStream};

/// `count` timestamped lines; input `k` of `inputs` holds every k-th one.
fn sorted_inputs(inputs: usize, count: usize) -> Vec<Bytes> {
    let mut texts = vec![String::new(); inputs];
    for i in 0..count {
        texts[i % inputs].push_str(&format!("2024-01-01T{:08} host{} GET /index.html 200\n", i, i % 7));
    }
    texts.into_iter().map(Bytes::from).collect()
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_lines");
    let count = 50_000;

    for inputs in [2usize, 8, 32] {
        let data = sorted_inputs(inputs, count);
        let total: usize = data.iter().map(Bytes::len).sum();
        group.throughput(Throughput::Bytes(total as u64));
        group.bench_with_input(BenchmarkId::from_parameter(inputs), &data, |b, data| {
            b.iter(|| {
                let streams: Vec<BoxStream> = data
                    .iter()
                    .map(|d| Box::new(MemoryStream::with_chunk_size(d.clone(), 64 * 1024)) as BoxStream)
                    .collect();
                let mut merged = MergeStream::new(streams);
                black_box(read_all(&mut merged).unwrap());
            });
        });
    }

    group.finish();
}

fn bench_codecs(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec_roundtrip");
    let data = sorted_inputs(1, 20_000).remove(0);
    group.throughput(Throughput::Bytes(data.len() as u64));

    for codec in registry().descriptors() {
        group.bench_function(codec.mode, |b| {
            b.iter(|| {
                let source: BoxStream = Box::new(MemoryStream::new(data.clone()));
                let mut encoded = codec.compress_stage(source).unwrap();
                let compressed = read_all(&mut encoded).unwrap();
                let mut decoded = codec
                    .decompress_stage(Box::new(MemoryStream::new(compressed)))
                    .unwrap();
                black_box(read_all(&mut decoded).unwrap());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_merge, bench_codecs);
criterion_main!(benches);
