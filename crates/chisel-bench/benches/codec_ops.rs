//! Criterion micro-benchmarks for container encode and decode.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use chisel_bench::stroke_session;
use chisel_replay::codec::{decode_container, encode_container};
use chisel_replay::ContainerReader;

/// Benchmark: export a ~50K-entry stroke session.
fn bench_export_strokes(c: &mut Criterion) {
    let recorder = stroke_session(500, 100, 42);

    c.bench_function("export_strokes_50k", |b| {
        b.iter(|| {
            let container = recorder.export();
            black_box(&container);
        });
    });
}

/// Benchmark: encode behind a 1 MB prefix.
fn bench_encode_with_prefix(c: &mut Criterion) {
    let earlier = stroke_session(1000, 100, 1).export();
    let recorder = stroke_session(50, 100, 2);

    c.bench_function("encode_with_prefix", |b| {
        b.iter(|| {
            let bytes = encode_container(Some(earlier.as_bytes()), recorder.log(), 0);
            black_box(&bytes);
        });
    });
}

/// Benchmark: bulk decode of the same session.
fn bench_decode_strokes(c: &mut Criterion) {
    let container = stroke_session(500, 100, 42).export();

    c.bench_function("decode_strokes_50k", |b| {
        b.iter(|| {
            let decoded = decode_container(&container).unwrap();
            black_box(&decoded);
        });
    });
}

/// Benchmark: streaming decode without collecting.
fn bench_stream_strokes(c: &mut Criterion) {
    let container = stroke_session(500, 100, 42).export();

    c.bench_function("stream_strokes_50k", |b| {
        b.iter(|| {
            let reader = ContainerReader::open(&container).unwrap();
            let mut n = 0usize;
            for entry in reader.entries() {
                black_box(entry.unwrap());
                n += 1;
            }
            black_box(n);
        });
    });
}

criterion_group!(
    benches,
    bench_export_strokes,
    bench_encode_with_prefix,
    bench_decode_strokes,
    bench_stream_strokes
);
criterion_main!(benches);
