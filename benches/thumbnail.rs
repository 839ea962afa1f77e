#![allow(clippy::unwrap_used)]
//! Benchmarks for thumbnail row flipping and PNG encoding

#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use jumplist_manager::thumbnail::{DeviceBitmap, encode_png, flip_rows};
use std::hint::black_box;

fn gradient(size: u32) -> DeviceBitmap {
    let side = size as usize;
    let bits = (0..side * side * 4).map(|i| (i % 251) as u8).collect();
    DeviceBitmap::from_bgra(size, size, bits).unwrap()
}

fn bench_flip_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("flip_rows");
    for size in [32, 64, 256] {
        let bitmap = gradient(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &bitmap, |b, bitmap| {
            b.iter(|| flip_rows(black_box(bitmap)));
        });
    }
    group.finish();
}

fn bench_encode_png(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_png");
    for size in [32, 64] {
        let bitmap = gradient(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &bitmap, |b, bitmap| {
            b.iter(|| encode_png(black_box(bitmap)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_flip_rows, bench_encode_png);
criterion_main!(benches);
