//! Benchmarks for application identifier hashing

#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use jumplist_manager::AppIdHash;
use jumplist_manager::hash::Crc64;
use std::hint::black_box;

fn bench_compute(c: &mut Criterion) {
    let mut group = c.benchmark_group("app_id_hash");
    for app_id in [
        "Microsoft.Windows.Explorer",
        "Microsoft.WindowsTerminal_8wekyb3d8bbwe!App",
        r"{6D809377-6AF0-444B-8957-A3773F02200E}\Contoso\Writer\writer.exe",
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(app_id.len()), app_id, |b, id| {
            b.iter(|| AppIdHash::compute(black_box(id)));
        });
    }
    group.finish();
}

fn bench_raw_update(c: &mut Criterion) {
    let bytes = vec![0x5A_u8; 4096];
    c.bench_function("crc64_update_4k", |b| {
        b.iter(|| {
            let mut hasher = Crc64::new();
            hasher.update(black_box(&bytes));
            black_box(hasher.finish())
        });
    });
}

criterion_group!(benches, bench_compute, bench_raw_update);
criterion_main!(benches);
