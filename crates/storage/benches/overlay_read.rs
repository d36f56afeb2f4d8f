//! Overlay engine benchmarks
//!
//! ## Read Paths
//!
//! - `fast_path`: no overlay chunk overlaps the request, bytes come straight
//!   from the backing stream
//! - `overlay_path/N`: every other page of an N-page extent was written, so the
//!   request is classified and merged page by page
//!
//! ## Deterministic Randomness
//!
//! Backing content is generated from a fixed seed (BENCH_SEED).
//!
//! ## Running
//!
//! ```bash
//! cargo bench -p bakmount-storage --bench overlay_read
//! ```

use std::io::Cursor;

use bakmount_core::{FileStorage, SeekOrigin};
use bakmount_storage::HybridStorage;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{rngs::StdRng, RngCore, SeedableRng};

const BENCH_SEED: u64 = 0xDEADBEEF_CAFEBABE;
const PAGE: usize = 8192;
const FILE_PAGES: usize = 256;

fn backing() -> Vec<u8> {
    let mut data = vec![0u8; PAGE * FILE_PAGES];
    StdRng::seed_from_u64(BENCH_SEED).fill_bytes(&mut data);
    data
}

fn fast_path(c: &mut Criterion) {
    let mut storage = HybridStorage::new(Cursor::new(backing())).unwrap();
    let mut buf = vec![0u8; 8 * PAGE];

    let mut group = c.benchmark_group("fast_path");
    group.throughput(Throughput::Bytes(buf.len() as u64));
    group.bench_function("extent", |b| {
        b.iter(|| {
            storage.seek(0, SeekOrigin::Begin).unwrap();
            black_box(storage.read(&mut buf, 0, 8 * PAGE).unwrap())
        })
    });
    group.finish();
}

fn overlay_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("overlay_path");

    for pages in [1usize, 8, 64] {
        let mut storage = HybridStorage::new(Cursor::new(backing())).unwrap();
        for page in (0..pages).step_by(2) {
            storage.seek((page * PAGE) as i64, SeekOrigin::Begin).unwrap();
            storage.write(&[0xAB; PAGE], 0, PAGE).unwrap();
        }

        let mut buf = vec![0u8; pages * PAGE];
        group.throughput(Throughput::Bytes(buf.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(pages), &pages, |b, &pages| {
            b.iter(|| {
                storage.seek(0, SeekOrigin::Begin).unwrap();
                black_box(storage.read(&mut buf, 0, pages * PAGE).unwrap())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, fast_path, overlay_path);
criterion_main!(benches);
