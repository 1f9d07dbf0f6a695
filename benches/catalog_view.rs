// SPDX-License-Identifier: MPL-2.0
//! Benchmarks for catalog ingestion and view derivation.
//!
//! Measures the performance of:
//! - Ingesting many small scan batches
//! - Deriving the filtered, sorted view after a change

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use lens_gallery::application::MediaCatalog;
use lens_gallery::domain::media::{
    FolderId, KindFilter, MediaKind, MediaLocator, RawFileDescriptor, SortKey,
};
use std::hint::black_box;

const EXTENSIONS: [&str; 5] = ["png", "jpg", "gif", "mp4", "txt"];

/// Builds `count` descriptors with mixed kinds, sizes and dates.
fn descriptors(count: usize) -> Vec<RawFileDescriptor> {
    (0..count)
        .map(|i| {
            let name = format!("IMG_{}.{}", count - i, EXTENSIONS[i % EXTENSIONS.len()]);
            let locator = MediaLocator::new(format!("/bench/{name}"));
            let size = (i as u64 * 7_919) % 50_000;
            RawFileDescriptor::new(name, locator).with_metadata(size, 1_700_000_000_000 + i as u64)
        })
        .collect()
}

/// Benchmark ingestion in scanner-sized batches.
fn bench_ingest(c: &mut Criterion) {
    let mut group = c.benchmark_group("catalog_ingest");

    for count in [1_000usize, 10_000] {
        let input = descriptors(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &input, |b, input| {
            b.iter(|| {
                let mut catalog = MediaCatalog::new();
                for batch in input.chunks(64) {
                    catalog.ingest(FolderId::new(0), batch.iter().cloned());
                }
                black_box(catalog.len());
            });
        });
    }

    group.finish();
}

/// Benchmark view derivation after each sort key change.
fn bench_view(c: &mut Criterion) {
    let mut group = c.benchmark_group("catalog_view");

    let mut catalog = MediaCatalog::new();
    catalog.ingest(FolderId::new(0), descriptors(10_000));

    for sort in SortKey::ALL {
        group.bench_function(sort.as_str(), |b| {
            b.iter(|| {
                catalog.set_sort(SortKey::Type);
                catalog.set_sort(sort);
                black_box(catalog.view_ids().len());
            });
        });
    }

    group.bench_function("filter_video", |b| {
        b.iter(|| {
            catalog.set_filter(KindFilter::All);
            catalog.set_filter(KindFilter::Only(MediaKind::Video));
            black_box(catalog.view_ids().len());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_ingest, bench_view);
criterion_main!(benches);
