//! Benchmarks for structure editing.
//!
//! Run with: cargo bench
//!
//! Each iteration starts from a structure of a few hundred single-page
//! elements, the size of a large interactive session.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use pdfsplice::{ElementId, PageHandle, PageId, PageRef, SourceId, StructureManager};

const ELEMENTS: u32 = 200;

/// Creates a flat structure with one element per page.
fn flat_structure(count: u32) -> (StructureManager, Vec<ElementId>) {
    let mut manager = StructureManager::new();
    let elements: Vec<_> = (0..count)
        .filter_map(|n| {
            let page = PageRef::new(PageId(n as u64), SourceId(0), n, PageHandle(n + 1, 0));
            manager.create_element(vec![page])
        })
        .collect();
    let ids = elements.iter().map(|e| e.id()).collect();
    manager.append(elements).unwrap();
    (manager, ids)
}

/// Benchmark moving the last element to the front.
fn bench_move(c: &mut Criterion) {
    c.bench_function("move_last_to_front", |b| {
        b.iter_batched(
            || flat_structure(ELEMENTS),
            |(mut manager, ids)| {
                let last = ids[ids.len() - 1];
                manager.move_element(black_box(last), 0).is_ok()
            },
            BatchSize::SmallInput,
        );
    });
}

/// Benchmark collapsing every other element, then expanding the result.
fn bench_collapse_expand(c: &mut Criterion) {
    let mut group = c.benchmark_group("collapse_expand");

    for selected in [2usize, 20, 100].iter() {
        group.bench_function(format!("{}_elements", selected), |b| {
            b.iter_batched(
                || flat_structure(ELEMENTS),
                |(mut manager, ids)| {
                    let picked: Vec<ElementId> =
                        ids.iter().step_by(2).take(*selected).copied().collect();
                    if let Some(merged) = manager.collapse(black_box(&picked)) {
                        manager.expand(merged.id());
                    }
                    manager.len()
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

/// Benchmark computing the export order with a third of the pages excluded.
fn bench_export_order(c: &mut Criterion) {
    let (mut manager, ids) = flat_structure(ELEMENTS);
    for id in ids.iter().step_by(3) {
        manager.toggle_exclude(*id);
    }

    c.bench_function("export_order", |b| {
        b.iter(|| black_box(&manager).export_order().len());
    });
}

criterion_group!(benches, bench_move, bench_collapse_expand, bench_export_order);
criterion_main!(benches);
