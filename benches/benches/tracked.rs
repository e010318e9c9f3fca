// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for `understory_tracked`.

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use std::sync::Once;

use understory_tracked::{
    DirtyState, FieldRegistry, FieldSpec, TrackChanges, TrackChangesExt, TrackedStore,
    tracked_fields,
};

#[derive(Clone, Default)]
struct Row {
    id: u64,
    name: String,
    score: f64,
    dirty: DirtyState,
}

impl TrackChanges for Row {
    fn dirty_state(&self) -> &DirtyState {
        &self.dirty
    }

    fn dirty_state_mut(&mut self) -> &mut DirtyState {
        &mut self.dirty
    }
}

tracked_fields! {
    impl Row {
        accessor id: u64;
        accessor name: String;
        accessor score: f64;
    }
}

fn bench_generated(c: &mut Criterion) {
    static PRINT_SIZES: Once = Once::new();
    PRINT_SIZES.call_once(|| {
        eprintln!(
            "sizes: DirtyState={} TrackedStore={} Row={}",
            core::mem::size_of::<DirtyState>(),
            core::mem::size_of::<TrackedStore>(),
            core::mem::size_of::<Row>(),
        );
    });

    let mut group = c.benchmark_group("tracked/generated");

    group.bench_function("set_equal/u64", |b| {
        let mut row = Row::default();
        row.set_id(7);
        b.iter(|| black_box(row.set_id(black_box(7))))
    });

    group.bench_function("set_changed/u64", |b| {
        let mut row = Row::default();
        let mut next = 0_u64;
        b.iter(|| {
            next = next.wrapping_add(1);
            black_box(row.set_id(next))
        })
    });

    group.bench_function("set_equal/string", |b| {
        let mut row = Row::default();
        row.set_name("hello world hello world".to_string());
        b.iter_batched(
            || "hello world hello world".to_string(),
            |name| black_box(row.set_name(name)),
            BatchSize::SmallInput,
        )
    });

    group.bench_function("save_if_dirty", |b| {
        b.iter_batched(
            || {
                let mut row = Row::default();
                row.set_score(1.5);
                row
            },
            |mut row| {
                let saved: Result<bool, ()> = row.save_if_dirty(|r| {
                    black_box((r.id(), r.name(), r.score()));
                    Ok(())
                });
                black_box(saved)
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

fn bench_store(c: &mut Criterion) {
    let mut registry = FieldRegistry::new();
    let [a, b_field, c_field, d] = registry
        .declare_accessor::<f64, 4>(["a", "b", "c", "d"], FieldSpec::default())
        .unwrap();
    let [label] = registry
        .declare_accessor(["label"], FieldSpec::new(String::new()))
        .unwrap();

    let mut group = c.benchmark_group("tracked/store");

    group.bench_function("get/default", |bench| {
        let store = TrackedStore::new();
        bench.iter(|| black_box(*store.get(black_box(c_field), &registry)))
    });

    group.bench_function("get/written", |bench| {
        let mut store = TrackedStore::new();
        for field in [a, b_field, c_field, d] {
            store.set(field, 2.0, &registry).unwrap();
        }
        bench.iter(|| black_box(*store.get(black_box(c_field), &registry)))
    });

    group.bench_function("set_equal/f64", |bench| {
        let mut store = TrackedStore::new();
        store.set(a, 3.0, &registry).unwrap();
        bench.iter(|| black_box(store.set(a, black_box(3.0), &registry)))
    });

    group.bench_function("first_write/string", |bench| {
        bench.iter_batched(
            TrackedStore::new,
            |mut store| {
                let _ = black_box(store.set(label, "label".to_string(), &registry));
                black_box(store.is_dirty())
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(benches, bench_generated, bench_store);
criterion_main!(benches);
