//! Segmented list benchmarks
//!
//! Sequential access benefits from the cached cursor; front inserts and
//! removes pay for the ripple across every segment.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mite_core::builtins::{int_new, list_append, list_get_item, list_insert, list_new, list_remove_index};
use mite_core::{Heap, HeapConfig, ObjRef};

fn setup_list(size: i32) -> (Heap, ObjRef) {
    let mut heap = Heap::new(HeapConfig::with_arena_bytes(65536)).unwrap();
    let list = list_new(&mut heap).unwrap();
    heap.push_root(list);
    for value in 0..size {
        let item = int_new(&mut heap, 100 + value).unwrap();
        list_append(&mut heap, list, item).unwrap();
    }
    (heap, list)
}

fn bench_sequential_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("sequential_get");

    for size in [64, 512, 2048].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let (heap, list) = setup_list(size);

            b.iter(|| {
                for index in 0..size as isize {
                    black_box(list_get_item(&heap, list, index).unwrap());
                }
            });
        });
    }

    group.finish();
}

fn bench_reverse_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("reverse_get");

    for size in [64, 512, 2048].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let (heap, list) = setup_list(size);

            b.iter(|| {
                for index in (0..size as isize).rev() {
                    black_box(list_get_item(&heap, list, index).unwrap());
                }
            });
        });
    }

    group.finish();
}

fn bench_front_insert_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("front_insert_remove");

    for size in [64, 512, 2048].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let (mut heap, list) = setup_list(size);
            let marker = heap.none();

            b.iter(|| {
                list_insert(&mut heap, list, 0, marker).unwrap();
                list_remove_index(&mut heap, list, 0).unwrap();
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_sequential_get,
    bench_reverse_get,
    bench_front_insert_remove,
);
criterion_main!(benches);
