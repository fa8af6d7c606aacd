//! Benchmark for the three tree maps vs standard BTreeMap.
//!
//! Keys are inserted in a fixed scrambled order so that the plain binary
//! search tree is measured on a typical shape rather than a spine.

use arbormap::tree::{AvlTreeMap, BinarySearchTreeMap, SplayTreeMap};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::collections::BTreeMap;

const SIZES: [i32; 3] = [100, 1000, 10000];

/// A permutation of `0..size`; 7919 is prime and coprime to every size used.
fn scrambled(size: i32) -> impl Iterator<Item = i32> {
    (0..size).map(move |index| (index * 7919) % size)
}

// =============================================================================
// insert Benchmark
// =============================================================================

fn benchmark_insert(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("insert");

    for size in SIZES {
        group.bench_with_input(
            BenchmarkId::new("BinarySearchTreeMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut map = BinarySearchTreeMap::with_capacity(size as usize);
                    for key in scrambled(size) {
                        map.insert(black_box(key), black_box(key * 2));
                    }
                    black_box(map)
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("AvlTreeMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut map = AvlTreeMap::with_capacity(size as usize);
                    for key in scrambled(size) {
                        map.insert(black_box(key), black_box(key * 2));
                    }
                    black_box(map)
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("SplayTreeMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut map = SplayTreeMap::with_capacity(size as usize);
                    for key in scrambled(size) {
                        map.insert(black_box(key), black_box(key * 2));
                    }
                    black_box(map)
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("BTreeMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut map = BTreeMap::new();
                    for key in scrambled(size) {
                        map.insert(black_box(key), black_box(key * 2));
                    }
                    black_box(map)
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// get Benchmark
// =============================================================================

fn benchmark_get(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("get");

    for size in SIZES {
        // Prepare data
        let plain_map: BinarySearchTreeMap<i32, i32> =
            scrambled(size).map(|key| (key, key * 2)).collect();
        let avl_map: AvlTreeMap<i32, i32> = scrambled(size).map(|key| (key, key * 2)).collect();
        let mut splay_map: SplayTreeMap<i32, i32> =
            scrambled(size).map(|key| (key, key * 2)).collect();
        let standard_map: BTreeMap<i32, i32> = scrambled(size).map(|key| (key, key * 2)).collect();

        group.bench_with_input(
            BenchmarkId::new("BinarySearchTreeMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut sum = 0;
                    for key in 0..size {
                        if let Some(&value) = plain_map.get(&black_box(key)) {
                            sum += value;
                        }
                    }
                    black_box(sum)
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("AvlTreeMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut sum = 0;
                    for key in 0..size {
                        if let Some(&value) = avl_map.get(&black_box(key)) {
                            sum += value;
                        }
                    }
                    black_box(sum)
                });
            },
        );

        // Sequential access is the splay tree's best case.
        group.bench_with_input(
            BenchmarkId::new("SplayTreeMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut sum = 0;
                    for key in 0..size {
                        if let Some(&value) = splay_map.get(&black_box(key)) {
                            sum += value;
                        }
                    }
                    black_box(sum)
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("BTreeMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut sum = 0;
                    for key in 0..size {
                        if let Some(&value) = standard_map.get(&black_box(key)) {
                            sum += value;
                        }
                    }
                    black_box(sum)
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// remove Benchmark
// =============================================================================

fn benchmark_remove(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("remove");

    for size in SIZES {
        let plain_map: BinarySearchTreeMap<i32, i32> =
            scrambled(size).map(|key| (key, key * 2)).collect();
        let avl_map: AvlTreeMap<i32, i32> = scrambled(size).map(|key| (key, key * 2)).collect();
        let splay_map: SplayTreeMap<i32, i32> =
            scrambled(size).map(|key| (key, key * 2)).collect();
        let standard_map: BTreeMap<i32, i32> = scrambled(size).map(|key| (key, key * 2)).collect();

        group.bench_with_input(
            BenchmarkId::new("BinarySearchTreeMap", size),
            &size,
            |bencher, &size| {
                bencher.iter_batched(
                    || plain_map.clone(),
                    |mut map| {
                        for key in 0..size {
                            map.remove(&black_box(key));
                        }
                        map
                    },
                    criterion::BatchSize::SmallInput,
                );
            },
        );

        group.bench_with_input(
            BenchmarkId::new("AvlTreeMap", size),
            &size,
            |bencher, &size| {
                bencher.iter_batched(
                    || avl_map.clone(),
                    |mut map| {
                        for key in 0..size {
                            map.remove(&black_box(key));
                        }
                        map
                    },
                    criterion::BatchSize::SmallInput,
                );
            },
        );

        group.bench_with_input(
            BenchmarkId::new("SplayTreeMap", size),
            &size,
            |bencher, &size| {
                bencher.iter_batched(
                    || splay_map.clone(),
                    |mut map| {
                        for key in 0..size {
                            map.remove(&black_box(key));
                        }
                        map
                    },
                    criterion::BatchSize::SmallInput,
                );
            },
        );

        group.bench_with_input(
            BenchmarkId::new("BTreeMap", size),
            &size,
            |bencher, &size| {
                bencher.iter_batched(
                    || standard_map.clone(),
                    |mut map| {
                        for key in 0..size {
                            map.remove(&black_box(key));
                        }
                        map
                    },
                    criterion::BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

// =============================================================================
// iteration Benchmark
// =============================================================================

fn benchmark_iteration(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("iteration");

    for size in SIZES {
        let avl_map: AvlTreeMap<i32, i32> = scrambled(size).map(|key| (key, key * 2)).collect();
        let standard_map: BTreeMap<i32, i32> = scrambled(size).map(|key| (key, key * 2)).collect();

        group.bench_with_input(BenchmarkId::new("AvlTreeMap", size), &size, |bencher, _| {
            bencher.iter(|| {
                let sum: i32 = avl_map.iter().map(|(_, &value)| value).sum();
                black_box(sum)
            });
        });

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &size, |bencher, _| {
            bencher.iter(|| {
                let sum: i32 = standard_map.iter().map(|(_, &value)| value).sum();
                black_box(sum)
            });
        });
    }

    group.finish();
}

// =============================================================================
// Criterion Group and Main
// =============================================================================

criterion_group!(
    benches,
    benchmark_insert,
    benchmark_get,
    benchmark_remove,
    benchmark_iteration
);

criterion_main!(benches);
