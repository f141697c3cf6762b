use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use std::collections::BTreeMap;

use ordmap::{AvlMap, RedBlackMap, SkipListMap, SplayMap};

const N: usize = 10_000;

// ─── Helper functions to generate key sequences ─────────────────────────────

fn ordered_keys(n: usize) -> Vec<i64> {
    (0..n as i64).collect()
}

fn random_keys(n: usize) -> Vec<i64> {
    // Use a simple LCG for a deterministic pseudo-random sequence
    let mut keys = Vec::with_capacity(n);
    let mut x: u64 = 12345;
    for _ in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        keys.push((x >> 33) as i64);
    }
    keys
}

macro_rules! bench_insert {
    ($group:expr, $name:literal, $map:ty, $keys:expr) => {
        $group.bench_function(BenchmarkId::new($name, N), |b| {
            b.iter(|| {
                let mut map: $map = <$map>::default();
                for &k in $keys {
                    map.insert(k, k);
                }
                map
            });
        });
    };
}

// ─── Insertion ──────────────────────────────────────────────────────────────

fn bench_insert_ordered(c: &mut Criterion) {
    let keys = ordered_keys(N);
    let mut group = c.benchmark_group("insert_ordered");
    bench_insert!(group, "AvlMap", AvlMap<i64, i64>, &keys);
    bench_insert!(group, "RedBlackMap", RedBlackMap<i64, i64>, &keys);
    bench_insert!(group, "SplayMap", SplayMap<i64, i64>, &keys);
    bench_insert!(group, "SkipListMap", SkipListMap<i64, i64>, &keys);
    bench_insert!(group, "BTreeMap", BTreeMap<i64, i64>, &keys);
    group.finish();
}

fn bench_insert_random(c: &mut Criterion) {
    let keys = random_keys(N);
    let mut group = c.benchmark_group("insert_random");
    bench_insert!(group, "AvlMap", AvlMap<i64, i64>, &keys);
    bench_insert!(group, "RedBlackMap", RedBlackMap<i64, i64>, &keys);
    bench_insert!(group, "SplayMap", SplayMap<i64, i64>, &keys);
    bench_insert!(group, "SkipListMap", SkipListMap<i64, i64>, &keys);
    bench_insert!(group, "BTreeMap", BTreeMap<i64, i64>, &keys);
    group.finish();
}

// ─── Lookup ─────────────────────────────────────────────────────────────────

fn bench_lookup(c: &mut Criterion) {
    let keys = random_keys(N);
    let mut group = c.benchmark_group("lookup_random");

    let avl: AvlMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
    group.bench_function(BenchmarkId::new("AvlMap", N), |b| {
        b.iter(|| keys.iter().filter(|&k| avl.get(k).is_some()).count());
    });

    let red_black: RedBlackMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
    group.bench_function(BenchmarkId::new("RedBlackMap", N), |b| {
        b.iter(|| keys.iter().filter(|&k| red_black.get(k).is_some()).count());
    });

    // Splay lookups mutate the tree, so each run gets a fresh clone.
    let splay: SplayMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
    group.bench_function(BenchmarkId::new("SplayMap", N), |b| {
        b.iter_batched(
            || splay.clone(),
            |mut map| keys.iter().filter(|&k| map.get(k).is_some()).count(),
            BatchSize::LargeInput,
        );
    });

    let skip: SkipListMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
    group.bench_function(BenchmarkId::new("SkipListMap", N), |b| {
        b.iter(|| keys.iter().filter(|&k| skip.get(k).is_some()).count());
    });

    let btree: BTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| keys.iter().filter(|&k| btree.get(k).is_some()).count());
    });

    group.finish();
}

// ─── Removal ────────────────────────────────────────────────────────────────

macro_rules! bench_remove {
    ($group:expr, $name:literal, $map:ty, $keys:expr) => {
        let full: $map = $keys.iter().map(|&k| (k, k)).collect();
        $group.bench_function(BenchmarkId::new($name, N), |b| {
            b.iter_batched(
                || full.clone(),
                |mut map| {
                    for k in $keys {
                        map.remove(k);
                    }
                    map
                },
                BatchSize::LargeInput,
            );
        });
    };
}

fn bench_remove(c: &mut Criterion) {
    let keys = random_keys(N);
    let mut group = c.benchmark_group("remove_random");
    bench_remove!(group, "AvlMap", AvlMap<i64, i64>, &keys);
    bench_remove!(group, "RedBlackMap", RedBlackMap<i64, i64>, &keys);
    bench_remove!(group, "SplayMap", SplayMap<i64, i64>, &keys);
    bench_remove!(group, "SkipListMap", SkipListMap<i64, i64>, &keys);
    bench_remove!(group, "BTreeMap", BTreeMap<i64, i64>, &keys);
    group.finish();
}

criterion_group!(benches, bench_insert_ordered, bench_insert_random, bench_lookup, bench_remove);
criterion_main!(benches);
