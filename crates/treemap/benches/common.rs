use std::hint::black_box;
use std::time::{Duration, Instant};

use bench::{apply_medium_runtime_config, apply_small_runtime_config, distinct_keys, seeded_rng};
use criterion::measurement::Measurement;
use criterion::{BenchmarkGroup, BenchmarkId};
use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use treemap::{NaturalOrder, OrderedMap, RbTree, StdBTreeMap};

const SIZES: [usize; 4] = [1_000, 16_000, 64_000, 256_000];
const OPS_PER_ITER: usize = 200;
const FIND_HIT_RATE_PERCENT: u64 = 80;

#[derive(Clone, Copy)]
enum Op {
    Find { key: u64 },
    Add { key: u64, value: u64 },
    Delete { key: u64 },
}

fn rb_tree() -> RbTree<u64, u64> {
    RbTree::new(NaturalOrder)
}

fn build<M: OrderedMap<Key = u64, Value = u64>>(
    empty: fn() -> M,
    keys: &[u64],
    rng: &mut StdRng,
) -> M {
    let mut map = empty();
    for &k in keys {
        black_box(map.add(k, rng.random()).is_ok());
    }
    map
}

fn run_ops<M: OrderedMap<Key = u64, Value = u64>>(map: &mut M, ops: &[Op]) {
    for op in ops {
        match *op {
            Op::Find { key } => {
                black_box(map.find(&key).ok().copied());
            }
            Op::Add { key, value } => {
                black_box(map.add(key, value).is_ok());
            }
            Op::Delete { key } => {
                black_box(map.delete(&key));
            }
        }
    }
}

fn pick_find(keys: &[u64], rng: &mut StdRng) -> Op {
    let hit = rng.random_range(0..100) < FIND_HIT_RATE_PERCENT;
    let key = if hit {
        keys[rng.random_range(0..keys.len())]
    } else {
        rng.random()
    };
    Op::Find { key }
}

fn read_ops(keys: &[u64], rng: &mut StdRng) -> Vec<Op> {
    (0..OPS_PER_ITER).map(|_| pick_find(keys, rng)).collect()
}

/// 80% finds; every add is paired with a later delete of the same key so
/// the map size stays stable across iterations.
fn mixed_ops(keys: &[u64], rng: &mut StdRng) -> Vec<Op> {
    let mut ops = Vec::with_capacity(OPS_PER_ITER);
    let mut pending = Vec::new();
    while ops.len() < OPS_PER_ITER {
        let left = OPS_PER_ITER - ops.len();
        if pending.len() >= left {
            ops.push(Op::Delete {
                key: pending.pop().unwrap_or_default(),
            });
            continue;
        }
        match rng.random_range(0..10) {
            0 => {
                let key: u64 = rng.random::<u64>() | 1;
                pending.push(key);
                ops.push(Op::Add { key, value: key });
            }
            1 if !pending.is_empty() => {
                let idx = rng.random_range(0..pending.len());
                ops.push(Op::Delete {
                    key: pending.swap_remove(idx),
                });
            }
            _ => ops.push(pick_find(keys, rng)),
        }
    }
    ops
}

fn bench_workload<M, T, F>(
    group: &mut BenchmarkGroup<'_, T>,
    label: &str,
    empty: fn() -> M,
    workload: u64,
    make_ops: F,
) where
    T: Measurement<Value = Duration>,
    M: OrderedMap<Key = u64, Value = u64>,
    F: Fn(&[u64], &mut StdRng) -> Vec<Op>,
{
    for &size in &SIZES {
        apply_small_runtime_config(group);
        let mut rng = seeded_rng(workload ^ size as u64);
        // Even keys only, so the odd keys added by mixed workloads are fresh.
        let keys: Vec<u64> = distinct_keys(&mut rng, size)
            .into_iter()
            .map(|k| k & !1)
            .collect();
        let mut map = build(empty, &keys, &mut rng);

        group.bench_function(BenchmarkId::new(label, size), |bencher| {
            bencher.iter_custom(|iters| {
                let mut total = Duration::ZERO;
                for _ in 0..iters {
                    let ops = make_ops(&keys, &mut rng);
                    let start = Instant::now();
                    run_ops(&mut map, &ops);
                    black_box(map.size());
                    total += start.elapsed();
                }
                total
            })
        });
    }
}

/// Builds a full map and deletes every key in random order.
fn bench_churn<M, T>(group: &mut BenchmarkGroup<'_, T>, label: &str, empty: fn() -> M)
where
    T: Measurement<Value = Duration>,
    M: OrderedMap<Key = u64, Value = u64>,
{
    for &size in &SIZES[..2] {
        apply_medium_runtime_config(group);
        let mut rng = seeded_rng(3 ^ size as u64);
        let keys = distinct_keys(&mut rng, size);

        group.bench_function(BenchmarkId::new(label, size), |bencher| {
            bencher.iter_custom(|iters| {
                let mut total = Duration::ZERO;
                for _ in 0..iters {
                    let mut order = keys.clone();
                    order.shuffle(&mut rng);
                    let start = Instant::now();
                    let mut map = build(empty, &keys, &mut rng);
                    for &k in &order {
                        black_box(map.delete(k));
                    }
                    total += start.elapsed();
                }
                total
            })
        });
    }
}

pub fn bench_all_read<T>(group: &mut BenchmarkGroup<'_, T>)
where
    T: Measurement<Value = Duration>,
{
    bench_workload(group, "rb_tree", rb_tree, 1, read_ops);
    bench_workload(group, "std_btree", StdBTreeMap::<u64, u64>::new, 1, read_ops);
}

pub fn bench_all_mixed<T>(group: &mut BenchmarkGroup<'_, T>)
where
    T: Measurement<Value = Duration>,
{
    bench_workload(group, "rb_tree", rb_tree, 2, mixed_ops);
    bench_workload(group, "std_btree", StdBTreeMap::<u64, u64>::new, 2, mixed_ops);
}

pub fn bench_all_churn<T>(group: &mut BenchmarkGroup<'_, T>)
where
    T: Measurement<Value = Duration>,
{
    bench_churn(group, "rb_tree", rb_tree);
    bench_churn(group, "std_btree", StdBTreeMap::<u64, u64>::new);
}
