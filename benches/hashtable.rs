use std::collections::HashMap;

use comp220::{assoc::ListMap, assoc::AssociativeArray, hashtable::HashTable};

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

fn random_keys(n: usize) -> Vec<u64> {
    let mut rng = ChaCha8Rng::seed_from_u64(0x4FA7905BF65E7E9D);
    (0..n).map(|_| rng.gen()).collect()
}

fn inserts(c: &mut Criterion) {
    let mut group = c.benchmark_group("Insert");
    for n in [100, 1_000, 10_000] {
        let keys = random_keys(n);
        group.bench_with_input(BenchmarkId::new("HashTable", n), &keys, |b, keys| {
            b.iter(|| {
                let mut table: HashTable<u64, u64> = HashTable::default();
                for &k in keys {
                    table.insert(k, k);
                }
                table.len()
            })
        });
        group.bench_with_input(BenchmarkId::new("std HashMap", n), &keys, |b, keys| {
            b.iter(|| {
                let mut map: HashMap<u64, u64> = HashMap::new();
                for &k in keys {
                    map.insert(k, k);
                }
                map.len()
            })
        });
    }
    group.finish();
}

fn lookups(c: &mut Criterion) {
    let keys = random_keys(1_000);
    let table: HashTable<u64, u64> = keys.iter().map(|&k| (k, k)).collect();
    let list: ListMap<u64, u64> = keys.iter().take(100).map(|&k| (k, k)).collect();

    c.bench_function("HashTable Lookup 1000", |b| {
        b.iter(|| keys.iter().filter(|k| table.contains_key(black_box(k))).count())
    });

    c.bench_function("ListMap Lookup 100", |b| {
        b.iter(|| {
            keys.iter()
                .take(100)
                .filter(|k| AssociativeArray::get(&list, black_box(k)).is_some())
                .count()
        })
    });

    c.bench_function("HashTable Remove And Reinsert", |b| {
        b.iter_batched_ref(
            || table.clone(),
            |table| {
                for k in keys.iter().step_by(3) {
                    table.remove(k);
                }
                table.len()
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, inserts, lookups);
criterion_main!(benches);
