use comp220::{
    array::SortableArray,
    sorting::{bubble_sort, quicksort, random_values},
};

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn sorts(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(0x4FA7905BF65E7E9D);
    let mut group = c.benchmark_group("Sort");
    group.sample_size(30);

    for n in [256, 1_024, 4_096] {
        let values = random_values(&mut rng, n, 0.0, 1.0);
        group.bench_with_input(BenchmarkId::new("Bubble", n), &values, |b, values| {
            b.iter_batched_ref(
                || values.clone(),
                |v| bubble_sort(v),
                criterion::BatchSize::SmallInput,
            )
        });
        group.bench_with_input(BenchmarkId::new("Quick", n), &values, |b, values| {
            b.iter_batched_ref(
                || values.clone(),
                |v| quicksort(v),
                criterion::BatchSize::SmallInput,
            )
        });
    }
    group.finish();

    let values = random_values(&mut rng, 10_000, 0.0, 1.0);
    c.bench_function("SortableArray 10000", |b| {
        b.iter_batched_ref(
            || {
                let mut array = SortableArray::new();
                for (i, &v) in values.iter().enumerate() {
                    array[i as isize] = v;
                }
                array
            },
            |array| array.sort(values.len()),
            criterion::BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, sorts);
criterion_main!(benches);
