use std::time::Instant;

use rand::Rng;
use serde::Serialize;

/// The classic O(n^2) exchange sort: every element is compared against everything after it.
pub fn bubble_sort<T: PartialOrd>(values: &mut [T]) {
    for i in 0..values.len() {
        for j in i + 1..values.len() {
            if values[i] > values[j] {
                values.swap(i, j);
            }
        }
    }
}

/// Quicksort using the middle element as the pivot. We always recurse into the smaller partition
/// and loop on the larger one so the call depth stays logarithmic.
pub fn quicksort<T: PartialOrd>(mut values: &mut [T]) {
    while values.len() > 1 {
        let pivot = partition(values);
        let (left, right) = std::mem::take(&mut values).split_at_mut(pivot);
        let right = &mut right[1..];
        if left.len() < right.len() {
            quicksort(left);
            values = right;
        } else {
            quicksort(right);
            values = left;
        }
    }
}

// Moves the middle element to the front, partitions everything smaller to its left, then drops
// it into its final position and returns that index.
fn partition<T: PartialOrd>(values: &mut [T]) -> usize {
    let middle = values.len() / 2;
    values.swap(0, middle);
    let mut store = 0;
    for i in 1..values.len() {
        if values[i] < values[0] {
            store += 1;
            values.swap(i, store);
        }
    }
    values.swap(0, store);
    store
}

pub fn is_sorted<T: PartialOrd>(values: &[T]) -> bool {
    values.windows(2).all(|w| w[0] <= w[1])
}

pub fn random_values<R: Rng>(rng: &mut R, n: usize, min: f64, max: f64) -> Vec<f64> {
    (0..n).map(|_| rng.gen::<f64>() * (max - min) + min).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortAlgorithm {
    Bubble,
    Quick,
}

impl SortAlgorithm {
    pub fn sort(self, values: &mut [f64]) {
        match self {
            SortAlgorithm::Bubble => bubble_sort(values),
            SortAlgorithm::Quick => quicksort(values),
        }
    }

    /// How much longer we expect a run to take when the input size doubles.
    pub const fn doubling_factor(self) -> f64 {
        match self {
            SortAlgorithm::Bubble => 4.0,
            SortAlgorithm::Quick => 2.0,
        }
    }

    pub const fn complexity(self) -> &'static str {
        match self {
            SortAlgorithm::Bubble => "O(n^2)",
            SortAlgorithm::Quick => "O(n log n)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SortTiming {
    pub n: usize,
    pub millis: f64,
    pub expected_millis: Option<f64>,
}

/// Times a single sort of `n` random values in `[0, 1)`. The result is checked so a broken sort
/// can't report a fast time.
pub fn time_sort<R: Rng>(algorithm: SortAlgorithm, n: usize, rng: &mut R) -> SortTiming {
    let mut values = random_values(rng, n, 0.0, 1.0);
    let start = Instant::now();
    algorithm.sort(&mut values);
    let millis = start.elapsed().as_secs_f64() * 1e3;
    debug_assert!(is_sorted(&values));
    SortTiming {
        n,
        millis,
        expected_millis: None,
    }
}

/// Times `rounds` sorts starting at `start` elements and doubling each round. Each row carries the
/// runtime predicted from the previous row so the growth rate can be eyeballed.
pub fn doubling_table<R: Rng>(
    algorithm: SortAlgorithm,
    start: usize,
    rounds: usize,
    rng: &mut R,
) -> Vec<SortTiming> {
    let mut expected = None;
    let mut n = start.max(1);
    let mut rows = Vec::with_capacity(rounds);
    for _ in 0..rounds {
        let mut timing = time_sort(algorithm, n, rng);
        timing.expected_millis = expected;
        log::debug!("sorted {} items in {:.3} ms", n, timing.millis);
        expected = Some(timing.millis * algorithm.doubling_factor());
        rows.push(timing);
        n = n.saturating_mul(2);
    }
    rows
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn is_sorted_edge_cases() {
        assert!(is_sorted::<i32>(&[]));
        assert!(is_sorted(&[1]));
        assert!(is_sorted(&[1, 2]));
        assert!(is_sorted(&[1, 1]));
        assert!(!is_sorted(&[2, 1]));
        assert!(!is_sorted(&[1, 3, 2]));
        assert!(is_sorted(&[1, 2, 3]));
    }

    #[test]
    fn sorts_agree_with_std() {
        let mut rng = ChaCha8Rng::seed_from_u64(220);
        for n in [0, 1, 2, 3, 17, 64, 500] {
            let values = random_values(&mut rng, n, -10.0, 10.0);
            let mut expected = values.clone();
            expected.sort_by(|a, b| a.partial_cmp(b).unwrap());

            let mut bubble = values.clone();
            bubble_sort(&mut bubble);
            assert_eq!(bubble, expected);

            let mut quick = values;
            quicksort(&mut quick);
            assert_eq!(quick, expected);
        }
    }

    #[test]
    fn quicksort_handles_duplicates_and_sorted_input() {
        let mut same = vec![4; 1_000];
        quicksort(&mut same);
        assert!(same.iter().all(|&v| v == 4));

        let mut ascending: Vec<u32> = (0..1_000).collect();
        quicksort(&mut ascending);
        assert!(is_sorted(&ascending));

        let mut descending: Vec<u32> = (0..1_000).rev().collect();
        quicksort(&mut descending);
        assert_eq!(descending, (0..1_000).collect::<Vec<_>>());
    }

    #[test]
    fn random_values_stay_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let values = random_values(&mut rng, 1_000, 2.0, 3.0);
        assert!(values.iter().all(|v| (2.0..3.0).contains(v)));
    }

    #[test]
    fn doubling_table_sizes() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let rows = doubling_table(SortAlgorithm::Quick, 8, 4, &mut rng);
        let sizes: Vec<usize> = rows.iter().map(|r| r.n).collect();
        assert_eq!(sizes, vec![8, 16, 32, 64]);
        assert!(rows[0].expected_millis.is_none());
        assert!(rows[1..].iter().all(|r| r.expected_millis.is_some()));
    }
}
