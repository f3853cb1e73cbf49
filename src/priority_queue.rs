use std::fmt;

/// A binary max-heap stored in a `Vec`. The greatest element by `Ord` is always at the front; wrap
/// elements in a type with a reversed `Ord` (or `std::cmp::Reverse`) to get min-first ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityQueue<T> {
    elements: Vec<T>,
}

impl<T> Default for PriorityQueue<T> {
    fn default() -> Self {
        PriorityQueue {
            elements: Vec::new(),
        }
    }
}

const fn parent(i: usize) -> usize {
    (i - 1) / 2
}

const fn left(i: usize) -> usize {
    i * 2 + 1
}

const fn right(i: usize) -> usize {
    i * 2 + 2
}

impl<T: Ord> PriorityQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        PriorityQueue {
            elements: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn push(&mut self, value: T) {
        self.elements.push(value);
        self.sift_up(self.elements.len() - 1);
    }

    pub fn peek(&self) -> Option<&T> {
        self.elements.first()
    }

    /// Removes the greatest element. The last leaf takes the root's place and sinks back down.
    pub fn pop(&mut self) -> Option<T> {
        if self.elements.is_empty() {
            return None;
        }
        let top = self.elements.swap_remove(0);
        if !self.elements.is_empty() {
            self.sift_down(0);
        }
        Some(top)
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// Elements in heap (storage) order, not priority order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.elements.iter()
    }

    /// Consumes the queue, returning its elements in ascending order.
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut sorted = Vec::with_capacity(self.len());
        while let Some(v) = self.pop() {
            sorted.push(v);
        }
        sorted.reverse();
        sorted
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 && self.elements[i] > self.elements[parent(i)] {
            self.elements.swap(i, parent(i));
            i = parent(i);
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let n = self.elements.len();
        loop {
            let mut largest = i;
            if left(i) < n && self.elements[left(i)] > self.elements[largest] {
                largest = left(i);
            }
            if right(i) < n && self.elements[right(i)] > self.elements[largest] {
                largest = right(i);
            }
            if largest == i {
                break;
            }
            self.elements.swap(i, largest);
            i = largest;
        }
    }

    #[cfg(test)]
    fn is_heap(&self) -> bool {
        (1..self.elements.len()).all(|i| self.elements[parent(i)] >= self.elements[i])
    }
}

impl<T: Ord> FromIterator<T> for PriorityQueue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut queue = PriorityQueue::new();
        queue.extend(iter);
        queue
    }
}

impl<T: Ord> Extend<T> for PriorityQueue<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        iter.into_iter().for_each(|v| self.push(v));
    }
}

impl<T: fmt::Display> fmt::Display for PriorityQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.elements.split_first() {
            None => write!(f, "[]"),
            Some((first, rest)) => {
                write!(f, "[ {}", first)?;
                for v in rest {
                    write!(f, ", {}", v)?;
                }
                write!(f, " ]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Reverse;

    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn pops_in_descending_order() {
        let mut queue: PriorityQueue<i32> = [5, 1, 8, 3, 9, 2, 8].into_iter().collect();
        assert_eq!(queue.len(), 7);
        assert_eq!(queue.peek(), Some(&9));
        let mut popped = Vec::new();
        while let Some(v) = queue.pop() {
            assert!(queue.is_heap());
            popped.push(v);
        }
        assert_eq!(popped, vec![9, 8, 8, 5, 3, 2, 1]);
        assert!(queue.is_empty());
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn heap_invariant_under_random_ops() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut queue = PriorityQueue::new();
        let mut mirror: Vec<u32> = Vec::new();
        for _ in 0..2_000 {
            if rng.gen_bool(0.6) {
                let v = rng.gen_range(0..100);
                queue.push(v);
                mirror.push(v);
            } else {
                mirror.sort_unstable();
                assert_eq!(queue.pop(), mirror.pop());
            }
            assert!(queue.is_heap());
            assert_eq!(queue.len(), mirror.len());
        }
    }

    #[test]
    fn reverse_gives_min_heap() {
        let queue: PriorityQueue<Reverse<u8>> = [4, 2, 7].into_iter().map(Reverse).collect();
        assert_eq!(queue.peek(), Some(&Reverse(2)));
    }

    #[test]
    fn sorted_vec_and_clear() {
        let queue: PriorityQueue<u8> = [3, 1, 2].into_iter().collect();
        let mut copy = queue.clone();
        assert_eq!(queue.into_sorted_vec(), vec![1, 2, 3]);
        copy.clear();
        assert!(copy.is_empty());
    }

    #[test]
    fn display() {
        let mut queue = PriorityQueue::new();
        assert_eq!(queue.to_string(), "[]");
        queue.push(1);
        assert_eq!(queue.to_string(), "[ 1 ]");
        queue.push(2);
        assert_eq!(queue.to_string(), "[ 2, 1 ]");
    }
}
