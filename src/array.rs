use std::ops::{Deref, DerefMut, Index, IndexMut};

use crate::{constants::*, sorting::quicksort};

/// A fixed-capacity array with non-panicking bounds checks. Reads outside `0..N` see
/// `T::default()`; writes outside `0..N` land in a scratch slot that is reset on every access,
/// so they are silently discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticArray<T, const N: usize> {
    data: [T; N],
    default: T,
    scratch: T,
}

impl<T: Default, const N: usize> Default for StaticArray<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Default, const N: usize> StaticArray<T, N> {
    pub fn new() -> Self {
        StaticArray {
            data: std::array::from_fn(|_| T::default()),
            default: T::default(),
            scratch: T::default(),
        }
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn get(&self, i: isize) -> &T {
        usize::try_from(i)
            .ok()
            .and_then(|i| self.data.get(i))
            .unwrap_or(&self.default)
    }

    pub fn get_mut(&mut self, i: isize) -> &mut T {
        match usize::try_from(i) {
            Ok(i) if i < N => &mut self.data[i],
            _ => {
                self.scratch = T::default();
                &mut self.scratch
            }
        }
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

impl<T: Default, const N: usize> Index<isize> for StaticArray<T, N> {
    type Output = T;

    fn index(&self, i: isize) -> &Self::Output {
        self.get(i)
    }
}

impl<T: Default, const N: usize> IndexMut<isize> for StaticArray<T, N> {
    fn index_mut(&mut self, i: isize) -> &mut Self::Output {
        self.get_mut(i)
    }
}

/// A growable array. Writing past the end grows the array to the next power of two that can hold
/// the index, so callers can treat it as an unbounded sparse table of defaults. Negative indexes
/// behave like `StaticArray`'s out-of-range slots.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicArray<T> {
    data: Vec<T>,
    default: T,
    scratch: T,
}

impl<T: Default> Default for DynamicArray<T> {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_DYNAMIC_CAPACITY)
    }
}

impl<T: Default> DynamicArray<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let mut data = Vec::with_capacity(capacity);
        data.resize_with(capacity, T::default);
        DynamicArray {
            data,
            default: T::default(),
            scratch: T::default(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Grows the array to at least `cap` slots (and never fewer than `MIN_DYNAMIC_CAPACITY`).
    /// Shrinking requests are ignored.
    pub fn set_capacity(&mut self, cap: usize) {
        let cap = cap.max(MIN_DYNAMIC_CAPACITY);
        if cap > self.data.len() {
            log::trace!("growing array {} => {}", self.data.len(), cap);
            self.data.resize_with(cap, T::default);
        }
    }

    fn try_grow(&mut self, cap: usize) -> bool {
        let extra = cap.saturating_sub(self.data.len());
        if let Err(e) = self.data.try_reserve_exact(extra) {
            log::warn!("cannot grow array to {} slots: {}", cap, e);
            return false;
        }
        self.set_capacity(cap);
        true
    }

    pub fn get(&self, i: isize) -> &T {
        usize::try_from(i)
            .ok()
            .and_then(|i| self.data.get(i))
            .unwrap_or(&self.default)
    }

    pub fn get_mut(&mut self, i: isize) -> &mut T {
        let Ok(i) = usize::try_from(i) else {
            self.scratch = T::default();
            return &mut self.scratch;
        };
        if i >= self.data.len() {
            // Indexes too large to allocate for behave like negative ones.
            let grown = i
                .checked_add(1)
                .and_then(usize::checked_next_power_of_two)
                .is_some_and(|cap| self.try_grow(cap));
            if !grown {
                self.scratch = T::default();
                return &mut self.scratch;
            }
        }
        &mut self.data[i]
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }
}

impl<T: Default> Index<isize> for DynamicArray<T> {
    type Output = T;

    fn index(&self, i: isize) -> &Self::Output {
        self.get(i)
    }
}

impl<T: Default> IndexMut<isize> for DynamicArray<T> {
    fn index_mut(&mut self, i: isize) -> &mut Self::Output {
        self.get_mut(i)
    }
}

/// A `DynamicArray` that can sort a prefix of itself in place.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SortableArray<T>(DynamicArray<T>);

impl<T: Default + PartialOrd> SortableArray<T> {
    pub fn new() -> Self {
        SortableArray(DynamicArray::new())
    }

    /// Sorts `[0, upper_bound)` ascending, clamping the bound to the current capacity. Slots past
    /// the bound are left untouched.
    pub fn sort(&mut self, upper_bound: usize) {
        let bound = upper_bound.min(self.0.capacity());
        quicksort(&mut self.0.as_mut_slice()[..bound]);
    }
}

impl<T> Deref for SortableArray<T> {
    type Target = DynamicArray<T>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> DerefMut for SortableArray<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_array_bounds() {
        let mut array: StaticArray<i32, 100> = StaticArray::new();
        assert_eq!(array.capacity(), 100);
        array[0] = 12;
        array[99] = 24;
        assert_eq!(array[0], 12);
        assert_eq!(array[99], 24);

        array[100] = 5;
        array[-1] = 5;
        assert_eq!(array[100], 0);
        assert_eq!(array[-1], 0);
        assert_eq!(array[isize::MAX], 0);
        // A discarded write doesn't leak into the next out-of-range write either.
        assert_eq!(*array.get_mut(1_000), 0);
    }

    #[test]
    fn static_array_clone_is_deep() {
        let mut a: StaticArray<String, 4> = StaticArray::new();
        a[1] = "one".to_string();
        let mut b = a.clone();
        b[1].push('!');
        assert_eq!(a[1], "one");
        assert_eq!(b[1], "one!");
    }

    #[test]
    fn dynamic_array_grows_to_power_of_two() {
        let mut array: DynamicArray<u32> = DynamicArray::new();
        assert_eq!(array.capacity(), 2);
        array[1] = 1;
        array[10] = 10;
        assert_eq!(array.capacity(), 16);
        array[100] = 100;
        assert_eq!(array.capacity(), 128);
        assert_eq!(array[1], 1);
        assert_eq!(array[10], 10);
        assert_eq!(array[100], 100);
        assert_eq!(array[50], 0);
    }

    #[test]
    fn dynamic_array_reads_never_grow() {
        let array: DynamicArray<u32> = DynamicArray::with_capacity(4);
        assert_eq!(array[1_000], 0);
        assert_eq!(array[-3], 0);
        assert_eq!(array.capacity(), 4);
    }

    #[test]
    fn dynamic_array_negative_writes_are_discarded() {
        let mut array: DynamicArray<u32> = DynamicArray::new();
        array[-1] = 7;
        assert_eq!(array[-1], 0);
        assert_eq!(*array.get_mut(-1), 0);
        assert_eq!(array.capacity(), 2);
    }

    #[test]
    fn dynamic_array_huge_index_is_discarded() {
        let mut array: DynamicArray<u32> = DynamicArray::new();
        array[isize::MAX] = 9;
        assert_eq!(array[isize::MAX], 0);
        assert_eq!(*array.get_mut(isize::MAX), 0);
        assert_eq!(array.capacity(), 2);
    }

    #[test]
    fn set_capacity_only_grows() {
        let mut array: DynamicArray<u8> = DynamicArray::with_capacity(0);
        array.set_capacity(3);
        assert_eq!(array.capacity(), 10);
        array[9] = 9;
        array.set_capacity(5);
        assert_eq!(array.capacity(), 10);
        array.set_capacity(40);
        assert_eq!(array.capacity(), 40);
        assert_eq!(array[9], 9);
    }

    #[test]
    fn sortable_array_sorts_prefix() {
        let mut array: SortableArray<i32> = SortableArray::new();
        for (i, v) in [5, 3, 9, 1, 7, 2].into_iter().enumerate() {
            array[i as isize] = v;
        }
        array[6] = -1;
        array.sort(4);
        assert_eq!(&array.as_slice()[..7], &[1, 3, 5, 9, 7, 2, -1]);

        array.sort(usize::MAX);
        let sorted = array.as_slice();
        assert!(sorted.windows(2).all(|w| w[0] <= w[1]));
    }
}
