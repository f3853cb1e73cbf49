use std::{
    borrow::Borrow,
    collections::hash_map::DefaultHasher,
    fmt,
    hash::{Hash, Hasher},
};

use crate::{assoc::AssociativeArray, constants::*};

/// A plain function pointer so callers can plug in a hash that suits their keys (or a deliberately
/// terrible one to exercise collisions).
pub type HashFn<K> = fn(&K) -> usize;

/// Hashes with the standard library's SipHash.
pub fn std_hash<K: Hash>(key: &K) -> usize {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    hasher.finish() as usize
}

/// Collision statistics for the current layout. `collisions` counts entries that aren't sitting in
/// their home slot, `total_distance` sums how far each of them was displaced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProbeStats {
    pub collisions: usize,
    pub total_distance: usize,
}

/// An open-addressing hashtable with linear probing.
///
/// Entries live densely in `entries`; `slots` is the probe table and stores indexes into it. This
/// keeps iteration cheap no matter how sparse the table is and lets us hand out `&mut V` without
/// re-probing. Removal uses backward-shift deletion, so no tombstones are needed and every key
/// stays reachable from its home slot.
#[derive(Clone)]
pub struct HashTable<K, V> {
    hash_fn: HashFn<K>,
    entries: Vec<(K, V)>,
    slots: Vec<Option<usize>>,
    load_factor: f64,
}

enum Probe {
    Found { slot: usize, entry: usize },
    Vacant(usize),
    Full,
}

impl<K: Hash + Eq, V> Default for HashTable<K, V> {
    fn default() -> Self {
        HashTable::new(std_hash::<K>)
    }
}

impl<K: Eq, V> HashTable<K, V> {
    pub fn new(hash_fn: HashFn<K>) -> Self {
        Self::with_capacity(hash_fn, 0, DEFAULT_LOAD_FACTOR)
    }

    pub fn with_capacity(hash_fn: HashFn<K>, capacity: usize, load_factor: f64) -> Self {
        let load_factor = load_factor.clamp(MIN_LOAD_FACTOR, MAX_LOAD_FACTOR);
        HashTable {
            hash_fn,
            entries: Vec::new(),
            slots: vec![None; capacity],
            load_factor,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn load_factor(&self) -> f64 {
        self.load_factor
    }

    /// Changes the load factor (clamped to `[0.1, 0.99]`) and shrinks or grows the table to the
    /// smallest power of two that fits the current entries.
    pub fn set_load_factor(&mut self, load_factor: f64) {
        let load_factor = load_factor.clamp(MIN_LOAD_FACTOR, MAX_LOAD_FACTOR);
        if load_factor != self.load_factor {
            self.load_factor = load_factor;
            self.resize(1);
        }
    }

    /// Rebuilds the probe table with at least `size` slots, doubling until every entry plus one
    /// more insert fits under the load factor.
    pub fn resize(&mut self, size: usize) {
        let mut size = size.max(1);
        while (self.entries.len() + 1) as f64 >= size as f64 * self.load_factor {
            size *= 2;
        }
        log::debug!(
            "resizing hashtable {} => {} ({} entries)",
            self.slots.len(),
            size,
            self.entries.len()
        );
        self.slots = vec![None; size];
        for e in 0..self.entries.len() {
            let mut i = (self.hash_fn)(&self.entries[e].0) % size;
            while self.slots[i].is_some() {
                i = (i + 1) % size;
            }
            self.slots[i] = Some(e);
        }
    }

    /// Rehashes every entry in place.
    pub fn reinsert(&mut self) {
        self.resize(self.capacity());
    }

    /// Drops every entry but keeps the current capacity.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.slots.iter_mut().for_each(|s| *s = None);
    }

    fn home(&self, key: &K) -> usize {
        (self.hash_fn)(key) % self.slots.len()
    }

    // Whether one more entry would reach the load factor.
    fn is_full(&self) -> bool {
        (self.entries.len() + 1) as f64 >= self.slots.len() as f64 * self.load_factor
    }

    fn locate(&self, key: &K) -> Probe {
        self.locate_hashed((self.hash_fn)(key), key)
    }

    fn locate_hashed<Q>(&self, hash: usize, key: &Q) -> Probe
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        let cap = self.slots.len();
        if cap == 0 {
            return Probe::Full;
        }
        let mut i = hash % cap;
        for _ in 0..cap {
            match self.slots[i] {
                Some(e) if self.entries[e].0.borrow() == key => {
                    return Probe::Found { slot: i, entry: e }
                }
                Some(_) => i = (i + 1) % cap,
                None => return Probe::Vacant(i),
            }
        }
        Probe::Full
    }

    // Returns the entry index for `key` and whether it was newly inserted.
    fn insert_full(&mut self, key: K, value: V) -> (usize, bool) {
        if let Probe::Found { entry, .. } = self.locate(&key) {
            self.entries[entry].1 = value;
            return (entry, false);
        }
        if self.is_full() {
            self.resize(self.slots.len() * 2);
        }
        loop {
            match self.locate(&key) {
                Probe::Vacant(slot) => {
                    let entry = self.entries.len();
                    self.slots[slot] = Some(entry);
                    self.entries.push((key, value));
                    return (entry, true);
                }
                _ => self.resize(self.slots.len() * 2),
            }
        }
    }

    pub fn insert(&mut self, key: K, value: V) -> bool {
        self.insert_full(key, value).1
    }

    pub fn entry(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        let entry = match self.locate(&key) {
            Probe::Found { entry, .. } => entry,
            _ => self.insert_full(key, V::default()).0,
        };
        &mut self.entries[entry].1
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        match self.locate(key) {
            Probe::Found { entry, .. } => Some(&self.entries[entry].1),
            _ => None,
        }
    }

    /// Looks up a key by a borrowed form, e.g. a `&str` in a table of `String`s, without building
    /// an owned key. `hash` must be what the table's hash function returns for the owned key.
    pub fn get_hashed<Q>(&self, hash: usize, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        match self.locate_hashed(hash, key) {
            Probe::Found { entry, .. } => Some(&self.entries[entry].1),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        match self.locate(key) {
            Probe::Found { entry, .. } => Some(&mut self.entries[entry].1),
            _ => None,
        }
    }

    pub fn contains_key(&self, key: &K) -> bool {
        matches!(self.locate(key), Probe::Found { .. })
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        let Probe::Found { slot, entry } = self.locate(key) else {
            return None;
        };
        self.slots[slot] = None;
        self.shift_back(slot);

        // swap_remove moves the last entry into `entry`, so repoint its slot first.
        let last = self.entries.len() - 1;
        if entry != last {
            if let Probe::Found { slot: moved, .. } = self.locate(&self.entries[last].0) {
                self.slots[moved] = Some(entry);
            }
        }
        Some(self.entries.swap_remove(entry).1)
    }

    // Backward-shift deletion: walk the cluster after the hole and pull back every entry whose
    // probe path crosses it.
    fn shift_back(&mut self, mut hole: usize) {
        let cap = self.slots.len();
        let mut i = (hole + 1) % cap;
        while let Some(e) = self.slots[i] {
            let home = self.home(&self.entries[e].0);
            let dist_to_i = (i + cap - home) % cap;
            let dist_to_hole = (hole + cap - home) % cap;
            if dist_to_hole < dist_to_i {
                self.slots[hole] = Some(e);
                self.slots[i] = None;
                hole = i;
            }
            i = (i + 1) % cap;
        }
    }

    pub fn stats(&self) -> ProbeStats {
        let cap = self.slots.len();
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.map(|e| (i, e)))
            .fold(ProbeStats::default(), |mut acc, (i, e)| {
                let distance = (i + cap - self.home(&self.entries[e].0)) % cap;
                if distance > 0 {
                    acc.collisions += 1;
                    acc.total_distance += distance;
                }
                acc
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&K, &mut V)> + '_ {
        self.entries.iter_mut().map(|(k, v)| (&*k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn into_entries(self) -> Vec<(K, V)> {
        self.entries
    }
}

impl<K: Eq, V> AssociativeArray<K, V> for HashTable<K, V> {
    fn get(&self, key: &K) -> Option<&V> {
        HashTable::get(self, key)
    }

    fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        HashTable::get_mut(self, key)
    }

    fn entry(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        HashTable::entry(self, key)
    }

    fn insert(&mut self, key: K, value: V) -> bool {
        HashTable::insert(self, key, value)
    }

    fn contains_key(&self, key: &K) -> bool {
        HashTable::contains_key(self, key)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        HashTable::remove(self, key)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        HashTable::clear(self)
    }

    fn keys(&self) -> Vec<&K> {
        HashTable::keys(self).collect()
    }
}

impl<K: Hash + Eq, V> FromIterator<(K, V)> for HashTable<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = HashTable::default();
        iter.into_iter().for_each(|(k, v)| {
            table.insert(k, v);
        });
        table
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for HashTable<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(k, v)| (k, v)))
            .finish()
    }
}

impl<K: Eq, V> fmt::Display for HashTable<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.stats();
        let rate = match self.capacity() {
            0 => 0.0,
            cap => stats.collisions as f64 / cap as f64,
        };
        let dist = match stats.collisions {
            0 => 0.0,
            n => stats.total_distance as f64 / n as f64,
        };
        write!(
            f,
            "HashTable {{ size = {}, collision-rate {:.3}, collision-dist {:.3}, capacity = {} }}",
            self.len(),
            rate,
            dist,
            self.capacity()
        )
    }
}
