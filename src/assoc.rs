/// The common interface of our key/value containers. `entry` mirrors the subscript-and-assign
/// style the reports rely on: `*counts.entry(key) += 1` inserts a default value the first time a
/// key is seen.
pub trait AssociativeArray<K, V> {
    fn get(&self, key: &K) -> Option<&V>;

    fn get_mut(&mut self, key: &K) -> Option<&mut V>;

    /// Returns the value for `key`, inserting `V::default()` first if it is missing.
    fn entry(&mut self, key: K) -> &mut V
    where
        V: Default;

    /// Inserts or overwrites a value. Returns true if the key was not present before.
    fn insert(&mut self, key: K, value: V) -> bool;

    fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    fn remove(&mut self, key: &K) -> Option<V>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn clear(&mut self);

    fn keys(&self) -> Vec<&K>;
}

/// An associative array backed by a singly linked list. Lookups are linear, which is fine for the
/// handful of keys it is used with, and keys only need `PartialEq`. Keys are kept in insertion
/// order.
pub struct ListMap<K, V> {
    head: Option<Box<Node<K, V>>>,
    len: usize,
}

struct Node<K, V> {
    key: K,
    value: V,
    next: Option<Box<Node<K, V>>>,
}

impl<K, V> Default for ListMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> ListMap<K, V> {
    pub const fn new() -> Self {
        ListMap { head: None, len: 0 }
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            next: self.head.as_deref(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            next: self.head.as_deref_mut(),
        }
    }
}

impl<K: PartialEq, V> ListMap<K, V> {
    fn position(&self, key: &K) -> Option<usize> {
        self.iter().position(|(k, _)| k == key)
    }

    // Appends a node at the tail and hands back its value.
    fn push_back(&mut self, key: K, value: V) -> &mut V {
        let mut cur = &mut self.head;
        while let Some(node) = cur {
            cur = &mut node.next;
        }
        self.len += 1;
        let node = cur.insert(Box::new(Node {
            key,
            value,
            next: None,
        }));
        &mut node.value
    }
}

impl<K: PartialEq, V> AssociativeArray<K, V> for ListMap<K, V> {
    fn get(&self, key: &K) -> Option<&V> {
        self.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.iter_mut().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    fn entry(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        match self.position(&key) {
            Some(pos) => match self.iter_mut().nth(pos) {
                Some((_, v)) => v,
                None => unreachable!("position() returned an index past the end"),
            },
            None => self.push_back(key, V::default()),
        }
    }

    fn insert(&mut self, key: K, value: V) -> bool {
        match self.get_mut(&key) {
            Some(v) => {
                *v = value;
                false
            }
            None => {
                self.push_back(key, value);
                true
            }
        }
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        let pos = self.position(key)?;
        let mut cur = &mut self.head;
        for _ in 0..pos {
            cur = &mut cur.as_mut()?.next;
        }
        let node = cur.take()?;
        *cur = node.next;
        self.len -= 1;
        Some(node.value)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn clear(&mut self) {
        let mut cur = self.head.take();
        while let Some(mut node) = cur {
            cur = node.next.take();
        }
        self.len = 0;
    }

    fn keys(&self) -> Vec<&K> {
        self.iter().map(|(k, _)| k).collect()
    }
}

impl<K, V> Drop for ListMap<K, V> {
    fn drop(&mut self) {
        let mut cur = self.head.take();
        while let Some(mut node) = cur {
            cur = node.next.take();
        }
    }
}

impl<K: PartialEq + Clone, V: Clone> Clone for ListMap<K, V> {
    fn clone(&self) -> Self {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

impl<K: std::fmt::Debug, V: std::fmt::Debug> std::fmt::Debug for ListMap<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: PartialEq, V> FromIterator<(K, V)> for ListMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ListMap::new();
        iter.into_iter().for_each(|(k, v)| {
            map.insert(k, v);
        });
        map
    }
}

pub struct Iter<'a, K, V> {
    next: Option<&'a Node<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.next.map(|node| {
            self.next = node.next.as_deref();
            (&node.key, &node.value)
        })
    }
}

pub struct IterMut<'a, K, V> {
    next: Option<&'a mut Node<K, V>>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        self.next.take().map(|node| {
            self.next = node.next.as_deref_mut();
            (&node.key, &mut node.value)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_counts() {
        let mut counts: ListMap<&str, u32> = ListMap::new();
        for word in ["a", "b", "a", "c", "a", "b"] {
            *counts.entry(word) += 1;
        }
        assert_eq!(counts.len(), 3);
        assert_eq!(counts.get(&"a"), Some(&3));
        assert_eq!(counts.get(&"b"), Some(&2));
        assert_eq!(counts.get(&"c"), Some(&1));
        assert_eq!(counts.get(&"d"), None);
        assert_eq!(counts.keys(), vec![&"a", &"b", &"c"]);
    }

    #[test]
    fn insert_overwrites() {
        let mut map = ListMap::new();
        assert!(map.insert(1, "one"));
        assert!(!map.insert(1, "uno"));
        assert_eq!(map.get(&1), Some(&"uno"));
        assert_eq!(map.len(), 1);
        assert!(map.contains_key(&1));
        assert!(!map.contains_key(&2));
    }

    #[test]
    fn remove_head_middle_tail() {
        let mut map: ListMap<u8, u8> = (0..5).map(|i| (i, i * 10)).collect();
        assert_eq!(map.remove(&0), Some(0));
        assert_eq!(map.remove(&2), Some(20));
        assert_eq!(map.remove(&4), Some(40));
        assert_eq!(map.remove(&4), None);
        assert_eq!(map.len(), 2);
        assert_eq!(map.keys(), vec![&1, &3]);
        // Appending still works once the old tail is gone.
        *map.entry(9) += 1;
        assert_eq!(map.keys(), vec![&1, &3, &9]);
    }

    #[test]
    fn clear_and_clone() {
        let mut map: ListMap<String, i32> = [("x".to_string(), 1)].into_iter().collect();
        let copy = map.clone();
        map.clear();
        assert!(map.is_empty());
        assert_eq!(copy.get(&"x".to_string()), Some(&1));
    }

    #[test]
    fn nested_maps() {
        let mut subjects: ListMap<&str, ListMap<u16, u32>> = ListMap::new();
        *subjects.entry("COMSC").entry(210) += 1;
        *subjects.entry("COMSC").entry(210) += 1;
        *subjects.entry("MATH").entry(192) += 1;
        assert_eq!(subjects.get(&"COMSC").and_then(|c| c.get(&210)), Some(&2));
        assert_eq!(subjects.get(&"MATH").map(|c| c.len()), Some(1));
    }
}
